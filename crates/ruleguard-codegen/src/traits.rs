//! Traits for code generation backends.

use crate::error::RenderError;
use ruleguard_check::CheckedSchema;
use serde::{Deserialize, Serialize};

/// How generated routines report the first violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// Raise an exception carrying the violation.
    Exception,
    /// Return an error value, nil/null on success.
    ErrorValue,
    /// Return `false` and write the violation through an out-parameter.
    OutParam,
}

/// Per-backend generation options.
///
/// Example config.toml:
/// ```toml
/// [backends.python]
/// runtime_module = "myproject.validation"
///
/// [backends.go]
/// package = "shopv1"
///
/// [backends.cpp]
/// namespace = "shop::v1"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    pub python: PythonOptions,
    pub go: GoOptions,
    pub cpp: CppOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonOptions {
    /// Import `ValidationFailed` from this module instead of defining it.
    pub runtime_module: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoOptions {
    /// Package clause; defaults to the last segment of the schema package.
    pub package: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CppOptions {
    /// Namespace of the message classes; defaults to the schema package.
    pub namespace: Option<String>,
}

/// A code generation backend.
///
/// Backends turn a [`CheckedSchema`] into one validation routine per message.
///
/// # Implementing Custom Backends
///
/// ```ignore
/// use ruleguard_codegen::{Backend, Convention, GenerateOptions, RenderError, register_backend};
/// use ruleguard_check::CheckedSchema;
///
/// struct MyBackend;
///
/// impl Backend for MyBackend {
///     fn name(&self) -> &'static str { "my-backend" }
///     fn language(&self) -> &'static str { "kotlin" }
///     fn extension(&self) -> &'static str { "kt" }
///     fn convention(&self) -> Convention { Convention::Exception }
///     fn generate(&self, schema: &CheckedSchema, options: &GenerateOptions) -> Result<String, RenderError> { /* ... */ }
/// }
///
/// // Register before first use
/// register_backend(&MyBackend);
/// ```
pub trait Backend: Send + Sync {
    /// Unique backend identifier (e.g., "python", "go", "cpp").
    fn name(&self) -> &'static str;

    /// Target language.
    fn language(&self) -> &'static str;

    /// File extension for generated code (e.g., "py", "go", "h").
    fn extension(&self) -> &'static str;

    fn convention(&self) -> Convention;

    /// Generate validation routines for every emitted message.
    fn generate(&self, schema: &CheckedSchema, options: &GenerateOptions) -> Result<String, RenderError>;
}

impl std::fmt::Debug for dyn Backend + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend").field("name", &self.name()).finish()
    }
}
