//! Validator generation from checked rule schemas.
//!
//! `ruleguard-codegen` turns a [`CheckedSchema`](ruleguard_check::CheckedSchema)
//! into validation routines for several target languages. Every backend shares
//! the same check planning and failure reasons, so a message rejected by one
//! language is rejected by all of them with the same text.
//!
//! # Architecture
//!
//! ```text
//!   CheckedSchema        Shared planning              Output Backends
//! ─────────────────    ─────────────────────────    ─────────────────────
//!                      context.rs  (what a field    ┌─> Python (raise)
//! messages ──────────>  validates at each level)  ──┼─> Go (error value)
//! fields + rules       plan.rs     (check order)    └─> C++ (out-param)
//!                      reason.rs   (failure text)
//!                      lookup.rs   (sets, regexes)
//! ```
//!
//! # Example
//!
//! ```
//! use ruleguard_codegen::{GenerateOptions, get_backend};
//! use ruleguard_ir::{Field, FieldRules, FieldType, Message, Rule, ScalarKind, Schema, StringRules};
//!
//! let mut schema = Schema::new("demo.v1");
//! schema.add_message(Message::new(
//!     "User",
//!     vec![Field::new("name", FieldType::Scalar(ScalarKind::String)).with_rules(
//!         FieldRules::rule(Rule::String(StringRules {
//!             min_len: Some(1),
//!             ..Default::default()
//!         })),
//!     )],
//! ));
//! let checked = ruleguard_check::check(&schema).unwrap();
//!
//! let python = get_backend("python").unwrap();
//! let source = python.generate(&checked, &GenerateOptions::default()).unwrap();
//! assert!(source.contains("def validate_User(m):"));
//! ```
//!
//! # Feature Flags
//!
//! Backend flags (use `backend-*` prefix):
//! - `backend-python` - Python functions raising `ValidationFailed`
//! - `backend-go` - Go `Validate() error` methods
//! - `backend-cpp` - C++ `Validate(const Msg&, pgv::ValidationMsg*)` overloads
//!
//! Language umbrella flags: `python`, `go`, `cpp`.

pub mod context;
pub mod error;
pub mod lookup;
pub mod output;
pub mod plan;
pub mod reason;
pub mod registry;
pub mod render;
pub mod traits;
pub mod writer;

pub use error::RenderError;

// Re-export traits
pub use traits::{Backend, Convention, CppOptions, GenerateOptions, GoOptions, PythonOptions};

// Re-export registry functions
pub use registry::{
    backend_names, backends, backends_by_convention, backends_for_language, get_backend,
    register_backend,
};

// Re-export backend structs
#[cfg(feature = "backend-python")]
pub use output::python::PythonBackend;

#[cfg(feature = "backend-go")]
pub use output::go::GoBackend;

#[cfg(feature = "backend-cpp")]
pub use output::cpp::CppBackend;
