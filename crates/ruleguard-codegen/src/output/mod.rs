//! Output backends for validator generation.
//!
//! Each backend takes a [`CheckedSchema`](ruleguard_check::CheckedSchema) and
//! produces one source file. All backends implement the
//! [`Backend`](crate::traits::Backend) trait for uniform access via the
//! registry.

// Python
#[cfg(feature = "backend-python")]
pub mod python;

#[cfg(feature = "backend-python")]
pub use python::{PythonBackend, generate_python};

// Go
#[cfg(feature = "backend-go")]
pub mod go;

#[cfg(feature = "backend-go")]
pub use go::{GoBackend, generate_go};

// C++
#[cfg(feature = "backend-cpp")]
pub mod cpp;

#[cfg(feature = "backend-cpp")]
pub use cpp::{CppBackend, generate_cpp};
