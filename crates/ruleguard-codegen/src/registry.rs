//! Registry for code generation backends.

use crate::traits::{Backend, Convention};
use std::sync::{OnceLock, RwLock};

/// Global registry of backends.
static BACKENDS: RwLock<Vec<&'static dyn Backend>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom backend.
///
/// Built-in backends are registered automatically on first use.
pub fn register_backend(backend: &'static dyn Backend) {
    init_builtin();
    BACKENDS.write().unwrap().push(backend);
}

fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        let mut backends = BACKENDS.write().unwrap();

        #[cfg(feature = "backend-python")]
        {
            backends.push(&crate::output::python::PYTHON_BACKEND);
        }

        #[cfg(feature = "backend-go")]
        {
            backends.push(&crate::output::go::GO_BACKEND);
        }

        #[cfg(feature = "backend-cpp")]
        {
            backends.push(&crate::output::cpp::CPP_BACKEND);
        }
    });
}

/// Get a backend by name.
pub fn get_backend(name: &str) -> Option<&'static dyn Backend> {
    init_builtin();
    BACKENDS
        .read()
        .unwrap()
        .iter()
        .find(|b| b.name() == name)
        .copied()
}

/// Get all backends for a language.
pub fn backends_for_language(language: &str) -> Vec<&'static dyn Backend> {
    init_builtin();
    BACKENDS
        .read()
        .unwrap()
        .iter()
        .filter(|b| b.language() == language)
        .copied()
        .collect()
}

/// Get all backends reporting failures a given way.
pub fn backends_by_convention(convention: Convention) -> Vec<&'static dyn Backend> {
    init_builtin();
    BACKENDS
        .read()
        .unwrap()
        .iter()
        .filter(|b| b.convention() == convention)
        .copied()
        .collect()
}

/// List all registered backends.
pub fn backends() -> Vec<&'static dyn Backend> {
    init_builtin();
    BACKENDS.read().unwrap().clone()
}

/// List all registered backend names.
pub fn backend_names() -> Vec<&'static str> {
    init_builtin();
    BACKENDS.read().unwrap().iter().map(|b| b.name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_backends_are_registered() {
        let names = backend_names();
        assert!(names.contains(&"python") || cfg!(not(feature = "backend-python")));
        assert!(names.contains(&"go") || cfg!(not(feature = "backend-go")));
        assert!(names.contains(&"cpp") || cfg!(not(feature = "backend-cpp")));
    }

    #[test]
    fn lookup_by_language_and_convention() {
        if cfg!(feature = "backend-go") {
            assert_eq!(backends_for_language("go").len(), 1);
            assert!(
                backends_by_convention(Convention::ErrorValue)
                    .iter()
                    .any(|b| b.name() == "go")
            );
        }
        assert!(get_backend("cobol").is_none());
    }
}
