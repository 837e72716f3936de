//! Configuration system for ruleguard.
//!
//! Loads config from:
//! 1. Global: ~/.config/ruleguard/config.toml
//! 2. Per-project: .ruleguard/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [generate]
//! backends = ["python", "go"]
//! output_dir = "gen"
//!
//! [backends.go]
//! package = "shopv1"
//! ```

use ruleguard_codegen::{CppOptions, GenerateOptions, GoOptions, PythonOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Defaults for `ruleguard generate`.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GenerateConfig {
    /// Backends used when none are given on the command line.
    pub backends: Option<Vec<String>>,
    /// Directory generated files are written to; stdout when unset.
    pub output_dir: Option<PathBuf>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct RuleguardConfig {
    pub generate: GenerateConfig,
    /// Per-backend options passed to every backend.
    pub backends: GenerateOptions,
}

impl RuleguardConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/ruleguard/config.toml,
    /// then merges with per-project config from .ruleguard/config.toml.
    pub fn load(root: &Path) -> Self {
        Self::load_from(Self::global_config_path().as_deref(), root)
    }

    /// Like [`RuleguardConfig::load`] with an explicit global config path.
    pub fn load_from(global: Option<&Path>, root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global) = global.and_then(Self::load_file) {
            config = config.merge(global);
        }

        let project_path = root.join(".ruleguard").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("ruleguard").join("config.toml"))
    }

    /// Missing files are skipped silently; malformed ones with a warning.
    fn load_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }

    /// Merge another config into this one. Settings present in `other` win.
    fn merge(self, other: Self) -> Self {
        Self {
            generate: GenerateConfig {
                backends: other.generate.backends.or(self.generate.backends),
                output_dir: other.generate.output_dir.or(self.generate.output_dir),
            },
            backends: GenerateOptions {
                python: PythonOptions {
                    runtime_module: other
                        .backends
                        .python
                        .runtime_module
                        .or(self.backends.python.runtime_module),
                },
                go: GoOptions {
                    package: other.backends.go.package.or(self.backends.go.package),
                },
                cpp: CppOptions {
                    namespace: other.backends.cpp.namespace.or(self.backends.cpp.namespace),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "{}", content).unwrap();
    }

    #[test]
    fn test_default_config() {
        let dir = TempDir::new().unwrap();
        let config = RuleguardConfig::load_from(None, dir.path());
        assert_eq!(config, RuleguardConfig::default());
        assert!(config.generate.backends.is_none());
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(".ruleguard").join("config.toml"),
            r#"
[generate]
backends = ["go"]
output_dir = "gen"

[backends.go]
package = "shopv1"
"#,
        );

        let config = RuleguardConfig::load_from(None, dir.path());
        assert_eq!(config.generate.backends, Some(vec!["go".to_string()]));
        assert_eq!(config.generate.output_dir, Some(PathBuf::from("gen")));
        assert_eq!(config.backends.go.package.as_deref(), Some("shopv1"));
        assert!(config.backends.cpp.namespace.is_none());
    }

    #[test]
    fn test_project_overrides_global() {
        let global_dir = TempDir::new().unwrap();
        let global = global_dir.path().join("config.toml");
        write_config(
            &global,
            r#"
[generate]
backends = ["python", "cpp"]

[backends.python]
runtime_module = "acme.validation"

[backends.cpp]
namespace = "acme"
"#,
        );
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(".ruleguard").join("config.toml"),
            r#"
[generate]
backends = ["python"]

[backends.cpp]
namespace = "shop::v1"
"#,
        );

        let config = RuleguardConfig::load_from(Some(&global), dir.path());
        assert_eq!(config.generate.backends, Some(vec!["python".to_string()]));
        // only set globally
        assert_eq!(config.backends.python.runtime_module.as_deref(), Some("acme.validation"));
        assert_eq!(config.backends.cpp.namespace.as_deref(), Some("shop::v1"));
    }

    #[test]
    fn test_malformed_config_is_ignored() {
        let dir = TempDir::new().unwrap();
        write_config(&dir.path().join(".ruleguard").join("config.toml"), "[generate\nbackends = 3");
        assert_eq!(RuleguardConfig::load_from(None, dir.path()), RuleguardConfig::default());
    }
}
