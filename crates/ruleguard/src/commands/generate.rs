//! Generate command - validation routines for one or more backends.

use crate::config::RuleguardConfig;
use anyhow::{Context, bail};
use clap::Args;
use rayon::prelude::*;
use ruleguard_codegen::{Backend, backend_names, backends, get_backend};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct GenerateArgs {
    /// Schema JSON file, use - for stdin
    pub schema: PathBuf,

    /// Backend to generate (repeatable); defaults to the configured backends, then all
    #[arg(short, long = "backend")]
    pub backends: Vec<String>,

    /// Output directory, use - for stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Generated source for one backend.
pub struct Generated {
    pub backend: &'static dyn Backend,
    pub source: String,
}

/// Run the generate command
pub fn run(args: GenerateArgs, config: &RuleguardConfig) -> anyhow::Result<()> {
    let selected = select_backends(&args.backends, config)?;
    let generated = generate(&args.schema, &selected, config)?;

    let output = args.output.or_else(|| config.generate.output_dir.clone());
    match output {
        Some(dir) if dir.as_os_str() != "-" => {
            for path in write_all(&dir, &file_stem(&args.schema), &generated)? {
                eprintln!("Generated {}", path.display());
            }
        }
        _ => {
            for g in &generated {
                print!("{}", g.source);
            }
        }
    }
    Ok(())
}

/// Backends named on the command line, else in the config, else all registered.
pub fn select_backends(
    names: &[String],
    config: &RuleguardConfig,
) -> anyhow::Result<Vec<&'static dyn Backend>> {
    let names = match (names, &config.generate.backends) {
        ([], Some(configured)) => configured.as_slice(),
        ([], None) => return Ok(backends()),
        (names, _) => names,
    };
    names
        .iter()
        .map(|name| match get_backend(name) {
            Some(b) => Ok(b),
            None => bail!(
                "unknown backend: {}. Available: {}",
                name,
                backend_names().join(", ")
            ),
        })
        .collect()
}

/// Check the schema, then render every backend in parallel.
///
/// Either every backend succeeds or nothing is returned.
pub fn generate(
    schema: &Path,
    selected: &[&'static dyn Backend],
    config: &RuleguardConfig,
) -> anyhow::Result<Vec<Generated>> {
    let checked = super::load_checked(schema)?;
    selected
        .par_iter()
        .map(|&backend| {
            let _span = tracing::info_span!("generate", backend = backend.name()).entered();
            let source = backend
                .generate(&checked, &config.backends)
                .with_context(|| format!("{} backend failed", backend.name()))?;
            tracing::debug!(bytes = source.len(), "rendered");
            Ok::<_, anyhow::Error>(Generated { backend, source })
        })
        .collect()
}

/// Write each backend's output as `<stem>_validate.<ext>` under `dir`.
pub fn write_all(dir: &Path, stem: &str, generated: &[Generated]) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    generated
        .iter()
        .map(|g| {
            let path = dir.join(format!("{}_validate.{}", stem, g.backend.extension()));
            std::fs::write(&path, &g.source)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok::<_, anyhow::Error>(path)
        })
        .collect()
}

fn file_stem(schema: &Path) -> String {
    match schema.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if schema.as_os_str() != "-" => stem.to_string(),
        _ => "schema".to_string(),
    }
}
