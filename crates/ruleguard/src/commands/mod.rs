//! Subcommand implementations.

pub mod backends;
pub mod check;
pub mod generate;
pub mod validate;

use anyhow::{Context, anyhow};
use ruleguard_check::CheckedSchema;
use ruleguard_ir::Schema;
use std::io::Read;
use std::path::Path;

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

pub fn read_schema(path: &Path) -> anyhow::Result<Schema> {
    let content = read_input(path)?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse schema {}", path.display()))
}

/// Read and check a schema. Check failures carry their kind and field path.
pub fn load_checked(path: &Path) -> anyhow::Result<CheckedSchema> {
    let schema = read_schema(path)?;
    let _span = tracing::debug_span!("check", schema = %path.display()).entered();
    ruleguard_check::check(&schema).map_err(|e| anyhow!("{}: {} [{}]", path.display(), e, e.kind))
}
