//! Validate command - apply a schema to a JSON message instance.

use anyhow::{Context, bail};
use clap::Args;
use ruleguard_runtime::{MessageValue, Validator};
use std::path::PathBuf;

#[derive(Args)]
pub struct ValidateArgs {
    /// Schema JSON file
    pub schema: PathBuf,

    /// Message the instance is an instance of
    pub message: String,

    /// Instance JSON file, use - for stdin
    pub instance: PathBuf,
}

/// Run the validate command
pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let checked = super::load_checked(&args.schema)?;
    if checked.schema().message(&args.message).is_none() {
        bail!("{}: no message named {}", args.schema.display(), args.message);
    }
    let validator = Validator::new(&checked)?;

    let content = super::read_input(&args.instance)?;
    let instance: MessageValue = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse instance {}", args.instance.display()))?;

    match validator.validate(&args.message, &instance) {
        Ok(()) => {
            println!("{}: valid {}", args.instance.display(), args.message);
            Ok(())
        }
        Err(violation) => bail!("{}: {}", args.instance.display(), violation),
    }
}
