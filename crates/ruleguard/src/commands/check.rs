//! Check command - static consistency checking of a schema.

use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckArgs {
    /// Schema JSON file, use - for stdin
    pub schema: PathBuf,
}

/// Run the check command
pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    let checked = super::load_checked(&args.schema)?;
    let schema = checked.schema();
    let routines = checked.emitted_messages().count();
    println!(
        "{}: ok ({} messages, {} routines)",
        args.schema.display(),
        schema.messages.len(),
        routines
    );
    Ok(())
}
