//! Backends command - list registered code generation backends.

use ruleguard_codegen::{Backend, Convention, backends};

fn convention_name(convention: Convention) -> &'static str {
    match convention {
        Convention::Exception => "exception",
        Convention::ErrorValue => "error value",
        Convention::OutParam => "out-param",
    }
}

/// One line per backend: name, language, file extension, error convention.
pub fn listing(backends: &[&dyn Backend]) -> String {
    let mut out = String::new();
    for b in backends {
        out.push_str(&format!(
            "{:<8} {:<8} .{:<4} {}\n",
            b.name(),
            b.language(),
            b.extension(),
            convention_name(b.convention())
        ));
    }
    out
}

/// Run the backends command
pub fn run() -> anyhow::Result<()> {
    print!("{}", listing(&backends()));
    Ok(())
}
