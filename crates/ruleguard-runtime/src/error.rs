//! Errors raised while preparing a validator.

use ruleguard_codegen::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("pattern `{name}` does not compile: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error(transparent)]
    Render(#[from] RenderError),
}
