//! Rendering errors.

use thiserror::Error;

/// Errors raised while walking a checked schema.
///
/// A schema that passed the checker does not produce these; they guard the
/// context operations against misuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("field `{0}` is not a wrapper")]
    NotAWrapper(String),
    #[error("field `{0}` has no element type")]
    NotAContainer(String),
    #[error("invalid literal: {0}")]
    InvalidLiteral(String),
    #[error("unknown message `{0}`")]
    UnknownMessage(String),
    #[error("unknown enum `{0}`")]
    UnknownEnum(String),
    #[error("no comparison plan for {0} rules")]
    Unplanned(&'static str),
}
