//! Canonical patterns for well-known regex selectors.

use ruleguard_ir::KnownRegex;

/// Entries of the well-known regex table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WellKnownPattern {
    Unknown,
    HttpHeaderName,
    HttpHeaderValue,
    /// Lenient header pattern for non-strict header selectors.
    HeaderString,
}

impl WellKnownPattern {
    pub const ALL: [WellKnownPattern; 4] = [
        WellKnownPattern::Unknown,
        WellKnownPattern::HttpHeaderName,
        WellKnownPattern::HttpHeaderValue,
        WellKnownPattern::HeaderString,
    ];

    /// Pick the table entry for a selector.
    pub fn select(regex: KnownRegex, strict: bool) -> Self {
        match (regex, strict) {
            (KnownRegex::Unknown, _) => WellKnownPattern::Unknown,
            (KnownRegex::HttpHeaderName | KnownRegex::HttpHeaderValue, false) => {
                WellKnownPattern::HeaderString
            }
            (KnownRegex::HttpHeaderName, true) => WellKnownPattern::HttpHeaderName,
            (KnownRegex::HttpHeaderValue, true) => WellKnownPattern::HttpHeaderValue,
        }
    }

    /// Escapes must be accepted by Rust `regex`, Python `re`, Go `regexp` and RE2.
    pub const fn pattern(self) -> &'static str {
        match self {
            WellKnownPattern::Unknown => "",
            WellKnownPattern::HttpHeaderName => r"^:?[0-9a-zA-Z!#$%&'*+-.^_|~\x60]+$",
            WellKnownPattern::HttpHeaderValue => r"^[^\x00-\x08\x0A-\x1F\x7F]*$",
            WellKnownPattern::HeaderString => r"^[^\x00\x0A\x0D]*$",
        }
    }
}
