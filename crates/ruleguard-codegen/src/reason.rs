//! Failure reason strings shared by every backend and the runtime.
//!
//! Generated code embeds these verbatim, so a violation reads the same
//! regardless of the language that produced it.

use std::fmt::Display;

pub const REQUIRED: &str = "value is required";
pub const EMBEDDED: &str = "embedded message failed validation";
pub const UNIQUE: &str = "repeated value must contain unique items";
pub const NO_SPARSE: &str = "value cannot be sparse, all pairs must be non-nil";
pub const DEFINED_ONLY: &str = "value must be one of the defined enum values";

pub fn equal(value: impl Display) -> String {
    format!("value must equal {value}")
}

pub fn less_than(value: impl Display, inclusive: bool) -> String {
    if inclusive {
        format!("value must be less than or equal to {value}")
    } else {
        format!("value must be less than {value}")
    }
}

pub fn greater_than(value: impl Display, inclusive: bool) -> String {
    if inclusive {
        format!("value must be greater than or equal to {value}")
    } else {
        format!("value must be greater than {value}")
    }
}

pub fn inside_range(open: char, lower: impl Display, upper: impl Display, close: char) -> String {
    format!("value must be inside range {open}{lower}, {upper}{close}")
}

pub fn outside_range(open: char, lower: impl Display, upper: impl Display, close: char) -> String {
    format!("value must be outside range {open}{lower}, {upper}{close}")
}

pub fn in_list<T: Display>(values: &[T]) -> String {
    format!("value must be in list {}", list(values))
}

pub fn not_in_list<T: Display>(values: &[T]) -> String {
    format!("value must not be in list {}", list(values))
}

pub fn type_url_in<T: Display>(values: &[T]) -> String {
    format!("type URL must be in list {}", list(values))
}

pub fn type_url_not_in<T: Display>(values: &[T]) -> String {
    format!("type URL must not be in list {}", list(values))
}

/// `noun` is "item" or "pair".
pub fn count_at_least(n: u64, noun: &str) -> String {
    format!("value must contain at least {n} {noun}(s)")
}

pub fn count_at_most(n: u64, noun: &str) -> String {
    format!("value must contain no more than {n} {noun}(s)")
}

pub fn count_exactly(n: u64, noun: &str) -> String {
    format!("value must contain exactly {n} {noun}(s)")
}

/// `unit` is "runes" or "bytes".
pub fn length_exactly(n: u64, unit: &str) -> String {
    format!("value length must be {n} {unit}")
}

pub fn length_at_least(n: u64, unit: &str) -> String {
    format!("value length must be at least {n} {unit}")
}

pub fn length_at_most(n: u64, unit: &str) -> String {
    format!("value length must be at most {n} {unit}")
}

pub fn pattern(regex: &str) -> String {
    format!("value does not match regex pattern {}", quote(regex))
}

pub fn prefix(literal: &str) -> String {
    format!("value does not have prefix {literal}")
}

pub fn suffix(literal: &str) -> String {
    format!("value does not have suffix {literal}")
}

pub fn contains(literal: &str) -> String {
    format!("value does not contain substring {literal}")
}

pub fn not_contains(literal: &str) -> String {
    format!("value contains substring {literal}")
}

pub fn less_than_now() -> String {
    "value must be less than now".to_string()
}

pub fn greater_than_now() -> String {
    "value must be greater than now".to_string()
}

pub fn within_of_now(within: impl Display) -> String {
    format!("value must be within {within} of now")
}

pub fn less_than_now_within(within: impl Display) -> String {
    format!("value must be less than now within {within}")
}

pub fn greater_than_now_within(within: impl Display) -> String {
    format!("value must be greater than now within {within}")
}

/// Space-separated bracketed list, `[a b c]`.
pub fn list<T: Display>(values: &[T]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(" "))
}

/// Double-quoted text with control characters escaped.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Double-quoted bytes; non-printable bytes as `\xNN`.
pub fn quote_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 2);
    out.push('"');
    for &b in bytes {
        match b {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_are_space_separated() {
        assert_eq!(in_list(&[1, 2, 3]), "value must be in list [1 2 3]");
        assert_eq!(not_in_list::<String>(&[]), "value must not be in list []");
    }

    #[test]
    fn quoting() {
        assert_eq!(quote("a\"b\n"), r#""a\"b\n""#);
        assert_eq!(quote("\u{1}"), r#""\x01""#);
        assert_eq!(quote_bytes(&[0x61, 0x00, 0xff]), r#""a\x00\xff""#);
    }

    #[test]
    fn counts() {
        assert_eq!(count_at_least(2, "item"), "value must contain at least 2 item(s)");
        assert_eq!(count_at_most(1, "pair"), "value must contain no more than 1 pair(s)");
    }
}
