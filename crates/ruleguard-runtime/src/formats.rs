//! Semantic format validators.
//!
//! These accept exactly what the helpers emitted by the code generators
//! accept, so a format rule gives the same answer in every language.

use ruleguard_codegen::plan::Format;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Whether `s` satisfies a string format.
pub fn check_str(format: Format, s: &str) -> bool {
    match format {
        Format::Email => is_email(s),
        Format::Hostname => is_hostname(s),
        Format::Address => is_hostname(s) || is_ip(s, None),
        Format::Ip => is_ip(s, None),
        Format::Ipv4 => is_ip(s, Some(4)),
        Format::Ipv6 => is_ip(s, Some(6)),
        Format::Uri => is_uri(s),
        Format::UriRef => is_uri_ref(s),
        Format::Uuid => is_uuid(s),
    }
}

/// Whether raw address bytes satisfy an ip format. Other formats never
/// apply to bytes and are accepted.
pub fn check_bytes(format: Format, b: &[u8]) -> bool {
    match format {
        Format::Ipv4 => b.len() == 4,
        Format::Ipv6 => b.len() == 16,
        Format::Ip => b.len() == 4 || b.len() == 16,
        _ => true,
    }
}

pub fn is_hostname(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.is_empty() || host.chars().count() > 253 {
        return false;
    }
    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}

pub fn is_email(addr: &str) -> bool {
    if addr.chars().count() > 254 {
        return false;
    }
    let Some((local, domain)) = addr.rsplit_once('@') else {
        return false;
    };
    !local.is_empty() && local.chars().count() <= 64 && is_hostname(domain)
}

/// `version` is 4, 6 or `None` for either. Text with a `:` is read as IPv6.
pub fn is_ip(addr: &str, version: Option<u8>) -> bool {
    let (parsed, v) = if addr.contains(':') {
        (addr.parse::<Ipv6Addr>().is_ok(), 6)
    } else {
        (addr.parse::<Ipv4Addr>().is_ok(), 4)
    };
    parsed && version.is_none_or(|want| want == v)
}

pub fn is_uri_ref(uri: &str) -> bool {
    !uri.chars().any(|c| c.is_whitespace() || (c as u32) < 0x20 || c == '\u{7f}')
}

pub fn is_uri(uri: &str) -> bool {
    let mut chars = uri.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    let rest = chars.as_str();
    let scheme_end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-')))
        .unwrap_or(rest.len());
    rest[scheme_end..].starts_with(':') && is_uri_ref(uri)
}

pub fn is_uuid(s: &str) -> bool {
    s.len() == 36
        && s.bytes().enumerate().all(|(i, b)| match i {
            8 | 13 | 18 | 23 => b == b'-',
            _ => b.is_ascii_hexdigit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn hostnames() {
        assert!(is_hostname("example.com"));
        assert!(is_hostname("example.com."));
        assert!(is_hostname("a-b.c"));
        assert!(!is_hostname(""));
        assert!(!is_hostname("."));
        assert!(!is_hostname("-a.com"));
        assert!(!is_hostname("a..com"));
        assert!(!is_hostname("exa_mple.com"));
        assert!(!is_hostname("bücher.de"));
        assert!(!is_hostname(&format!("{}.com", "a".repeat(64))));
    }

    #[test]
    fn emails() {
        assert!(is_email("foo@example.com"));
        assert!(is_email("a@b@example.com"));
        assert!(!is_email("foo"));
        assert!(!is_email("@example.com"));
        assert!(!is_email("foo@-bad.com"));
        assert!(!is_email(&format!("{}@example.com", "a".repeat(65))));
    }

    #[test]
    fn ip_addresses() {
        assert!(is_ip("192.168.0.1", None));
        assert!(is_ip("192.168.0.1", Some(4)));
        assert!(!is_ip("192.168.0.1", Some(6)));
        assert!(is_ip("::1", Some(6)));
        assert!(!is_ip("::1", Some(4)));
        assert!(!is_ip("256.0.0.1", None));
        assert!(!is_ip("example.com", None));
        assert!(check_str(Format::Address, "example.com"));
        assert!(check_str(Format::Address, "fe80::1"));
    }

    #[test]
    fn uris() {
        assert!(is_uri("https://example.com/a?b=c"));
        assert!(is_uri("urn:isbn:0451450523"));
        assert!(!is_uri("/relative/path"));
        assert!(!is_uri("1http://example.com"));
        assert!(!is_uri("http://exa mple.com"));
        assert!(is_uri_ref("/relative/path"));
        assert!(!is_uri_ref("a\tb"));
    }

    #[test]
    fn uuids() {
        assert!(is_uuid("123e4567-e89b-12d3-a456-426614174000"));
        assert!(is_uuid("123E4567-E89B-12D3-A456-426614174000"));
        assert!(!is_uuid("123e4567e89b12d3a456426614174000"));
        assert!(!is_uuid("123e4567-e89b-12d3-a456-42661417400g"));
        assert!(!is_uuid("123e4567-e89b-12d3-a456-426614174000\n"));
    }

    #[test]
    fn ip_bytes() {
        assert!(check_bytes(Format::Ipv4, &[127, 0, 0, 1]));
        assert!(!check_bytes(Format::Ipv6, &[127, 0, 0, 1]));
        assert!(check_bytes(Format::Ip, &[0; 16]));
        assert!(!check_bytes(Format::Ip, &[0; 5]));
    }

    proptest! {
        #[test]
        fn formatted_uuids_pass(hex in "[0-9a-f]{32}") {
            let s = format!("{}-{}-{}-{}-{}", &hex[..8], &hex[8..12], &hex[12..16], &hex[16..20], &hex[20..]);
            prop_assert!(is_uuid(&s));
        }

        #[test]
        fn printed_ipv4_addresses_pass(a: u8, b: u8, c: u8, d: u8) {
            let s = format!("{a}.{b}.{c}.{d}");
            prop_assert!(is_ip(&s, Some(4)));
        }
    }
}
