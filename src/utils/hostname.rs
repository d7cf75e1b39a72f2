// Hostname inspection helpers shared by the typosquat detector and the
// risk analyzer

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Shape check only; octet ranges are validated separately
    static ref IPV4_PATTERN: Regex = Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").unwrap();
}

/// True when the hostname is an IP literal rather than a registered name.
///
/// IPv4 is matched as a dotted quad with every octet in 0-255. IPv6 accepts
/// the bracketed form the URL parser produces for literal hosts.
pub fn is_ip_literal(hostname: &str) -> bool {
    if IPV4_PATTERN.is_match(hostname) {
        return hostname.split('.').all(|octet| octet.parse::<u8>().is_ok());
    }

    let trimmed = hostname.trim_start_matches('[').trim_end_matches(']');
    if trimmed.contains(':') {
        return trimmed.parse::<std::net::Ipv6Addr>().is_ok();
    }

    false
}

/// True when the hostname is internationalized: it carries raw non-ASCII
/// bytes, or any label is punycode (`xn--`). URL parsers punycode IDN hosts
/// at parse time, so the label check is what actually fires in practice.
pub fn is_idn_host(hostname: &str) -> bool {
    if hostname.bytes().any(|b| b > 0x7F) {
        return true;
    }

    hostname
        .split('.')
        .any(|label| label.to_ascii_lowercase().starts_with("xn--"))
}

/// Base label of a hostname: the second-to-last dot-separated component of
/// the lowercased name with a leading `www.` stripped. Hostnames with fewer
/// than two labels fall back to the whole name.
pub fn extract_base_label(hostname: &str) -> String {
    let clean = hostname.to_lowercase();
    let clean = clean.strip_prefix("www.").unwrap_or(&clean);

    let labels: Vec<&str> = clean.split('.').collect();
    if labels.len() >= 2 {
        labels[labels.len() - 2].to_string()
    } else {
        clean.to_string()
    }
}
