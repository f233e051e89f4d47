//! IP extraction from ICE candidate descriptions.

use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::LazyLock;

use regex::Regex;

/// Helper function to compile a static regex pattern, panicking with a detailed
/// error message if compilation fails.
fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

// Dotted quads, or hex groups with at least two colons and an optional
// dotted-quad tail. Matches are only accepted once they parse as a real
// address.
static IP_LIKE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r"\b(?:\d{1,3}\.){3}\d{1,3}\b|[0-9A-Fa-f]{0,4}(?::[0-9A-Fa-f]{0,4}){2,7}(?:\.\d{1,3}){0,3}",
        "IP_LIKE_PATTERN",
    )
});

/// Returns the IP addresses mentioned in one candidate line.
///
/// Foundations, priorities and ports are never IP-like; unspecified
/// addresses (`0.0.0.0`, `::`) are dropped because they reveal nothing.
pub fn extract_ips(candidate: &str) -> BTreeSet<String> {
    IP_LIKE_PATTERN
        .find_iter(candidate)
        .filter_map(|m| m.as_str().parse::<IpAddr>().ok())
        .filter(|ip| !ip.is_unspecified())
        .map(|ip| ip.to_string())
        .collect()
}
