//! CSS selectors used by the extractor.

use scraper::Selector;
use std::sync::LazyLock;

/// Parses a CSS selector that must succeed (compile-time constants only).
///
/// # Panics
///
/// Panics if the selector cannot be parsed, which is a programming error.
fn parse_selector_unsafe(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        panic!(
            "Failed to parse CSS selector '{}' in {}: {}. This is a programming error.",
            selector_str, context, e
        )
    })
}

/// Elements whose subresource URL can be mixed content.
pub(super) static SUBRESOURCE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    parse_selector_unsafe("img, script, iframe, link", "SUBRESOURCE_SELECTOR")
});

pub(super) static FORM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("form", "FORM_SELECTOR"));

/// Inputs inside a form; the hidden type is checked case-insensitively in code.
pub(super) static FORM_INPUT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("form input", "FORM_INPUT_SELECTOR"));

pub(super) static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("script", "SCRIPT_SELECTOR"));

pub(super) static EXTERNAL_SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("script[src]", "EXTERNAL_SCRIPT_SELECTOR"));

pub(super) static ANY_ELEMENT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("*", "ANY_ELEMENT_SELECTOR"));

pub(super) static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("a[href]", "LINK_SELECTOR"));
