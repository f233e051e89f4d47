//! Form signals: insecure submissions and CSRF token inputs.

use scraper::Html;

use super::selectors::{FORM_INPUT_SELECTOR, FORM_SELECTOR};

/// Name fragments that mark a hidden input as a CSRF token.
pub const CSRF_NAME_HINTS: &[&str] = &["csrf", "token"];

/// Returns raw form `action` values that submit over plain HTTP.
pub fn find_insecure_forms(document: &Html) -> Vec<String> {
    document
        .select(&FORM_SELECTOR)
        .filter_map(|form| form.value().attr("action"))
        .filter(|action| {
            action
                .get(..5)
                .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http:"))
        })
        .map(str::to_string)
        .collect()
}

/// Returns lowercased names of hidden form inputs that look like CSRF tokens.
pub fn find_csrf_tokens(document: &Html) -> Vec<String> {
    document
        .select(&FORM_INPUT_SELECTOR)
        .filter(|input| {
            input
                .value()
                .attr("type")
                .is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden"))
        })
        .filter_map(|input| {
            let name = input.value().attr("name").unwrap_or_default().to_lowercase();
            CSRF_NAME_HINTS
                .iter()
                .any(|hint| name.contains(hint))
                .then_some(name)
        })
        .collect()
}
