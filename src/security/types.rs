//! Penalty categories applied by the scorer.

use serde::{Deserialize, Serialize};
use strum_macros::EnumIter as EnumIterMacro;

/// Signal categories that can take points off a page's score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIterMacro, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Penalty {
    /// Page was served over plain HTTP
    InsecurePage,
    /// HTTP subresources on an HTTPS page
    MixedResources,
    /// Forms posting to an HTTP action
    InsecureForms,
    /// Inline `<script>` bodies
    InlineScripts,
    /// Inline `on*` event handler attributes
    InlineEventHandlers,
    /// Scripts loaded from known tracker hosts
    Trackers,
    /// No hidden CSRF token input anywhere on the page
    NoCsrfTokens,
    /// Links carrying a cross-host redirect parameter
    OpenRedirectCandidates,
    /// Addresses exposed through ICE candidate gathering
    WebrtcIps,
    /// Cookies without the `Secure` flag
    CookiesMissingSecure,
    /// Cookies without the `HttpOnly` flag
    CookiesMissingHttpOnly,
    /// Missing Content-Security-Policy header
    MissingCsp,
    /// Missing Strict-Transport-Security header
    MissingHsts,
    /// Neither X-Frame-Options nor frame-ancestors
    MissingFrameOptions,
    /// Missing X-Content-Type-Options header
    MissingContentTypeOptions,
    /// Response headers could not be read
    HeadersUnknown,
}

impl Penalty {
    /// Returns a human-readable description of the penalty
    pub fn description(&self) -> &'static str {
        match self {
            Penalty::InsecurePage => "Page is not served over HTTPS",
            Penalty::MixedResources => "HTTP resources loaded by an HTTPS page",
            Penalty::InsecureForms => "Form submits to an HTTP action",
            Penalty::InlineScripts => "Inline script blocks present",
            Penalty::InlineEventHandlers => "Inline event handler attributes present",
            Penalty::Trackers => "Known third-party tracker scripts",
            Penalty::NoCsrfTokens => "No CSRF token found in any form",
            Penalty::OpenRedirectCandidates => "Links with cross-host redirect parameters",
            Penalty::WebrtcIps => "WebRTC exposes IP addresses",
            Penalty::CookiesMissingSecure => "Cookies without the Secure flag",
            Penalty::CookiesMissingHttpOnly => "Cookies without the HttpOnly flag",
            Penalty::MissingCsp => "Missing Content-Security-Policy header",
            Penalty::MissingHsts => "Missing Strict-Transport-Security (HSTS) header",
            Penalty::MissingFrameOptions => "Missing X-Frame-Options and frame-ancestors",
            Penalty::MissingContentTypeOptions => "Missing X-Content-Type-Options header",
            Penalty::HeadersUnknown => "Response headers could not be verified",
        }
    }

    /// Returns a short stable code for the penalty
    pub fn code(&self) -> &'static str {
        match self {
            Penalty::InsecurePage => "insecure_page",
            Penalty::MixedResources => "mixed_resources",
            Penalty::InsecureForms => "insecure_forms",
            Penalty::InlineScripts => "inline_scripts",
            Penalty::InlineEventHandlers => "inline_event_handlers",
            Penalty::Trackers => "trackers",
            Penalty::NoCsrfTokens => "no_csrf_tokens",
            Penalty::OpenRedirectCandidates => "open_redirect_candidates",
            Penalty::WebrtcIps => "webrtc_ips",
            Penalty::CookiesMissingSecure => "cookies_missing_secure",
            Penalty::CookiesMissingHttpOnly => "cookies_missing_http_only",
            Penalty::MissingCsp => "missing_csp",
            Penalty::MissingHsts => "missing_hsts",
            Penalty::MissingFrameOptions => "missing_frame_options",
            Penalty::MissingContentTypeOptions => "missing_content_type_options",
            Penalty::HeadersUnknown => "headers_unknown",
        }
    }

    /// Points per occurrence and the optional cap for the category.
    ///
    /// Flat penalties have a per-item weight equal to their total and a cap of
    /// the same value, so any count above zero costs exactly that much.
    pub fn weight(&self) -> (u32, u32) {
        match self {
            Penalty::InsecurePage => (30, 30),
            Penalty::MixedResources => (3, 25),
            Penalty::InsecureForms => (20, 20),
            Penalty::InlineScripts => (3, 15),
            Penalty::InlineEventHandlers => (2, 10),
            Penalty::Trackers => (4, 20),
            Penalty::NoCsrfTokens => (10, 10),
            Penalty::OpenRedirectCandidates => (8, 8),
            Penalty::WebrtcIps => (5, 15),
            Penalty::CookiesMissingSecure => (2, 20),
            Penalty::CookiesMissingHttpOnly => (1, 10),
            Penalty::MissingCsp => (8, 8),
            Penalty::MissingHsts => (6, 6),
            Penalty::MissingFrameOptions => (6, 6),
            Penalty::MissingContentTypeOptions => (4, 4),
            Penalty::HeadersUnknown => (3, 3),
        }
    }

    /// True for the four penalties that need readable response headers.
    pub fn is_header_check(&self) -> bool {
        matches!(
            self,
            Penalty::MissingCsp
                | Penalty::MissingHsts
                | Penalty::MissingFrameOptions
                | Penalty::MissingContentTypeOptions
        )
    }
}

/// One penalty that was actually applied to a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPenalty {
    pub penalty: Penalty,
    /// Number of offending items that triggered it.
    pub count: usize,
    /// Points subtracted after capping.
    pub points: u32,
}
