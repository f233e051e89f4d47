//! HTTP header name constants.
//!
//! Header names are compared against the lowercased map produced by the
//! header probe, so lookups lowercase these first.

/// Content Security Policy header
pub const HEADER_CONTENT_SECURITY_POLICY: &str = "Content-Security-Policy";
/// HTTP Strict Transport Security header
pub const HEADER_STRICT_TRANSPORT_SECURITY: &str = "Strict-Transport-Security";
/// X-Content-Type-Options header
pub const HEADER_X_CONTENT_TYPE_OPTIONS: &str = "X-Content-Type-Options";
/// X-Frame-Options header
pub const HEADER_X_FRAME_OPTIONS: &str = "X-Frame-Options";
/// Standalone frame-ancestors header, accepted in place of X-Frame-Options
pub const HEADER_FRAME_ANCESTORS: &str = "Frame-Ancestors";

/// Security headers shown in the report summary, in display order.
pub const SECURITY_HEADERS: &[&str] = &[
    HEADER_CONTENT_SECURITY_POLICY,
    HEADER_STRICT_TRANSPORT_SECURITY,
    HEADER_X_FRAME_OPTIONS,
    HEADER_X_CONTENT_TYPE_OPTIONS,
];

/// Response header that sets cookies on the fetched page
pub const HEADER_SET_COOKIE: &str = "Set-Cookie";
