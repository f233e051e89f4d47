//! Data model shared by the page context, the background context and the store.
//!
//! Everything here is serializable because it crosses the message boundary
//! (`PAGE_REPORT`, `REPORT_STORED`) and is persisted as JSON in the report store.
//! Field names follow the camelCase layout of the persisted values.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::security::AppliedPenalty;

/// Identity of a browser tab (or of a native scan session standing in for one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Passive signals captured from one page evaluation.
///
/// Set-valued fields are de-duplicated. Caps are applied after
/// de-duplication, keeping the first items in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    pub url: String,
    pub hostname: String,
    pub is_secure: bool,
    pub mixed_resources: BTreeSet<String>,
    pub insecure_forms: BTreeSet<String>,
    pub inline_scripts: usize,
    pub inline_event_handlers: BTreeSet<String>,
    pub trackers_found: BTreeSet<String>,
    pub csrf_tokens: BTreeSet<String>,
    pub open_redirect_candidates: BTreeSet<String>,
    pub webrtc_ips: BTreeSet<String>,
}

/// A cookie visible for a hostname lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    pub name: String,
    #[serde(default)]
    pub value: String,
    pub domain: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    #[serde(default)]
    pub same_site: SameSite,
    /// True when no `Domain` attribute was sent, so only the exact host sees it.
    #[serde(default)]
    pub host_only: bool,
    /// True when neither `Max-Age` nor `Expires` was sent.
    #[serde(default)]
    pub session: bool,
}

fn default_cookie_path() -> String {
    "/".to_string()
}

/// `SameSite` attribute of a cookie.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    #[default]
    Unspecified,
    NoRestriction,
    Lax,
    Strict,
}

/// Why a header probe could not produce readable headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeFailureKind {
    /// The deadline elapsed and the request was abandoned.
    Timeout,
    /// A response arrived but its headers were not readable.
    Opaque,
    /// The request failed (DNS, connect, TLS, malformed URL...).
    Network,
}

/// Outcome of the best-effort response header probe.
///
/// On the wire this is `{"ok":true,"headers":{..}}` or
/// `{"ok":false,"kind":"..","reason":".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireProbeResult", into = "WireProbeResult")]
pub enum HeaderProbeResult {
    Success {
        /// Lowercase header name to value.
        headers: HashMap<String, String>,
    },
    Failure {
        kind: ProbeFailureKind,
        reason: String,
    },
}

#[derive(Serialize, Deserialize)]
struct WireProbeResult {
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    headers: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<ProbeFailureKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl TryFrom<WireProbeResult> for HeaderProbeResult {
    type Error = String;

    fn try_from(wire: WireProbeResult) -> Result<Self, Self::Error> {
        if wire.ok {
            let headers = wire
                .headers
                .ok_or_else(|| "ok=true requires a headers map".to_string())?;
            Ok(HeaderProbeResult::Success { headers })
        } else {
            Ok(HeaderProbeResult::Failure {
                kind: wire.kind.unwrap_or(ProbeFailureKind::Network),
                reason: wire.reason.unwrap_or_else(|| "unknown".to_string()),
            })
        }
    }
}

impl From<HeaderProbeResult> for WireProbeResult {
    fn from(result: HeaderProbeResult) -> Self {
        match result {
            HeaderProbeResult::Success { headers } => WireProbeResult {
                ok: true,
                headers: Some(headers),
                kind: None,
                reason: None,
            },
            HeaderProbeResult::Failure { kind, reason } => WireProbeResult {
                ok: false,
                headers: None,
                kind: Some(kind),
                reason: Some(reason),
            },
        }
    }
}

impl HeaderProbeResult {
    /// Builds a success value, lowercasing header names.
    pub fn success<I, K, V>(headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        HeaderProbeResult::Success {
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
                .collect(),
        }
    }

    pub fn failure(kind: ProbeFailureKind, reason: impl Into<String>) -> Self {
        HeaderProbeResult::Failure {
            kind,
            reason: reason.into(),
        }
    }

    /// Readable headers, or `None` when the probe failed.
    pub fn headers(&self) -> Option<&HashMap<String, String>> {
        match self {
            HeaderProbeResult::Success { headers } => Some(headers),
            HeaderProbeResult::Failure { .. } => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, HeaderProbeResult::Success { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            HeaderProbeResult::Success { .. } => None,
            HeaderProbeResult::Failure { reason, .. } => Some(reason),
        }
    }
}

/// A scored evaluation as persisted in the report store.
///
/// Never mutated after construction; a later evaluation for the same key
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredReport {
    pub report: PageReport,
    pub cookie_count: usize,
    pub insecure_cookie_count: usize,
    pub header_info: HeaderProbeResult,
    pub score: u8,
    /// Milliseconds since the Unix epoch.
    pub last_updated: i64,
    #[serde(default)]
    pub penalties: Vec<AppliedPenalty>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_probe_result_wire_shape() {
        let ok = HeaderProbeResult::success([("X-Frame-Options", "DENY")]);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["headers"]["x-frame-options"], "DENY");

        let failed = HeaderProbeResult::failure(ProbeFailureKind::Timeout, "timed out after 3000ms");
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["kind"], "timeout");
        assert_eq!(json["reason"], "timed out after 3000ms");
    }

    #[test]
    fn test_header_probe_result_parses_both_variants() {
        let ok: HeaderProbeResult =
            serde_json::from_str(r#"{"ok":true,"headers":{"x-content-type-options":"nosniff"}}"#)
                .unwrap();
        assert!(ok.is_success());
        assert_eq!(
            ok.headers().unwrap().get("x-content-type-options").map(String::as_str),
            Some("nosniff")
        );

        let failed: HeaderProbeResult =
            serde_json::from_str(r#"{"ok":false,"kind":"opaque","reason":"opaque-or-no-headers"}"#)
                .unwrap();
        assert!(!failed.is_success());
        assert_eq!(failed.failure_reason(), Some("opaque-or-no-headers"));
    }

    #[test]
    fn test_page_report_uses_camel_case() {
        let report = PageReport {
            url: "https://example.com/".into(),
            hostname: "example.com".into(),
            is_secure: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["isSecure"], true);
        assert!(json.get("mixedResources").is_some());
        assert!(json.get("openRedirectCandidates").is_some());
    }

    #[test]
    fn test_cookie_defaults_when_fields_absent() {
        let cookie: Cookie = serde_json::from_str(
            r#"{"name":"sid","domain":"example.com","secure":false,"httpOnly":true}"#,
        )
        .unwrap();
        assert_eq!(cookie.path, "/");
        assert_eq!(cookie.same_site, SameSite::Unspecified);
        assert!(cookie.http_only);
    }
}
