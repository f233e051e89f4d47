//! Deterministic page scoring.

use std::collections::HashMap;

use crate::config::{
    HEADER_CONTENT_SECURITY_POLICY, HEADER_FRAME_ANCESTORS, HEADER_STRICT_TRANSPORT_SECURITY,
    HEADER_X_CONTENT_TYPE_OPTIONS, HEADER_X_FRAME_OPTIONS,
};
use crate::models::{Cookie, HeaderProbeResult, PageReport};

use super::{AppliedPenalty, Penalty};

/// Score every page starts from.
pub const MAX_SCORE: u8 = 100;

/// Score together with the penalties that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub score: u8,
    pub penalties: Vec<AppliedPenalty>,
}

impl ScoreBreakdown {
    /// Total points subtracted before clamping.
    pub fn total_points(&self) -> u32 {
        self.penalties.iter().map(|p| p.points).sum()
    }

    pub fn applied(&self, penalty: Penalty) -> Option<&AppliedPenalty> {
        self.penalties.iter().find(|p| p.penalty == penalty)
    }
}

/// Computes the 0-100 score for a page.
///
/// Pure and deterministic: identical inputs always give the identical score.
pub fn score(report: &PageReport, cookies: &[Cookie], headers: &HeaderProbeResult) -> u8 {
    score_breakdown(report, cookies, headers).score
}

/// Computes the score and keeps the list of applied penalties.
pub fn score_breakdown(
    report: &PageReport,
    cookies: &[Cookie],
    headers: &HeaderProbeResult,
) -> ScoreBreakdown {
    let mut penalties = Vec::new();
    let mut apply = |penalty: Penalty, count: usize| {
        if count == 0 {
            return;
        }
        let (per_item, cap) = penalty.weight();
        let raw = u32::try_from(count)
            .unwrap_or(u32::MAX)
            .saturating_mul(per_item);
        penalties.push(AppliedPenalty {
            penalty,
            count,
            points: raw.min(cap),
        });
    };

    apply(Penalty::InsecurePage, usize::from(!report.is_secure));
    apply(Penalty::MixedResources, report.mixed_resources.len());
    apply(Penalty::InsecureForms, report.insecure_forms.len());
    apply(Penalty::InlineScripts, report.inline_scripts);
    apply(Penalty::InlineEventHandlers, report.inline_event_handlers.len());
    apply(Penalty::Trackers, report.trackers_found.len());
    // A page without any form is treated like a form without a token.
    apply(Penalty::NoCsrfTokens, usize::from(report.csrf_tokens.is_empty()));
    apply(
        Penalty::OpenRedirectCandidates,
        report.open_redirect_candidates.len(),
    );
    apply(Penalty::WebrtcIps, report.webrtc_ips.len());

    apply(
        Penalty::CookiesMissingSecure,
        cookies.iter().filter(|c| !c.secure).count(),
    );
    apply(
        Penalty::CookiesMissingHttpOnly,
        cookies.iter().filter(|c| !c.http_only).count(),
    );

    match headers.headers() {
        Some(map) => {
            for penalty in missing_header_penalties(map) {
                apply(penalty, 1);
            }
        }
        None => apply(Penalty::HeadersUnknown, 1),
    }

    let total: u32 = penalties.iter().map(|p| p.points).sum();
    let score = u32::from(MAX_SCORE).saturating_sub(total);
    ScoreBreakdown {
        score: u8::try_from(score).unwrap_or(MAX_SCORE),
        penalties,
    }
}

/// Whether `name` is set to a non-blank value in a lowercase-keyed header map.
pub fn header_present(headers: &HashMap<String, String>, name: &str) -> bool {
    headers
        .get(&name.to_ascii_lowercase())
        .is_some_and(|v| !v.trim().is_empty())
}

/// Returns the header penalties for a readable (lowercase-keyed) header map.
///
/// A header that is present with a blank value counts as missing.
pub fn missing_header_penalties(headers: &HashMap<String, String>) -> Vec<Penalty> {
    let has = |name: &str| header_present(headers, name);

    let mut missing = Vec::new();
    if !has(HEADER_CONTENT_SECURITY_POLICY) {
        missing.push(Penalty::MissingCsp);
    }
    if !has(HEADER_STRICT_TRANSPORT_SECURITY) {
        missing.push(Penalty::MissingHsts);
    }
    if !has(HEADER_X_FRAME_OPTIONS) && !has(HEADER_FRAME_ANCESTORS) {
        missing.push(Penalty::MissingFrameOptions);
    }
    if !has(HEADER_X_CONTENT_TYPE_OPTIONS) {
        missing.push(Penalty::MissingContentTypeOptions);
    }
    missing
}
