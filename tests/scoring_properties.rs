//! Properties of the scoring function over the public API.

use std::collections::BTreeSet;

use page_hygiene::models::{Cookie, HeaderProbeResult, PageReport, ProbeFailureKind, SameSite};
use page_hygiene::security::{score, score_breakdown, Penalty, MAX_SCORE};
use strum::IntoEnumIterator;

fn set(prefix: &str, n: usize) -> BTreeSet<String> {
    (0..n).map(|i| format!("{prefix}{i}")).collect()
}

fn cookie(i: usize, secure: bool, http_only: bool) -> Cookie {
    Cookie {
        name: format!("c{i}"),
        value: String::new(),
        domain: "example.com".to_string(),
        path: "/".to_string(),
        secure,
        http_only,
        same_site: SameSite::Unspecified,
        host_only: true,
        session: true,
    }
}

fn good_headers() -> HeaderProbeResult {
    HeaderProbeResult::success([
        ("content-security-policy", "default-src 'self'"),
        ("strict-transport-security", "max-age=1"),
        ("x-frame-options", "SAMEORIGIN"),
        ("x-content-type-options", "nosniff"),
    ])
}

fn worst_report() -> PageReport {
    PageReport {
        url: "http://example.com/".into(),
        hostname: "example.com".into(),
        is_secure: false,
        mixed_resources: set("http://a/", 50),
        insecure_forms: set("http://f/", 5),
        inline_scripts: 40,
        inline_event_handlers: set("on", 6),
        trackers_found: set("t", 6),
        csrf_tokens: BTreeSet::new(),
        open_redirect_candidates: set("/r?next=", 3),
        webrtc_ips: set("10.0.0.", 4),
    }
}

#[test]
fn test_worst_case_clamps_to_zero() {
    let cookies: Vec<Cookie> = (0..30).map(|i| cookie(i, false, false)).collect();
    let headers = HeaderProbeResult::success(Vec::<(String, String)>::new());
    assert_eq!(score(&worst_report(), &cookies, &headers), 0);
}

#[test]
fn test_score_always_in_range() {
    let failed = HeaderProbeResult::failure(ProbeFailureKind::Network, "fetch-failed");
    for n in 0..30 {
        let mut report = worst_report();
        report.mixed_resources = set("http://a/", n);
        report.trackers_found = set("t", n);
        report.is_secure = n % 2 == 0;
        let cookies: Vec<Cookie> = (0..n).map(|i| cookie(i, i % 3 == 0, i % 2 == 0)).collect();
        for headers in [&failed, &good_headers()] {
            let s = score(&report, &cookies, headers);
            assert!(s <= MAX_SCORE);
        }
    }
}

#[test]
fn test_monotonic_in_each_counted_signal() {
    let base = PageReport {
        url: "https://example.com/".into(),
        hostname: "example.com".into(),
        is_secure: true,
        ..Default::default()
    };
    let headers = good_headers();
    let mut previous = score(&base, &[], &headers);
    for n in 1..15 {
        let mut report = base.clone();
        report.mixed_resources = set("http://a/", n);
        report.trackers_found = set("t", n);
        let cookies: Vec<Cookie> = (0..n).map(|i| cookie(i, false, true)).collect();
        let current = score(&report, &cookies, &headers);
        assert!(current <= previous, "score rose from {previous} to {current} at n={n}");
        previous = current;
    }
}

#[test]
fn test_header_penalties_never_combine_with_unknown() {
    let report = worst_report();
    let cases = [
        good_headers(),
        HeaderProbeResult::success([("server", "nginx")]),
        HeaderProbeResult::failure(ProbeFailureKind::Opaque, "opaque-or-no-headers"),
        HeaderProbeResult::failure(ProbeFailureKind::Timeout, "timed out after 3000ms"),
    ];
    for headers in &cases {
        let breakdown = score_breakdown(&report, &[], headers);
        let unknown = breakdown.applied(Penalty::HeadersUnknown).is_some();
        let specific = Penalty::iter()
            .filter(|p| p.is_header_check())
            .any(|p| breakdown.applied(p).is_some());
        assert!(!(unknown && specific));
        assert_eq!(unknown, !headers.is_success());
    }
}

#[test]
fn test_breakdown_total_matches_score() {
    let report = worst_report();
    let cookies = vec![cookie(0, false, true), cookie(1, true, false)];
    let breakdown = score_breakdown(&report, &cookies, &good_headers());
    let expected = u32::from(MAX_SCORE).saturating_sub(breakdown.total_points());
    assert_eq!(u32::from(breakdown.score), expected);
}
