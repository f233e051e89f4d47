//! Terminal rendering of stored reports.

use chrono::{TimeZone, Utc};
use colored::Colorize;

use crate::config::SECURITY_HEADERS;
use crate::models::ScoredReport;
use crate::security::header_present;
use crate::storage::StoreKey;

/// Coloured one-word verdict for a score.
fn verdict(score: u8) -> colored::ColoredString {
    match score {
        80..=100 => "good".green(),
        50..=79 => "fair".yellow(),
        _ => "poor".red(),
    }
}

/// Human-friendly age of a millisecond timestamp relative to `now_ms`.
pub fn format_age(last_updated_ms: i64, now_ms: i64) -> String {
    let seconds = (now_ms - last_updated_ms).max(0) / 1000;
    match seconds {
        0..=59 => format!("{seconds}s ago"),
        60..=3599 => format!("{}m ago", seconds / 60),
        3600..=86_399 => format!("{}h ago", seconds / 3600),
        _ => format!("{}d ago", seconds / 86_400),
    }
}

/// Multi-line summary of one report.
pub fn render_summary(key: &StoreKey, scored: &ScoredReport) -> String {
    let report = &scored.report;
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}  score {}/100 ({})\n",
        "Report".bold(),
        key,
        scored.score.to_string().bold(),
        verdict(scored.score)
    ));
    out.push_str(&format!("  url:        {}\n", report.url));
    let updated = Utc
        .timestamp_millis_opt(scored.last_updated)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| scored.last_updated.to_string());
    out.push_str(&format!("  updated:    {}\n", updated));
    out.push_str(&format!(
        "  cookies:    {} ({} without Secure)\n",
        scored.cookie_count, scored.insecure_cookie_count
    ));
    match scored.header_info.headers() {
        Some(headers) => {
            out.push_str("  headers:\n");
            for name in SECURITY_HEADERS {
                let present = header_present(headers, name);
                let mark = if present { "present".green() } else { "missing".red() };
                out.push_str(&format!("    {:<26} {}\n", name, mark));
            }
        }
        None => out.push_str(&format!(
            "  headers:    unknown ({})\n",
            scored.header_info.failure_reason().unwrap_or("unreadable")
        )),
    }

    if scored.penalties.is_empty() {
        out.push_str("  no issues found\n");
    } else {
        out.push_str("  issues:\n");
        for applied in &scored.penalties {
            out.push_str(&format!(
                "    -{:<3} {} (x{})\n",
                applied.points,
                applied.penalty.description(),
                applied.count
            ));
        }
    }
    out
}

pub fn print_summary(key: &StoreKey, scored: &ScoredReport) {
    print!("{}", render_summary(key, scored));
}

/// One line per stored report: key, score and age.
pub fn print_listing(entries: &[(StoreKey, ScoredReport)]) {
    if entries.is_empty() {
        println!("No stored reports");
        return;
    }
    let now = Utc::now().timestamp_millis();
    for (key, scored) in entries {
        println!(
            "{:<48} {:>3}  {:<4}  {}",
            key.to_string(),
            scored.score,
            verdict(scored.score),
            format_age(scored.last_updated, now)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HeaderProbeResult, PageReport, ProbeFailureKind, TabId};
    use crate::security::{AppliedPenalty, Penalty};

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(0, 5_000), "5s ago");
        assert_eq!(format_age(0, 120_000), "2m ago");
        assert_eq!(format_age(0, 7_200_000), "2h ago");
        assert_eq!(format_age(0, 172_800_000), "2d ago");
        assert_eq!(format_age(10_000, 0), "0s ago");
    }

    #[test]
    fn test_render_summary_lists_penalties() {
        colored::control::set_override(false);
        let scored = ScoredReport {
            report: PageReport {
                url: "http://example.com/".into(),
                hostname: "example.com".into(),
                ..Default::default()
            },
            cookie_count: 0,
            insecure_cookie_count: 0,
            header_info: HeaderProbeResult::failure(ProbeFailureKind::Timeout, "timed out after 3000ms"),
            score: 57,
            last_updated: 0,
            penalties: vec![AppliedPenalty {
                penalty: Penalty::InsecurePage,
                count: 1,
                points: 30,
            }],
        };
        let text = render_summary(&StoreKey::Tab(TabId(2)), &scored);
        assert!(text.contains("report_tab_2"));
        assert!(text.contains("57/100"));
        assert!(text.contains("unknown (timed out after 3000ms)"));
        assert!(text.contains("-30"));
    }

    #[test]
    fn test_render_summary_shows_header_presence() {
        colored::control::set_override(false);
        let scored = ScoredReport {
            report: PageReport::default(),
            cookie_count: 0,
            insecure_cookie_count: 0,
            header_info: HeaderProbeResult::success([("X-Frame-Options", "DENY")]),
            score: 82,
            last_updated: 0,
            penalties: Vec::new(),
        };
        let text = render_summary(&StoreKey::Host("a.test".into()), &scored);
        assert!(text.contains("X-Frame-Options"));
        assert!(text.contains("present"));
        assert!(text.contains("missing"));
        assert!(text.contains("no issues found"));
    }

    #[test]
    fn test_blank_header_shown_as_missing() {
        colored::control::set_override(false);
        let scored = ScoredReport {
            report: PageReport::default(),
            cookie_count: 0,
            insecure_cookie_count: 0,
            header_info: HeaderProbeResult::success([
                ("X-Content-Type-Options", "   "),
                ("X-Frame-Options", "DENY"),
            ]),
            score: 80,
            last_updated: 0,
            penalties: Vec::new(),
        };
        let text = render_summary(&StoreKey::Host("a.test".into()), &scored);
        let line_for = |name: &str| {
            text.lines()
                .find(|line| line.trim_start().starts_with(name))
                .unwrap_or_default()
                .to_string()
        };
        assert!(line_for("X-Content-Type-Options").ends_with("missing"));
        assert!(line_for("X-Frame-Options").ends_with("present"));
    }
}
