//! Page scoring.
//!
//! This module reduces the independent signals gathered for a page into a
//! single comparable score:
//! - Passive page signals (transport, mixed content, forms, scripts, trackers)
//! - Cookie flag hygiene
//! - Security response headers (or the inability to read them)
//!
//! Every category has a bounded contribution, so no single signal can
//! dominate the score. This is the only place the weights live.

mod score;
mod types;

pub use score::{header_present, missing_header_penalties, score, score_breakdown, ScoreBreakdown, MAX_SCORE};
pub use types::{AppliedPenalty, Penalty};
