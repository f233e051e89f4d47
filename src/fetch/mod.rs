//! Page acquisition for the native page context.
//!
//! A browser hands the page context a rendered document. Natively we fetch
//! it with `reqwest` instead, recording `Set-Cookie` headers in a
//! [`CookieJar`](crate::enrich::CookieJar) that the enrichment service later
//! reads from.

mod agent;
mod request;

pub use agent::{AgentError, PageAgent};
pub use request::{fetch_page, FetchedPage};
