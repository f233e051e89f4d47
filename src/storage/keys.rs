//! Report store keys.

use std::fmt;
use std::str::FromStr;

use crate::config::{KEY_PREFIX_HOST, KEY_PREFIX_LAST, KEY_PREFIX_TAB};
use crate::models::TabId;

/// Address of a stored report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StoreKey {
    /// `report_tab_<id>`
    Tab(TabId),
    /// `report_host_<hostname>`, used when tab identity is unknown
    Host(String),
    /// `last_report_<hostname>`, always written alongside the primary key
    LastReport(String),
}

impl StoreKey {
    /// Primary key for a report: by tab when known, by hostname otherwise.
    pub fn primary(tab: Option<TabId>, hostname: &str) -> Self {
        match tab {
            Some(tab) => StoreKey::Tab(tab),
            None => StoreKey::Host(hostname.to_string()),
        }
    }

    /// Hostname-addressable index key.
    pub fn last_report(hostname: &str) -> Self {
        StoreKey::LastReport(hostname.to_string())
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKey::Tab(tab) => write!(f, "{KEY_PREFIX_TAB}{tab}"),
            StoreKey::Host(host) => write!(f, "{KEY_PREFIX_HOST}{host}"),
            StoreKey::LastReport(host) => write!(f, "{KEY_PREFIX_LAST}{host}"),
        }
    }
}

/// The string is not one of the known report key layouts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a report store key")]
pub struct ParseKeyError(pub String);

impl FromStr for StoreKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseKeyError(s.to_string());
        if let Some(id) = s.strip_prefix(KEY_PREFIX_TAB) {
            return id.parse().map(|id| StoreKey::Tab(TabId(id))).map_err(|_| err());
        }
        if let Some(host) = s.strip_prefix(KEY_PREFIX_HOST) {
            return if host.is_empty() {
                Err(err())
            } else {
                Ok(StoreKey::Host(host.to_string()))
            };
        }
        if let Some(host) = s.strip_prefix(KEY_PREFIX_LAST) {
            return if host.is_empty() {
                Err(err())
            } else {
                Ok(StoreKey::LastReport(host.to_string()))
            };
        }
        Err(err())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_key_prefers_tab() {
        assert_eq!(
            StoreKey::primary(Some(TabId(42)), "example.com").to_string(),
            "report_tab_42"
        );
        assert_eq!(
            StoreKey::primary(None, "example.com").to_string(),
            "report_host_example.com"
        );
        assert_eq!(
            StoreKey::last_report("example.com").to_string(),
            "last_report_example.com"
        );
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("report_tab_7".parse(), Ok(StoreKey::Tab(TabId(7))));
        assert_eq!(
            "report_host_a.example".parse(),
            Ok(StoreKey::Host("a.example".to_string()))
        );
        assert_eq!(
            "last_report_a.example".parse(),
            Ok(StoreKey::LastReport("a.example".to_string()))
        );
        assert!("report_tab_x".parse::<StoreKey>().is_err());
        assert!("report_host_".parse::<StoreKey>().is_err());
        assert!("example.com".parse::<StoreKey>().is_err());
    }
}
