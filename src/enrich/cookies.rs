//! Cookie lookup for a hostname.

use std::sync::RwLock;

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;

use crate::config::HEADER_SET_COOKIE;
use crate::models::{Cookie, SameSite};

/// Source of the cookies visible for a domain.
///
/// Errors are allowed at this seam, but the enrichment pipeline treats any
/// failure as an empty cookie list.
pub trait CookieSource: Send + Sync {
    fn get_cookies<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, anyhow::Result<Vec<Cookie>>>;
}

/// True when a cookie for `cookie_domain` is returned by a lookup for
/// `domain`: the domains are equal or the cookie's is a subdomain.
pub fn domain_matches(cookie_domain: &str, domain: &str) -> bool {
    let cookie_domain = cookie_domain.trim_start_matches('.').to_ascii_lowercase();
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }
    cookie_domain == domain || cookie_domain.ends_with(&format!(".{domain}"))
}

/// One parsed `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub cookie: Cookie,
    /// `Max-Age<=0` or an `Expires` in the past: the cookie is being removed.
    pub expired: bool,
}

/// Parses a `Set-Cookie` header value received from `request_host`.
///
/// Returns `None` for headers without a `name=value` pair and for cookies
/// whose `Domain` attribute the request host may not set.
pub fn parse_set_cookie(header: &str, request_host: &str) -> Option<SetCookie> {
    let mut parts = header.split(';');
    let (name, value) = parts.next()?.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let request_host = request_host.to_ascii_lowercase();

    let mut cookie = Cookie {
        name: name.to_string(),
        value: value.trim().trim_matches('"').to_string(),
        domain: request_host.clone(),
        path: "/".to_string(),
        secure: false,
        http_only: false,
        same_site: SameSite::Unspecified,
        host_only: true,
        session: true,
    };
    let mut expired = false;

    for attribute in parts {
        let (key, val) = match attribute.split_once('=') {
            Some((k, v)) => (k.trim(), v.trim()),
            None => (attribute.trim(), ""),
        };
        match key.to_ascii_lowercase().as_str() {
            "domain" if !val.is_empty() => {
                let domain = val.trim_start_matches('.').to_ascii_lowercase();
                if !domain_matches(&request_host, &domain) {
                    log::debug!(
                        "Rejecting cookie '{}': {} may not set Domain={}",
                        cookie.name,
                        request_host,
                        domain
                    );
                    return None;
                }
                cookie.domain = domain;
                cookie.host_only = false;
            }
            "path" if val.starts_with('/') => cookie.path = val.to_string(),
            "secure" => cookie.secure = true,
            "httponly" => cookie.http_only = true,
            "samesite" => {
                cookie.same_site = match val.to_ascii_lowercase().as_str() {
                    "lax" => SameSite::Lax,
                    "strict" => SameSite::Strict,
                    "none" => SameSite::NoRestriction,
                    _ => SameSite::Unspecified,
                }
            }
            "max-age" => {
                if let Ok(seconds) = val.parse::<i64>() {
                    cookie.session = false;
                    expired = seconds <= 0;
                }
            }
            "expires" => {
                if let Ok(when) = DateTime::parse_from_rfc2822(val) {
                    cookie.session = false;
                    expired = when.with_timezone(&Utc) <= Utc::now();
                }
            }
            _ => {}
        }
    }

    Some(SetCookie { cookie, expired })
}

/// In-memory cookie store filled from page responses.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: RwLock<Vec<Cookie>>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a cookie. Identity is `(name, domain, path)`.
    pub fn insert(&self, cookie: Cookie) {
        let mut cookies = self
            .cookies
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        cookies.retain(|c| !same_identity(c, &cookie));
        cookies.push(cookie);
    }

    pub fn remove(&self, cookie: &Cookie) {
        self.cookies
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .retain(|c| !same_identity(c, cookie));
    }

    /// Applies every `Set-Cookie` header in `headers` for a response from
    /// `request_host`. Returns the number of headers accepted.
    pub fn store_response_cookies(
        &self,
        headers: &reqwest::header::HeaderMap,
        request_host: &str,
    ) -> usize {
        let mut accepted = 0;
        for value in headers.get_all(HEADER_SET_COOKIE) {
            let Ok(raw) = value.to_str() else {
                log::debug!("Ignoring non-UTF-8 Set-Cookie header from {}", request_host);
                continue;
            };
            match parse_set_cookie(raw, request_host) {
                Some(parsed) if parsed.expired => self.remove(&parsed.cookie),
                Some(parsed) => {
                    self.insert(parsed.cookie);
                    accepted += 1;
                }
                None => log::debug!("Ignoring unusable Set-Cookie header from {}", request_host),
            }
        }
        accepted
    }

    /// Cookies whose domain equals `domain` or is a subdomain of it, in
    /// insertion order.
    pub fn cookies_for(&self, domain: &str) -> Vec<Cookie> {
        self.cookies
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|c| domain_matches(&c.domain, domain))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cookies
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn same_identity(a: &Cookie, b: &Cookie) -> bool {
    a.name == b.name && a.domain == b.domain && a.path == b.path
}

impl CookieSource for CookieJar {
    fn get_cookies<'a>(&'a self, domain: &'a str) -> BoxFuture<'a, anyhow::Result<Vec<Cookie>>> {
        Box::pin(async move { Ok(self.cookies_for(domain)) })
    }
}
