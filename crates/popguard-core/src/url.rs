//! URL canonicalization for navigation-identity comparison.
//!
//! Two URLs name the same navigation target iff their canonical forms are
//! byte-equal. Canonicalization resolves the URL against the current page,
//! then:
//!
//! 1. reduces a target on the page's own origin (scheme, host and port,
//!    default ports included) to its path, and a target on the page's own
//!    path to nothing, turning same-page URLs into relative form;
//! 2. drops the fragment;
//! 3. sorts the `&`-separated query tokens lexicographically.
//!
//! Origins are compared component by component on the resolved URL, never
//! as text prefixes, so `https://x.com.evil.com/` never matches a page on
//! `https://x.com` and `https://x.com//evil.com/` stays distinct from
//! `//evil.com/`. The output is for equality only; it is never displayed or
//! followed.

use std::fmt;

use url::{Position, Url};

use crate::error::{EngineError, EngineResult};

/// Parsed location of the current document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLocation {
    base: Url,
    protocol: String,
    host: String,
}

impl PageLocation {
    /// Parse the current document URL.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidPageLocation`] if `href` is not an
    /// absolute URL.
    pub fn parse(href: &str) -> EngineResult<Self> {
        let base = Url::parse(href).map_err(|e| EngineError::InvalidPageLocation {
            url: href.to_string(),
            reason: e.to_string(),
        })?;

        let protocol = format!("{}:", base.scheme());
        let host = match (base.host_str(), base.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };

        Ok(Self {
            base,
            protocol,
            host,
        })
    }

    /// The full location.
    #[must_use]
    pub fn href(&self) -> &str {
        self.base.as_str()
    }

    /// Scheme with trailing colon, e.g. `https:`.
    #[must_use]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    /// Host including a non-default port.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Path component, always starting with `/` for hierarchical URLs.
    #[must_use]
    pub fn path(&self) -> &str {
        self.base.path()
    }

    /// The current fragment including its `#`, or an empty string.
    #[must_use]
    pub fn fragment(&self) -> String {
        self.base
            .fragment()
            .map_or_else(String::new, |f| format!("#{f}"))
    }

    /// Whether the document was served over a secure transport.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base.scheme() == "https"
    }

    /// `protocol//host` of the page.
    #[must_use]
    pub fn origin_prefix(&self) -> String {
        format!("{}//{}", self.protocol, self.host)
    }

    /// Canonicalize `url` relative to this page. See [`canonicalize`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidUrl`] if `url` cannot be resolved.
    pub fn canonicalize(&self, url: &str) -> EngineResult<String> {
        canonicalize(url, self)
    }
}

impl fmt::Display for PageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)
    }
}

/// Canonicalize `url` for equality comparison against other URLs seen on
/// the same page.
///
/// # Errors
///
/// Returns [`EngineError::InvalidUrl`] if `url` contains control characters
/// or does not resolve against the page location.
pub fn canonicalize(url: &str, page: &PageLocation) -> EngineResult<String> {
    if let Some(c) = url.chars().find(|c| c.is_control()) {
        return Err(EngineError::InvalidUrl {
            url: url.escape_debug().to_string(),
            reason: format!("contains control character {c:?}"),
        });
    }
    let resolved = page.base.join(url).map_err(|e| EngineError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    // A same-origin path starting with `//` would read back as a
    // scheme-relative URL, so it keeps its origin.
    let target = if !same_origin(&resolved, &page.base) || resolved.path().starts_with("//") {
        &resolved[..Position::AfterPath]
    } else if resolved.path() == page.base.path() {
        ""
    } else {
        resolved.path()
    };

    Ok(match resolved.query() {
        Some(query) => format!("{target}?{}", sort_query(query)),
        None => target.to_string(),
    })
}

/// Whether two URLs canonicalize to the same navigation target.
///
/// Any canonicalization failure counts as "not the same".
#[must_use]
pub fn same_target(a: &str, b: &str, page: &PageLocation) -> bool {
    match (canonicalize(a, page), canonicalize(b, page)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

fn sort_query(query: &str) -> String {
    let mut params: Vec<&str> = query.split('&').collect();
    params.sort_unstable();
    params.join("&")
}

#[cfg(test)]
#[path = "url_tests.rs"]
mod tests;
