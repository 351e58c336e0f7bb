//! Route entries and authority matching.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DeeplinkError, Result};
use crate::query::{ParameterSet, decode};

/// Opaque identifier of the screen a route launches.
///
/// The navigation layer maps identifiers to concrete screens; this crate
/// never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerId(Cow<'static, str>);

impl HandlerId {
    /// Creates an identifier from a static string without allocating.
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// Returns the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for HandlerId {
    fn from(id: &'static str) -> Self {
        Self::from_static(id)
    }
}

impl From<String> for HandlerId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

impl PartialEq<str> for HandlerId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for HandlerId {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A screen that declares its own deep-link pattern.
///
/// Usually implemented with `#[derive(Route)]`:
///
/// ```ignore
/// use oxide_deeplink::Route;
///
/// #[derive(Route)]
/// #[route("demo://second_activity")]
/// struct SecondActivity;
/// ```
pub trait Routable {
    /// URI pattern with scheme and authority, e.g. `demo://second_activity`.
    const PATTERN: &'static str;
    /// Identifier handed back when the route matches.
    const HANDLER_ID: &'static str;
}

/// How a URI authority is compared with a route's match key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorityMatch {
    /// Byte-for-byte comparison.
    #[default]
    Exact,
    /// ASCII case-insensitive comparison.
    IgnoreAsciiCase,
}

impl AuthorityMatch {
    fn compare(self, a: &str, b: &str) -> bool {
        match self {
            Self::Exact => a == b,
            Self::IgnoreAsciiCase => a.eq_ignore_ascii_case(b),
        }
    }
}

/// A registered deep-link route.
///
/// Only the authority (`host[:port]`) of the pattern takes part in matching;
/// its scheme and path are kept for display and URL generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// The original pattern string.
    pattern: String,
    /// Handler launched on match.
    handler: HandlerId,
    /// Parsed pattern, used to build links.
    url: Url,
    /// Authority extracted from the pattern.
    match_key: String,
}

impl RouteEntry {
    /// Creates a route entry.
    ///
    /// # Errors
    ///
    /// Returns [`DeeplinkError::InvalidPattern`] if the pattern is not an
    /// absolute URI with a non-empty authority.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_deeplink::RouteEntry;
    ///
    /// let entry = RouteEntry::new("demo://second_activity", "SecondActivity").unwrap();
    /// assert_eq!(entry.match_key(), "second_activity");
    /// ```
    pub fn new(pattern: impl Into<String>, handler: impl Into<HandlerId>) -> Result<Self> {
        let pattern = pattern.into();
        let url = Url::parse(&pattern).map_err(|e| DeeplinkError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        let match_key = authority(&url).ok_or_else(|| DeeplinkError::InvalidPattern {
            pattern: pattern.clone(),
            reason: "missing authority".to_string(),
        })?;

        Ok(Self {
            pattern,
            handler: handler.into(),
            url,
            match_key,
        })
    }

    /// Creates the entry declared by a [`Routable`] type.
    ///
    /// # Errors
    ///
    /// Returns [`DeeplinkError::InvalidPattern`] for an unusable pattern.
    pub fn of<R: Routable>() -> Result<Self> {
        Self::new(R::PATTERN, HandlerId::from_static(R::HANDLER_ID))
    }

    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the handler identifier.
    pub fn handler(&self) -> &HandlerId {
        &self.handler
    }

    /// Returns the authority this entry matches.
    pub fn match_key(&self) -> &str {
        &self.match_key
    }

    /// Returns true if the URI's authority equals this entry's match key.
    pub fn matches(&self, uri: &Url) -> bool {
        self.matches_with(uri, AuthorityMatch::Exact)
    }

    /// Like [`matches`](Self::matches) with an explicit comparison mode.
    pub fn matches_with(&self, uri: &Url, mode: AuthorityMatch) -> bool {
        authority(uri).is_some_and(|a| mode.compare(&a, &self.match_key))
    }

    /// Decodes the URI's query into parameters.
    pub fn extract_parameters(&self, uri: &Url) -> ParameterSet {
        uri.query().map(decode).unwrap_or_default()
    }

    /// Builds a deep link to this route carrying `params`.
    ///
    /// The parameters are appended to any query already in the pattern and
    /// always precede its fragment.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_deeplink::{ParameterSet, RouteEntry};
    ///
    /// let entry = RouteEntry::new("demo://second_activity", "SecondActivity").unwrap();
    /// let params: ParameterSet = [("name", "xingping")].into_iter().collect();
    /// assert_eq!(entry.url_for(&params), "demo://second_activity?name=xingping");
    /// ```
    pub fn url_for(&self, params: &ParameterSet) -> String {
        if params.is_empty() {
            return self.pattern.clone();
        }
        let mut link = self.url.clone();
        let query = match link.query() {
            Some(existing) if !existing.is_empty() => {
                format!("{existing}&{}", params.to_query_string())
            }
            _ => params.to_query_string(),
        };
        link.set_query(Some(&query));
        String::from(link)
    }
}

/// Returns `host[:port]`, or `None` when the URI has no usable authority.
pub(crate) fn authority(uri: &Url) -> Option<String> {
    let host = uri.host_str().filter(|h| !h.is_empty())?;
    Some(match uri.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_match_key_from_pattern() {
        let entry = RouteEntry::new("demo://second_activity/ignored?x=1", "Second").unwrap();
        assert_eq!(entry.match_key(), "second_activity");
        assert_eq!(entry.pattern(), "demo://second_activity/ignored?x=1");
        assert_eq!(entry.handler(), "Second");
    }

    #[test]
    fn test_match_key_includes_port() {
        let entry = RouteEntry::new("demo://host:8080", "H").unwrap();
        assert_eq!(entry.match_key(), "host:8080");
        assert!(entry.matches(&url("demo://host:8080/a")));
        assert!(!entry.matches(&url("demo://host")));
    }

    #[test]
    fn test_invalid_patterns() {
        for pattern in [
            "",
            "second_activity",
            "demo:second_activity",
            "demo://",
            "demo://:8080",
            "1bad://host",
        ] {
            assert!(
                matches!(
                    RouteEntry::new(pattern, "H"),
                    Err(DeeplinkError::InvalidPattern { .. })
                ),
                "pattern {pattern:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_matches_authority_only() {
        let entry = RouteEntry::new("demo://second_activity", "Second").unwrap();
        assert!(entry.matches(&url("demo://second_activity")));
        assert!(entry.matches(&url("other://second_activity/deep/path?a=1")));
        assert!(!entry.matches(&url("demo://third_activity")));
    }

    #[test]
    fn test_matches_is_case_sensitive_by_default() {
        let entry = RouteEntry::new("demo://Second", "Second").unwrap();
        assert!(!entry.matches(&url("demo://second")));
        assert!(entry.matches_with(&url("demo://second"), AuthorityMatch::IgnoreAsciiCase));
    }

    #[test]
    fn test_extract_parameters() {
        let entry = RouteEntry::new("demo://second_activity", "Second").unwrap();
        let params = entry.extract_parameters(&url("demo://second_activity?name=xingping#top"));
        assert_eq!(params.get("name"), Some("xingping"));
        assert_eq!(params.len(), 1);

        let empty = entry.extract_parameters(&url("demo://second_activity"));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_url_for() {
        let entry = RouteEntry::new("demo://search", "Search").unwrap();
        let params: ParameterSet = [("q", "rust lang")].into_iter().collect();
        assert_eq!(entry.url_for(&params), "demo://search?q=rust%20lang");
        assert_eq!(entry.url_for(&ParameterSet::new()), "demo://search");
    }

    #[test]
    fn test_url_for_keeps_query_before_fragment() {
        let entry = RouteEntry::new("demo://search#results", "Search").unwrap();
        let params: ParameterSet = [("q", "rust")].into_iter().collect();
        let link = entry.url_for(&params);
        assert_eq!(link, "demo://search?q=rust#results");

        let parsed = url(&link);
        assert!(entry.matches(&parsed));
        assert_eq!(entry.extract_parameters(&parsed), params);
    }

    #[test]
    fn test_url_for_extends_existing_query() {
        let entry = RouteEntry::new("demo://search?lang=en#a?b", "Search").unwrap();
        let params: ParameterSet = [("q", "rust")].into_iter().collect();
        let link = entry.url_for(&params);
        assert_eq!(link, "demo://search?lang=en&q=rust#a?b");

        let decoded = entry.extract_parameters(&url(&link));
        assert_eq!(decoded.get("lang"), Some("en"));
        assert_eq!(decoded.get("q"), Some("rust"));
    }

    #[test]
    fn test_handler_id_conversions() {
        let borrowed = HandlerId::from("Screen");
        let owned = HandlerId::from(String::from("Screen"));
        assert_eq!(borrowed, owned);
        assert_eq!(borrowed.to_string(), "Screen");
    }
}
