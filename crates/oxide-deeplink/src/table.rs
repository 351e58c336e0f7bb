//! Ordered route table.

use tracing::debug;
use url::Url;

use crate::error::Result;
use crate::route::{AuthorityMatch, HandlerId, Routable, RouteEntry};

/// An ordered collection of routes.
///
/// Registration order is significant: when several entries share an
/// authority, the earliest one wins. Duplicates are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route for `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`DeeplinkError::InvalidPattern`](crate::DeeplinkError::InvalidPattern)
    /// if the pattern has no authority.
    pub fn register(
        &mut self,
        pattern: impl Into<String>,
        handler: impl Into<HandlerId>,
    ) -> Result<&mut Self> {
        let entry = RouteEntry::new(pattern, handler)?;
        Ok(self.push(entry))
    }

    /// Registers the route declared by a [`Routable`] type.
    ///
    /// # Errors
    ///
    /// Returns [`DeeplinkError::InvalidPattern`](crate::DeeplinkError::InvalidPattern)
    /// if the declared pattern has no authority.
    pub fn register_routable<R: Routable>(&mut self) -> Result<&mut Self> {
        let entry = RouteEntry::of::<R>()?;
        Ok(self.push(entry))
    }

    /// Appends an already constructed entry.
    pub fn push(&mut self, entry: RouteEntry) -> &mut Self {
        debug!(
            pattern = %entry.pattern(),
            handler = %entry.handler(),
            position = self.entries.len(),
            "Registered route"
        );
        self.entries.push(entry);
        self
    }

    /// Returns the first entry whose authority matches `uri`.
    pub fn find(&self, uri: &Url, mode: AuthorityMatch) -> Option<&RouteEntry> {
        self.entries.iter().find(|e| e.matches_with(uri, mode))
    }

    /// Returns an iterator over the entries in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, RouteEntry> {
        self.entries.iter()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a RouteEntry;
    type IntoIter = std::slice::Iter<'a, RouteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Builds a [`RouteTable`] from [`Routable`] types, in the listed order.
///
/// Evaluates to `Result<RouteTable>`.
///
/// ```ignore
/// let table = route_table![MainActivity, SecondActivity]?;
/// ```
#[macro_export]
macro_rules! route_table {
    ($($screen:ty),* $(,)?) => {
        (|| -> $crate::Result<$crate::RouteTable> {
            #[allow(unused_mut)]
            let mut table = $crate::RouteTable::new();
            $( table.register_routable::<$screen>()?; )*
            Ok(table)
        })()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeeplinkError;

    struct Profile;

    impl Routable for Profile {
        const PATTERN: &'static str = "demo://profile";
        const HANDLER_ID: &'static str = "ProfileScreen";
    }

    struct Broken;

    impl Routable for Broken {
        const PATTERN: &'static str = "profile";
        const HANDLER_ID: &'static str = "Broken";
    }

    #[test]
    fn test_register_preserves_order() {
        let mut table = RouteTable::new();
        table
            .register("demo://a", "A")
            .unwrap()
            .register("demo://b", "B")
            .unwrap()
            .register("demo://a", "A2")
            .unwrap();

        let handlers: Vec<_> = table.iter().map(|e| e.handler().as_str()).collect();
        assert_eq!(handlers, vec!["A", "B", "A2"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_register_rejects_invalid_pattern() {
        let mut table = RouteTable::new();
        let err = table.register("no-scheme", "X").unwrap_err();
        assert!(matches!(err, DeeplinkError::InvalidPattern { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_find_first_match() {
        let mut table = RouteTable::new();
        table.register("demo://a", "First").unwrap();
        table.register("demo://a", "Second").unwrap();

        let uri = Url::parse("demo://a?x=1").unwrap();
        let entry = table.find(&uri, AuthorityMatch::Exact).unwrap();
        assert_eq!(entry.handler(), "First");

        let other = Url::parse("demo://b").unwrap();
        assert!(table.find(&other, AuthorityMatch::Exact).is_none());
    }

    #[test]
    fn test_register_routable() {
        let mut table = RouteTable::new();
        table.register_routable::<Profile>().unwrap();
        let entry = table.iter().next().unwrap();
        assert_eq!(entry.pattern(), "demo://profile");
        assert_eq!(entry.handler(), "ProfileScreen");
    }

    #[test]
    fn test_route_table_macro() {
        let table = crate::route_table![Profile].unwrap();
        assert_eq!(table.len(), 1);

        let empty = crate::route_table![].unwrap();
        assert!(empty.is_empty());

        assert!(crate::route_table![Profile, Broken].is_err());
    }
}
