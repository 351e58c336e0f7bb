//! Route manifests produced by build-time tooling.
//!
//! A manifest is the serialized form of a route table plus dispatch options:
//!
//! ```json
//! {
//!   "options": { "authority_match": "exact" },
//!   "routes": [
//!     { "pattern": "demo://second_activity", "handler": "SecondActivity" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::dispatch::DispatchOptions;
use crate::error::Result;
use crate::route::HandlerId;
use crate::table::RouteTable;

/// One route in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRoute {
    /// URI pattern with scheme and authority.
    pub pattern: String,
    /// Handler identifier.
    pub handler: HandlerId,
}

/// A serialized route table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Dispatch options.
    #[serde(default)]
    pub options: DispatchOptions,
    /// Routes in registration order.
    pub routes: Vec<ManifestRoute>,
}

impl Manifest {
    /// Parses a manifest from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DeeplinkError::Manifest`](crate::DeeplinkError::Manifest) on
    /// malformed JSON or a missing `routes` field.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the manifest to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DeeplinkError::Manifest`](crate::DeeplinkError::Manifest) if
    /// serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Captures a table's routes with the given options.
    pub fn from_table(table: &RouteTable, options: DispatchOptions) -> Self {
        let routes = table
            .iter()
            .map(|e| ManifestRoute {
                pattern: e.pattern().to_string(),
                handler: e.handler().clone(),
            })
            .collect();
        Self { options, routes }
    }

    /// Builds the route table described by this manifest.
    ///
    /// # Errors
    ///
    /// Returns [`DeeplinkError::InvalidPattern`](crate::DeeplinkError::InvalidPattern)
    /// for the first route whose pattern has no authority.
    pub fn build_table(&self) -> Result<RouteTable> {
        let mut table = RouteTable::new();
        for route in &self.routes {
            table.register(route.pattern.clone(), route.handler.clone())?;
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DeeplinkError;
    use crate::route::AuthorityMatch;

    const MANIFEST: &str = r#"{
        "options": { "authority_match": "ignore_ascii_case" },
        "routes": [
            { "pattern": "demo://second_activity", "handler": "SecondActivity" },
            { "pattern": "demo://settings", "handler": "SettingsActivity" }
        ]
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_json(MANIFEST).unwrap();
        assert_eq!(manifest.options.authority_match, AuthorityMatch::IgnoreAsciiCase);
        assert_eq!(manifest.routes.len(), 2);
        assert_eq!(manifest.routes[1].handler, "SettingsActivity");
    }

    #[test]
    fn test_options_default_when_absent() {
        let manifest = Manifest::from_json(r#"{"routes": []}"#).unwrap();
        assert_eq!(manifest.options, DispatchOptions::default());
        assert!(manifest.build_table().unwrap().is_empty());
    }

    #[test]
    fn test_build_table_keeps_order() {
        let table = Manifest::from_json(MANIFEST).unwrap().build_table().unwrap();
        let patterns: Vec<_> = table.iter().map(|e| e.pattern()).collect();
        assert_eq!(patterns, vec!["demo://second_activity", "demo://settings"]);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            Manifest::from_json(r#"{"routes": 3}"#),
            Err(DeeplinkError::Manifest(_))
        ));
    }

    #[test]
    fn test_invalid_pattern_in_manifest() {
        let manifest =
            Manifest::from_json(r#"{"routes": [{"pattern": "nope", "handler": "X"}]}"#).unwrap();
        assert!(matches!(
            manifest.build_table(),
            Err(DeeplinkError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_table_to_manifest_and_back() {
        let mut table = RouteTable::new();
        table.register("demo://a", "A").unwrap();
        table.register("demo://b:9000", "B").unwrap();

        let json = Manifest::from_table(&table, DispatchOptions::default())
            .to_json()
            .unwrap();
        let rebuilt = Manifest::from_json(&json).unwrap().build_table().unwrap();
        assert_eq!(rebuilt, table);
    }
}
