//! Deep-link dispatch.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{DeeplinkError, Result};
use crate::manifest::Manifest;
use crate::query::ParameterSet;
use crate::route::{AuthorityMatch, HandlerId, RouteEntry, authority};
use crate::table::RouteTable;

/// Dispatch configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchOptions {
    /// How URI authorities are compared with route match keys.
    pub authority_match: AuthorityMatch,
}

/// A matched route together with the decoded query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'t> {
    entry: &'t RouteEntry,
    params: ParameterSet,
}

impl<'t> RouteMatch<'t> {
    /// Returns the matched entry.
    pub fn entry(&self) -> &'t RouteEntry {
        self.entry
    }

    /// Returns the handler to launch.
    pub fn handler(&self) -> &'t HandlerId {
        self.entry.handler()
    }

    /// Returns the pattern of the matched entry.
    pub fn pattern(&self) -> &'t str {
        self.entry.pattern()
    }

    /// Returns the decoded query parameters.
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// Consumes the match, returning its parameters.
    pub fn into_params(self) -> ParameterSet {
        self.params
    }
}

/// Outcome of resolving a deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'t> {
    /// The first matching route and its parameters.
    Resolved(RouteMatch<'t>),
    /// The URI was well formed but no route matched.
    Unresolved {
        /// The URI that was looked up.
        uri: String,
    },
    /// The input could not be parsed into scheme, authority and query.
    MalformedUri {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl<'t> Resolution<'t> {
    /// Returns true if a route matched.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Returns the matched handler, if any.
    pub fn handler(&self) -> Option<&'t HandlerId> {
        match self {
            Self::Resolved(m) => Some(m.handler()),
            _ => None,
        }
    }

    /// Converts the resolution into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`DeeplinkError::Unresolved`] or [`DeeplinkError::MalformedUri`]
    /// for the corresponding variants.
    pub fn into_result(self) -> Result<RouteMatch<'t>> {
        match self {
            Self::Resolved(m) => Ok(m),
            Self::Unresolved { uri } => Err(DeeplinkError::Unresolved(uri)),
            Self::MalformedUri { input, reason } => {
                Err(DeeplinkError::MalformedUri { input, reason })
            }
        }
    }
}

/// Turns a resolved route into a screen transition.
///
/// Implemented by the navigation layer, which maps the handler identifier to
/// a concrete screen.
pub trait Launcher {
    /// Error raised when the launch fails.
    type Error;

    /// Launches the screen for `target`.
    ///
    /// # Errors
    ///
    /// Returns the launcher's error if the screen cannot be started.
    fn launch(&mut self, target: &RouteMatch<'_>) -> std::result::Result<(), Self::Error>;
}

impl<F, E> Launcher for F
where
    F: FnMut(&RouteMatch<'_>) -> std::result::Result<(), E>,
{
    type Error = E;

    fn launch(&mut self, target: &RouteMatch<'_>) -> std::result::Result<(), E> {
        self(target)
    }
}

/// Resolves `url` against `table` with exact authority matching.
///
/// # Example
///
/// ```
/// use oxide_deeplink::{RouteTable, resolve};
///
/// let mut table = RouteTable::new();
/// table.register("demo://second_activity", "SecondActivity").unwrap();
///
/// let found = resolve(&table, "demo://second_activity?name=xingping")
///     .into_result()
///     .unwrap();
/// assert_eq!(found.handler().as_str(), "SecondActivity");
/// assert_eq!(found.params().get("name"), Some("xingping"));
/// ```
pub fn resolve<'t>(table: &'t RouteTable, url: &str) -> Resolution<'t> {
    resolve_with(table, url, DispatchOptions::default())
}

/// Resolves `url` against `table` with the given options.
///
/// Entries are scanned in registration order and the first one whose
/// authority matches wins.
pub fn resolve_with<'t>(
    table: &'t RouteTable,
    url: &str,
    options: DispatchOptions,
) -> Resolution<'t> {
    let uri = match parse_uri(url) {
        Ok(uri) => uri,
        Err(reason) => {
            debug!(uri = %url, %reason, "Malformed deep link");
            return Resolution::MalformedUri {
                input: url.to_string(),
                reason,
            };
        }
    };

    match table.find(&uri, options.authority_match) {
        Some(entry) => {
            let params = entry.extract_parameters(&uri);
            debug!(
                uri = %url,
                pattern = %entry.pattern(),
                handler = %entry.handler(),
                params = params.len(),
                "Resolved deep link"
            );
            Resolution::Resolved(RouteMatch { entry, params })
        }
        None => {
            debug!(uri = %url, "No route matched deep link");
            Resolution::Unresolved {
                uri: url.to_string(),
            }
        }
    }
}

fn parse_uri(url: &str) -> std::result::Result<Url, String> {
    let uri = Url::parse(url).map_err(|e| e.to_string())?;
    if authority(&uri).is_none() {
        return Err("missing authority".to_string());
    }
    Ok(uri)
}

/// Resolves deep links against a fixed route table.
///
/// The table is moved in at construction and never mutated afterwards, so a
/// dispatcher can be shared between threads by reference.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    table: RouteTable,
    options: DispatchOptions,
}

impl Dispatcher {
    /// Creates a dispatcher with default options.
    pub fn new(table: RouteTable) -> Self {
        Self::with_options(table, DispatchOptions::default())
    }

    /// Creates a dispatcher with explicit options.
    pub fn with_options(table: RouteTable, options: DispatchOptions) -> Self {
        Self { table, options }
    }

    /// Creates a dispatcher from a manifest.
    ///
    /// # Errors
    ///
    /// Returns [`DeeplinkError::InvalidPattern`] if a route pattern is unusable.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        Ok(Self::with_options(manifest.build_table()?, manifest.options))
    }

    /// Creates a dispatcher from a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns [`DeeplinkError::Manifest`] for invalid JSON and
    /// [`DeeplinkError::InvalidPattern`] for an unusable route pattern.
    pub fn from_manifest_json(json: &str) -> Result<Self> {
        Self::from_manifest(&Manifest::from_json(json)?)
    }

    /// Returns the route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Returns the dispatch options.
    pub fn options(&self) -> DispatchOptions {
        self.options
    }

    /// Resolves a deep link.
    pub fn resolve(&self, url: &str) -> Resolution<'_> {
        resolve_with(&self.table, url, self.options)
    }

    /// Resolves a deep link and hands the match to `launcher`.
    ///
    /// Returns `Ok(true)` if a screen was launched and `Ok(false)` if the
    /// link was malformed or matched no route.
    ///
    /// # Errors
    ///
    /// Propagates the launcher's error.
    pub fn open<L: Launcher>(
        &self,
        url: &str,
        launcher: &mut L,
    ) -> std::result::Result<bool, L::Error> {
        match self.resolve(url) {
            Resolution::Resolved(target) => {
                launcher.launch(&target)?;
                Ok(true)
            }
            Resolution::Unresolved { .. } => Ok(false),
            Resolution::MalformedUri { input, reason } => {
                warn!(uri = %input, %reason, "Cannot open malformed deep link");
                Ok(false)
            }
        }
    }
}
