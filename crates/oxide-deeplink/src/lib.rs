//! # oxide-deeplink
//!
//! Deep-link routing for applications that open screens from URIs such as
//! `demo://second_activity?name=xingping`.
//!
//! This crate provides:
//! - Query string decoding into ordered parameters
//! - Route entries keyed on the URI authority
//! - An ordered route table with first-match-wins resolution
//! - Compile-time registration through `#[derive(Route)]`
//! - JSON route manifests for tables generated at build time
//!
//! ## Quick Start
//!
//! ```ignore
//! use oxide_deeplink::{Dispatcher, Route, route_table};
//!
//! #[derive(Route)]
//! #[route("demo://second_activity")]
//! struct SecondActivity;
//!
//! let dispatcher = Dispatcher::new(route_table![SecondActivity]?);
//!
//! let found = dispatcher
//!     .resolve("demo://second_activity?name=xingping")
//!     .into_result()?;
//! assert_eq!(found.handler().as_str(), "SecondActivity");
//! assert_eq!(found.params().get("name"), Some("xingping"));
//! ```
//!
//! ## Matching
//!
//! Only the authority (`host[:port]`) of a URI is compared. Scheme and path
//! are ignored, so `demo://second_activity/anything` and
//! `other://second_activity` both reach the route registered as
//! `demo://second_activity`. When several routes share an authority the one
//! registered first wins.
//!
//! ## Launching
//!
//! The crate never creates screens. Implement [`Launcher`] to map the
//! returned [`HandlerId`] to a screen:
//!
//! ```ignore
//! struct Navigator;
//!
//! impl Launcher for Navigator {
//!     type Error = std::convert::Infallible;
//!
//!     fn launch(&mut self, target: &RouteMatch<'_>) -> Result<(), Self::Error> {
//!         // start the screen named by target.handler()
//!         Ok(())
//!     }
//! }
//!
//! dispatcher.open("demo://second_activity?name=xingping", &mut Navigator)?;
//! ```

mod dispatch;
mod error;
mod manifest;
mod query;
mod route;
mod table;

pub use dispatch::{
    DispatchOptions, Dispatcher, Launcher, Resolution, RouteMatch, resolve, resolve_with,
};
pub use error::{DeeplinkError, Result};
pub use manifest::{Manifest, ManifestRoute};
pub use oxide_deeplink_derive::Route;
pub use query::{ParameterSet, decode};
pub use route::{AuthorityMatch, HandlerId, Routable, RouteEntry};
pub use table::RouteTable;
pub use url::Url;
