//! Campus location resolution.
//!
//! Provides the built-in gazetteer, the ordered matcher chain, JSON
//! overrides, and reconciliation against the legacy building table.

pub mod gazetteer;
pub mod loader;
pub mod matchers;
pub mod reconcile;
pub mod resolver;
pub mod types;

pub use gazetteer::{format_coords, Collision, Gazetteer};
pub use matchers::{normalize, LIBRARY_ID};
pub use reconcile::{reconcile, Discrepancy, Reconciliation, LEGACY_BUILDINGS};
pub use resolver::{extract_location_fragment, LocationResolver};
pub use types::{CampusLocation, LocationError, MatchResult, MatchRule};
