//! Campus Compass: campus location resolution and meetup points.
//!
//! Two pure engines over immutable reference data: a resolver that maps
//! free-text location references to gazetteer entries, and a tier table that
//! turns lobby sizes into point rewards and point totals into levels.

pub mod location;
pub mod meetup;
pub mod points;
pub mod server;

pub use location::{CampusLocation, Gazetteer, LocationResolver, MatchResult, MatchRule};
pub use meetup::{annotate_meetup, MeetupAnnotation};
pub use points::{level_for, LevelInfo, PointClassification, PointsError, PointsTable, UserProgress};
