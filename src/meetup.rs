//! Meetup annotation: coordinates and point tier for a new meetup.

use crate::location::{CampusLocation, LocationResolver, MatchRule};
use crate::points::{PointClassification, PointsError, PointsTable};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MeetupError {
    #[error(transparent)]
    Points(#[from] PointsError),

    #[error("location '{0}' is unresolved and the gazetteer has no default location")]
    NoLocation(String),
}

/// What the meetup-creation flow stores alongside a new meetup.
#[derive(Debug, Clone, Serialize)]
pub struct MeetupAnnotation {
    pub location: CampusLocation,
    /// `None` when the text was unresolved and the default was applied.
    pub matched_rule: Option<MatchRule>,
    pub tier: PointClassification,
    pub reward: u32,
}

impl MeetupAnnotation {
    pub fn used_default(&self) -> bool {
        self.matched_rule.is_none()
    }
}

/// Resolve the meetup's location text (falling back to the library) and
/// classify its lobby size.
pub fn annotate_meetup(
    resolver: &LocationResolver<'_>,
    table: &PointsTable,
    location_text: &str,
    lobby_size: i64,
) -> Result<MeetupAnnotation, MeetupError> {
    let tier = table.classify(lobby_size)?;

    let result = resolver.resolve_description(location_text);
    let location = match result.location() {
        Some(loc) => loc,
        None => {
            let fallback = resolver
                .default_location()
                .ok_or_else(|| MeetupError::NoLocation(location_text.to_string()))?;
            tracing::info!(location_text, fallback = %fallback.id, "meetup location unresolved, using default");
            fallback
        }
    };

    Ok(MeetupAnnotation {
        location: location.clone(),
        matched_rule: result.rule(),
        tier: tier.clone(),
        reward: tier.base_points,
    })
}
