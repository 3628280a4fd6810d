//! Reconciliation of the legacy flat building table against the gazetteer.
//!
//! Per axis the coordinate with more decimal places wins. Entries whose two
//! positions are further apart than `DISCREPANCY_THRESHOLD_M` are reported
//! for manual review; the gazetteer's value is never silently overridden by
//! a less precise one.

use super::gazetteer::Gazetteer;
use super::resolver::LocationResolver;
use super::types::{CampusLocation, LocationError, MatchRule};
use serde::Serialize;

/// Earth's radius in metres
const EARTH_RADIUS_M: f64 = 6_371_000.0;

pub const DISCREPANCY_THRESHOLD_M: f64 = 30.0;

/// Legacy tables are keyed by display name, so only exact rules apply.
const LEGACY_CHAIN: &[MatchRule] = &[
    MatchRule::Library,
    MatchRule::ExactName,
    MatchRule::ExactAlias,
    MatchRule::RawName,
];

/// One row of a flat building-name to coordinate table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegacyCoordinate<'a> {
    pub name: &'a str,
    pub lat: f64,
    pub lng: f64,
}

const fn legacy(name: &'static str, lat: f64, lng: f64) -> LegacyCoordinate<'static> {
    LegacyCoordinate { name, lat, lng }
}

/// The historical building table used by the map view.
pub const LEGACY_BUILDINGS: &[LegacyCoordinate<'static>] = &[
    legacy("McDermott Library", 32.9871, -96.7476),
    legacy("Student Union", 32.98687, -96.74903),
    legacy("ECSN", 32.9884, -96.7501),
    legacy("ECSS", 32.9864, -96.7506),
    legacy("ECSW", 32.98603, -96.75181),
    legacy("JSOM", 32.985, -96.7475),
    legacy("SSB", 32.9852, -96.7495),
    legacy("Activity Center", 32.9855, -96.7507),
    legacy("Founders Building", 32.9879, -96.7486),
    legacy("Plinth", 32.9866, -96.7484),
    legacy("Spirit Rocks", 32.98471234, -96.74984412),
    legacy("Callier Center", 32.9939, -96.7519),
    legacy("Waterview Science and Technology Center", 32.9925, -96.7361),
];

/// A legacy coordinate that disagrees with the gazetteer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
    pub id: String,
    pub legacy_name: String,
    pub gazetteer: (f64, f64),
    pub legacy: (f64, f64),
    pub distance_m: f64,
}

/// Result of merging a legacy table into a gazetteer.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub gazetteer: Gazetteer,
    /// Ids whose coordinates took a more precise legacy value.
    pub refined: Vec<String>,
    pub discrepancies: Vec<Discrepancy>,
    /// Legacy names that matched no gazetteer entry.
    pub unmatched: Vec<String>,
}

/// Great-circle distance in metres (Haversine).
pub fn distance_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Decimal places in the shortest round-trip rendering of `value`.
pub fn decimal_places(value: f64) -> usize {
    value
        .to_string()
        .split_once('.')
        .map_or(0, |(_, frac)| frac.len())
}

fn more_precise(current: f64, candidate: f64) -> f64 {
    if decimal_places(candidate) > decimal_places(current) {
        candidate
    } else {
        current
    }
}

pub fn reconcile(gazetteer: &Gazetteer, legacy: &[LegacyCoordinate<'_>]) -> Result<Reconciliation, LocationError> {
    let resolver = LocationResolver::with_chain(gazetteer, LEGACY_CHAIN);
    let mut merged: Vec<CampusLocation> = gazetteer.locations().to_vec();
    let mut refined = Vec::new();
    let mut discrepancies = Vec::new();
    let mut unmatched = Vec::new();

    for row in legacy {
        let Some(id) = resolver.resolve(row.name).id() else {
            unmatched.push(row.name.to_string());
            continue;
        };
        let Some(target) = merged.iter_mut().find(|l| l.id == id) else {
            continue;
        };

        let distance = distance_m(target.lat, target.lng, row.lat, row.lng);
        if distance > DISCREPANCY_THRESHOLD_M {
            tracing::warn!(
                id,
                legacy_name = row.name,
                distance_m = distance,
                "legacy coordinate disagrees with gazetteer"
            );
            discrepancies.push(Discrepancy {
                id: id.to_string(),
                legacy_name: row.name.to_string(),
                gazetteer: (target.lat, target.lng),
                legacy: (row.lat, row.lng),
                distance_m: distance,
            });
        }

        let lat = more_precise(target.lat, row.lat);
        let lng = more_precise(target.lng, row.lng);
        if lat != target.lat || lng != target.lng {
            target.lat = lat;
            target.lng = lng;
            if !refined.iter().any(|r| r == id) {
                refined.push(id.to_string());
            }
        }
    }

    Ok(Reconciliation {
        gazetteer: Gazetteer::new(merged)?,
        refined,
        discrepancies,
        unmatched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_decimal_places() {
        assert_eq!(decimal_places(32.9871), 4);
        assert_eq!(decimal_places(-96.74984412), 8);
        assert_eq!(decimal_places(33.0), 0);
    }

    #[test]
    fn test_distance_m() {
        assert!(distance_m(32.98712, -96.74761, 32.98712, -96.74761) < 0.01);
        // 0.001 degrees of latitude is about 111 m
        assert_abs_diff_eq!(distance_m(32.0, -96.0, 32.001, -96.0), 111.2, epsilon = 0.5);
    }

    #[test]
    fn test_builtin_reconciliation() {
        let result = reconcile(Gazetteer::builtin(), LEGACY_BUILDINGS).unwrap();

        assert_eq!(result.unmatched, vec!["Waterview Science and Technology Center"]);

        assert_eq!(result.discrepancies.len(), 1);
        let callier = &result.discrepancies[0];
        assert_eq!(callier.id, "callier");
        assert!(callier.distance_m > 400.0);

        assert_eq!(result.refined, vec!["spirit-rocks"]);
        let rocks = result.gazetteer.get_by_id("spirit-rocks").unwrap();
        assert_abs_diff_eq!(rocks.lat, 32.98471234, epsilon = 1e-12);

        // less precise legacy values never replace gazetteer coordinates
        let callier = result.gazetteer.get_by_id("callier").unwrap();
        assert_abs_diff_eq!(callier.lat, 32.989240, epsilon = 1e-12);
        let library = result.gazetteer.get_by_id("library").unwrap();
        assert_abs_diff_eq!(library.lat, 32.987120, epsilon = 1e-12);
    }

    #[test]
    fn test_reconcile_keeps_order_and_size() {
        let result = reconcile(Gazetteer::builtin(), LEGACY_BUILDINGS).unwrap();
        let before: Vec<&str> = Gazetteer::builtin().locations().iter().map(|l| l.id.as_str()).collect();
        let after: Vec<&str> = result.gazetteer.locations().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_fuzzy_legacy_names_do_not_match() {
        let rows = [LegacyCoordinate { name: "Jindal", lat: 32.98, lng: -96.74 }];
        let result = reconcile(Gazetteer::builtin(), &rows).unwrap();
        assert_eq!(result.unmatched, vec!["Jindal"]);
        assert!(result.refined.is_empty());
    }
}
