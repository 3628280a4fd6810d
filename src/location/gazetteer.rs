//! The campus gazetteer: built-in dataset, id index, and picker search.

use super::matchers::{normalize, strip_filler_words};
use super::types::{CampusLocation, LocationError};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::OnceLock;

// ─── Built-in dataset ───────────────────────────────────────────

struct BuiltinLocation {
    id: &'static str,
    name: &'static str,
    lat: f64,
    lng: f64,
    description: Option<&'static str>,
    aliases: &'static [&'static str],
}

const BUILTIN_LOCATIONS: &[BuiltinLocation] = &[
    BuiltinLocation {
        id: "library",
        name: "Eugene McDermott Library",
        lat: 32.987120, lng: -96.747610,
        description: Some("Main campus library, study rooms on floors 2-4"),
        aliases: &["McDermott", "Main Library", "MCL"],
    },
    BuiltinLocation {
        id: "student-union",
        name: "Student Union",
        lat: 32.986870, lng: -96.749030,
        description: Some("Food court, Comet Cafe, and meeting rooms"),
        aliases: &["The Union", "Comet Cafe"],
    },
    BuiltinLocation {
        id: "ecsn",
        name: "Engineering and Computer Science North",
        lat: 32.988380, lng: -96.750110,
        description: None,
        aliases: &["ECSN", "Engineering North"],
    },
    BuiltinLocation {
        id: "ecss",
        name: "Engineering and Computer Science South",
        lat: 32.986360, lng: -96.750570,
        description: Some("Computer labs and CS advising"),
        aliases: &["ECSS", "Engineering South"],
    },
    BuiltinLocation {
        id: "ecsw",
        name: "Engineering and Computer Science West",
        lat: 32.986030, lng: -96.751810,
        description: Some("Makerspace and the west courtyard"),
        aliases: &["ECSW", "Engineering West"],
    },
    BuiltinLocation {
        id: "jsom",
        name: "Naveen Jindal School of Management",
        lat: 32.984960, lng: -96.747520,
        description: None,
        aliases: &["JSOM", "Jindal School", "School of Management"],
    },
    BuiltinLocation {
        id: "ssb",
        name: "Student Services Building",
        lat: 32.985170, lng: -96.749510,
        description: Some("Advising, career center, and registrar"),
        aliases: &["SSB", "Student Services"],
    },
    BuiltinLocation {
        id: "activity-center",
        name: "Activity Center",
        lat: 32.985510, lng: -96.750670,
        description: Some("Gym, pool, and courts"),
        aliases: &["Recreation Center", "Gym"],
    },
    BuiltinLocation {
        id: "founders",
        name: "Founders Building",
        lat: 32.987870, lng: -96.748620,
        description: None,
        aliases: &["Founders"],
    },
    BuiltinLocation {
        id: "green-hall",
        name: "Cecil H. Green Hall",
        lat: 32.988460, lng: -96.748370,
        description: None,
        aliases: &["Green Hall"],
    },
    BuiltinLocation {
        id: "jonsson",
        name: "Erik Jonsson Academic Center",
        lat: 32.988010, lng: -96.749390,
        description: None,
        aliases: &["Jonsson"],
    },
    BuiltinLocation {
        id: "berkner",
        name: "Berkner Hall",
        lat: 32.988920, lng: -96.750720,
        description: None,
        aliases: &["Berkner"],
    },
    BuiltinLocation {
        id: "sciences",
        name: "Sciences Building",
        lat: 32.988760, lng: -96.749620,
        description: None,
        aliases: &[],
    },
    BuiltinLocation {
        id: "bsb",
        name: "Bioengineering and Sciences Building",
        lat: 32.985630, lng: -96.752640,
        description: None,
        aliases: &["BSB"],
    },
    BuiltinLocation {
        id: "atec",
        name: "Edith O'Donnell Arts and Technology Building",
        lat: 32.985990, lng: -96.746730,
        description: Some("Gaming labs and the ATEC lobby"),
        aliases: &["ATEC", "Arts and Technology"],
    },
    BuiltinLocation {
        id: "plinth",
        name: "The Plinth",
        lat: 32.986550, lng: -96.748430,
        description: Some("Open plaza between the library and the Student Union"),
        aliases: &["Plinth"],
    },
    BuiltinLocation {
        id: "chess-plaza",
        name: "Chess Plaza",
        lat: 32.987480, lng: -96.748950,
        description: None,
        aliases: &[],
    },
    BuiltinLocation {
        id: "spirit-rocks",
        name: "Spirit Rocks",
        lat: 32.984710, lng: -96.749840,
        description: None,
        aliases: &["The Rocks"],
    },
    BuiltinLocation {
        id: "visitor-center",
        name: "Visitor Center and University Bookstore",
        lat: 32.984340, lng: -96.750960,
        description: None,
        aliases: &["Bookstore", "VCB"],
    },
    BuiltinLocation {
        id: "dining-west",
        name: "Dining Hall West",
        lat: 32.990510, lng: -96.753920,
        description: None,
        aliases: &["DHW"],
    },
    BuiltinLocation {
        id: "residence-west",
        name: "Residence Hall West",
        lat: 32.990180, lng: -96.754710,
        description: None,
        aliases: &["RHW"],
    },
    BuiltinLocation {
        id: "residence-north",
        name: "Residence Hall North",
        lat: 32.991380, lng: -96.752930,
        description: None,
        aliases: &["RHN"],
    },
    BuiltinLocation {
        id: "alumni-center",
        name: "Davidson-Gundy Alumni Center",
        lat: 32.989860, lng: -96.745180,
        description: None,
        aliases: &["Alumni Center"],
    },
    BuiltinLocation {
        id: "callier",
        name: "Callier Center",
        lat: 32.989240, lng: -96.752010,
        description: None,
        aliases: &[],
    },
];

fn builtin_to_location(entry: &BuiltinLocation) -> CampusLocation {
    let location = CampusLocation::new(entry.id, entry.name, entry.lat, entry.lng).with_aliases(entry.aliases);
    match entry.description {
        Some(description) => location.with_description(description),
        None => location,
    }
}

// ─── Gazetteer ──────────────────────────────────────────────────

/// Precomputed matching forms of one location's name and aliases.
#[derive(Debug, Clone)]
pub(crate) struct MatchKeys {
    pub name: String,
    pub aliases: Vec<String>,
    /// Stripped name followed by stripped aliases, empties removed.
    pub stripped: Vec<String>,
    pub name_tokens: Vec<String>,
}

impl MatchKeys {
    fn build(location: &CampusLocation) -> Self {
        let name = normalize(&location.name);
        let aliases: Vec<String> = location.aliases.iter().map(|a| normalize(a)).collect();
        let stripped_name = strip_filler_words(&name);
        let name_tokens = stripped_name.split(' ').filter(|t| !t.is_empty()).map(str::to_string).collect();
        let stripped = std::iter::once(stripped_name)
            .chain(aliases.iter().map(|a| strip_filler_words(a)))
            .filter(|s| !s.is_empty())
            .collect();
        Self { name, aliases, stripped, name_tokens }
    }
}

/// Two locations sharing a normalized name or alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub key: String,
    pub first: String,
    pub second: String,
}

/// An immutable, insertion-ordered set of campus locations.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    locations: Vec<CampusLocation>,
    keys: Vec<MatchKeys>,
    by_id: HashMap<String, usize>,
    collisions: Vec<Collision>,
}

impl Gazetteer {
    /// Validate and index a list of locations. Order is preserved and is
    /// significant for tie-breaking.
    pub fn new(locations: Vec<CampusLocation>) -> Result<Self, LocationError> {
        if locations.is_empty() {
            return Err(LocationError::EmptyGazetteer);
        }

        let mut by_id = HashMap::with_capacity(locations.len());
        for (idx, loc) in locations.iter().enumerate() {
            if !(-90.0..=90.0).contains(&loc.lat) || !(-180.0..=180.0).contains(&loc.lng) {
                return Err(LocationError::InvalidCoordinates {
                    id: loc.id.clone(),
                    lat: loc.lat,
                    lng: loc.lng,
                });
            }
            if by_id.insert(loc.id.clone(), idx).is_some() {
                return Err(LocationError::DuplicateId(loc.id.clone()));
            }
        }

        let keys: Vec<MatchKeys> = locations.iter().map(MatchKeys::build).collect();
        let collisions = find_collisions(&locations, &keys);
        for c in &collisions {
            tracing::warn!(key = %c.key, first = %c.first, second = %c.second, "gazetteer key collision");
        }

        Ok(Self { locations, keys, by_id, collisions })
    }

    /// The compiled-in campus dataset, built once per process.
    pub fn builtin() -> &'static Gazetteer {
        static BUILTIN: OnceLock<Gazetteer> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let locations = BUILTIN_LOCATIONS.iter().map(builtin_to_location).collect();
            // The built-in table is covered by test_builtin_is_valid.
            Gazetteer::new(locations).unwrap_or_else(|e| panic!("built-in gazetteer is invalid: {}", e))
        })
    }

    /// Exact id lookup. No normalization, no fuzziness.
    pub fn get_by_id(&self, id: &str) -> Option<&CampusLocation> {
        self.by_id.get(id).map(|&idx| &self.locations[idx])
    }

    /// Loose substring search over names and aliases for a location picker.
    /// Results follow gazetteer order; an empty query yields nothing.
    pub fn search_prefix(&self, query: &str) -> Vec<&CampusLocation> {
        let q = normalize(query);
        if q.is_empty() {
            return Vec::new();
        }
        self.entries()
            .filter(|(_, keys)| keys.name.contains(&q) || keys.aliases.iter().any(|a| a.contains(&q)))
            .map(|(loc, _)| loc)
            .collect()
    }

    pub fn locations(&self) -> &[CampusLocation] {
        &self.locations
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Name/alias keys shared by more than one location.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = (&CampusLocation, &MatchKeys)> {
        self.locations.iter().zip(self.keys.iter())
    }
}

fn find_collisions(locations: &[CampusLocation], keys: &[MatchKeys]) -> Vec<Collision> {
    let mut owners: HashMap<&str, usize> = HashMap::new();
    let mut collisions = Vec::new();
    for (idx, k) in keys.iter().enumerate() {
        for key in std::iter::once(&k.name).chain(k.aliases.iter()) {
            match owners.get(key.as_str()) {
                Some(&owner) if owner != idx => collisions.push(Collision {
                    key: key.clone(),
                    first: locations[owner].id.clone(),
                    second: locations[idx].id.clone(),
                }),
                Some(_) => {}
                None => {
                    owners.insert(key.as_str(), idx);
                }
            }
        }
    }
    collisions
}

/// Format coordinates as "32.987120°N, 96.747610°W".
pub fn format_coords(lat: f64, lng: f64) -> String {
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let ew = if lng >= 0.0 { 'E' } else { 'W' };
    format!("{:.6}\u{00B0}{}, {:.6}\u{00B0}{}", lat.abs(), ns, lng.abs(), ew)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_is_valid() {
        let locations: Vec<CampusLocation> = BUILTIN_LOCATIONS.iter().map(builtin_to_location).collect();
        let g = Gazetteer::new(locations).unwrap();
        assert_eq!(g.len(), BUILTIN_LOCATIONS.len());
        assert!(g.collisions().is_empty(), "collisions: {:?}", g.collisions());
        assert!(g.get_by_id("library").unwrap().description.is_some());
        assert!(g.get_by_id("sciences").unwrap().description.is_none());
    }

    #[test]
    fn test_builtin_has_heuristic_targets() {
        let g = Gazetteer::builtin();
        for id in ["library", "ecsw", "ecss", "ecsn"] {
            assert!(g.get_by_id(id).is_some(), "missing {}", id);
        }
    }

    #[test]
    fn test_builtin_coordinates_have_building_precision() {
        for loc in Gazetteer::builtin().locations() {
            let lat = format!("{:.6}", loc.lat);
            assert!((lat.parse::<f64>().unwrap() - loc.lat).abs() < 1e-9);
            assert!(loc.lat > 32.98 && loc.lat < 32.995, "{} lat out of campus", loc.id);
            assert!(loc.lng > -96.76 && loc.lng < -96.74, "{} lng out of campus", loc.id);
        }
    }

    #[test]
    fn test_get_by_id_is_exact() {
        let g = Gazetteer::builtin();
        assert_eq!(g.get_by_id("ecsw").unwrap().name, "Engineering and Computer Science West");
        assert!(g.get_by_id("ECSW").is_none());
        assert!(g.get_by_id(" ecsw").is_none());
        assert!(g.get_by_id("Engineering and Computer Science West").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = Gazetteer::new(vec![
            CampusLocation::new("a", "Alpha", 32.0, -96.0),
            CampusLocation::new("a", "Beta", 32.1, -96.1),
        ]);
        assert!(matches!(result, Err(LocationError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Gazetteer::new(vec![]), Err(LocationError::EmptyGazetteer)));
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let result = Gazetteer::new(vec![CampusLocation::new("x", "Nowhere", 132.0, -96.0)]);
        assert!(matches!(result, Err(LocationError::InvalidCoordinates { .. })));
    }

    #[test]
    fn test_collisions_reported() {
        let g = Gazetteer::new(vec![
            CampusLocation::new("a", "Commons", 32.0, -96.0),
            CampusLocation::new("b", "Annex", 32.1, -96.1).with_aliases(&["  COMMONS "]),
        ])
        .unwrap();
        assert_eq!(
            g.collisions(),
            &[Collision { key: "commons".into(), first: "a".into(), second: "b".into() }]
        );
    }

    #[test]
    fn test_search_prefix_order_and_aliases() {
        let g = Gazetteer::builtin();
        let ids: Vec<&str> = g.search_prefix("engineering").iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["ecsn", "ecss", "ecsw", "bsb"]);

        let ids: Vec<&str> = g.search_prefix("jsom").iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["jsom"]);
    }

    #[test]
    fn test_search_prefix_empty_and_miss() {
        let g = Gazetteer::builtin();
        assert!(g.search_prefix("").is_empty());
        assert!(g.search_prefix("   ").is_empty());
        assert!(g.search_prefix("zzzz").is_empty());
    }

    #[test]
    fn test_format_coords() {
        assert_eq!(format_coords(32.98712, -96.74761), "32.987120\u{00B0}N, 96.747610\u{00B0}W");
    }
}
