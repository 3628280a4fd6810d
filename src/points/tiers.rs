//! Lobby-size tiers: the band table and classification.
//!
//! Bands are ascending, contiguous, and start at 1. Sizes above the last
//! band's `max_size` belong to the last band, so every positive size has
//! exactly one tier.

use super::types::{PointClassification, PointsError};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

struct BuiltinTier {
    tier: &'static str,
    min_size: u32,
    max_size: u32,
    base_points: u32,
    label: &'static str,
    color: &'static str,
}

const BUILTIN_TIERS: &[BuiltinTier] = &[
    BuiltinTier { tier: "small", min_size: 1, max_size: 4, base_points: 1, label: "Small Meetup", color: "#4CAF50" },
    BuiltinTier { tier: "medium", min_size: 5, max_size: 10, base_points: 2, label: "Medium Meetup", color: "#2196F3" },
    BuiltinTier { tier: "large", min_size: 11, max_size: 25, base_points: 3, label: "Large Meetup", color: "#FF9800" },
    BuiltinTier { tier: "massive", min_size: 26, max_size: 100, base_points: 5, label: "Massive Meetup", color: "#9C27B0" },
];

/// Validated, ordered tier table.
#[derive(Debug, Clone)]
pub struct PointsTable {
    bands: Vec<PointClassification>,
}

impl PointsTable {
    pub fn new(bands: Vec<PointClassification>) -> Result<Self, PointsError> {
        if bands.is_empty() {
            return Err(PointsError::EmptyTable);
        }

        // `None` once a band ends at u32::MAX
        let mut next: Option<u32> = Some(1);
        for band in &bands {
            let Some(expected) = next else {
                return Err(PointsError::TrailingTier { tier: band.tier.clone() });
            };
            if band.min_size != expected {
                return Err(PointsError::NonContiguous {
                    tier: band.tier.clone(),
                    expected,
                    found: band.min_size,
                });
            }
            if band.max_size < band.min_size {
                return Err(PointsError::InvertedBand {
                    tier: band.tier.clone(),
                    min: band.min_size,
                    max: band.max_size,
                });
            }
            next = band.max_size.checked_add(1);
        }

        Ok(Self { bands })
    }

    /// The compiled-in tier table, built once per process.
    pub fn builtin() -> &'static PointsTable {
        static BUILTIN: OnceLock<PointsTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let bands = BUILTIN_TIERS
                .iter()
                .map(|t| PointClassification {
                    tier: t.tier.to_string(),
                    min_size: t.min_size,
                    max_size: t.max_size,
                    base_points: t.base_points,
                    label: t.label.to_string(),
                    color: t.color.to_string(),
                })
                .collect();
            // The built-in table is covered by test_builtin_is_valid.
            PointsTable::new(bands).unwrap_or_else(|e| panic!("built-in point table is invalid: {}", e))
        })
    }

    /// Load and validate a table from a JSON array of classifications.
    pub fn load(path: &Path) -> Result<Self, PointsError> {
        let data = fs::read_to_string(path)?;
        let bands: Vec<PointClassification> = serde_json::from_str(&data)?;
        let table = Self::new(bands)?;
        tracing::info!(path = %path.display(), tiers = table.bands.len(), "loaded point table override");
        Ok(table)
    }

    /// Tier for a lobby size. Non-positive sizes are a caller error;
    /// oversized lobbies fall into the top tier.
    pub fn classify(&self, lobby_size: i64) -> Result<&PointClassification, PointsError> {
        if lobby_size <= 0 {
            return Err(PointsError::InvalidArgument(format!(
                "lobby size must be positive, got {}",
                lobby_size
            )));
        }

        let size = u32::try_from(lobby_size).unwrap_or(u32::MAX);
        let band = self
            .bands
            .iter()
            .find(|b| b.contains(size))
            .unwrap_or_else(|| self.top());
        Ok(band)
    }

    pub fn bands(&self) -> &[PointClassification] {
        &self.bands
    }

    /// The highest tier, open-ended above its `max_size`.
    pub fn top(&self) -> &PointClassification {
        // `new` rejects empty tables
        &self.bands[self.bands.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn band(tier: &str, min: u32, max: u32, points: u32) -> PointClassification {
        PointClassification {
            tier: tier.into(),
            min_size: min,
            max_size: max,
            base_points: points,
            label: tier.into(),
            color: "#000000".into(),
        }
    }

    #[test]
    fn test_builtin_is_valid() {
        let table = PointsTable::builtin();
        assert_eq!(table.bands().len(), BUILTIN_TIERS.len());
        assert_eq!(table.top().tier, "massive");
    }

    #[test]
    fn test_classify_in_band() {
        let table = PointsTable::builtin();
        for size in [1, 5, 100] {
            let c = table.classify(size).unwrap();
            assert!((c.min_size as i64) <= size && size <= (c.max_size as i64), "size {}", size);
        }
        assert_eq!(table.classify(4).unwrap().tier, "small");
        assert_eq!(table.classify(8).unwrap().tier, "medium");
        assert_eq!(table.classify(25).unwrap().tier, "large");
        assert_eq!(table.classify(26).unwrap().tier, "massive");
    }

    #[test]
    fn test_classify_oversized_goes_to_top_tier() {
        let table = PointsTable::builtin();
        assert_eq!(table.classify(101).unwrap().tier, "massive");
        assert_eq!(table.classify(i64::MAX).unwrap().tier, "massive");
    }

    #[test]
    fn test_classify_rejects_non_positive() {
        let table = PointsTable::builtin();
        assert!(matches!(table.classify(0), Err(PointsError::InvalidArgument(_))));
        assert!(matches!(table.classify(-1), Err(PointsError::InvalidArgument(_))));
    }

    #[test]
    fn test_bands_partition_sizes() {
        let table = PointsTable::builtin();
        for size in 1..=150u32 {
            let hits = table.bands().iter().filter(|b| b.contains(size)).count();
            let expected = if size <= table.top().max_size { 1 } else { 0 };
            assert_eq!(hits, expected, "size {}", size);
        }
    }

    #[test]
    fn test_table_validation() {
        assert!(matches!(PointsTable::new(vec![]), Err(PointsError::EmptyTable)));

        let gap = PointsTable::new(vec![band("a", 1, 4, 1), band("b", 6, 10, 2)]);
        assert!(matches!(gap, Err(PointsError::NonContiguous { expected: 5, found: 6, .. })));

        let overlap = PointsTable::new(vec![band("a", 1, 4, 1), band("b", 4, 10, 2)]);
        assert!(matches!(overlap, Err(PointsError::NonContiguous { expected: 5, found: 4, .. })));

        let late_start = PointsTable::new(vec![band("a", 2, 4, 1)]);
        assert!(matches!(late_start, Err(PointsError::NonContiguous { expected: 1, .. })));

        let inverted = PointsTable::new(vec![band("a", 1, 0, 1)]);
        assert!(matches!(inverted, Err(PointsError::InvertedBand { .. })));

        let after_max = PointsTable::new(vec![band("a", 1, u32::MAX, 1), band("b", u32::MAX, u32::MAX, 2)]);
        assert!(matches!(after_max, Err(PointsError::TrailingTier { tier }) if tier == "b"));

        let full_range = PointsTable::new(vec![band("a", 1, 9, 1), band("b", 10, u32::MAX, 2)]).unwrap();
        assert_eq!(full_range.classify(i64::MAX).unwrap().tier, "b");
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiers.json");
        fs::write(
            &path,
            r##"[
                {"type": "solo", "min_size": 1, "max_size": 1, "base_points": 1, "label": "Solo", "color": "#111111"},
                {"type": "group", "min_size": 2, "max_size": 50, "base_points": 4, "label": "Group", "color": "#222222"}
            ]"##,
        )
        .unwrap();

        let table = PointsTable::load(&path).unwrap();
        assert_eq!(table.classify(1).unwrap().tier, "solo");
        assert_eq!(table.classify(500).unwrap().base_points, 4);
    }

    #[test]
    fn test_serialized_tag_field() {
        let json = serde_json::to_value(PointsTable::builtin().classify(8).unwrap()).unwrap();
        assert_eq!(json["type"], "medium");
        assert_eq!(json["base_points"], 2);
    }
}
