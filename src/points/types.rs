//! Core types for meetup point tiers and user levels.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A lobby-size band and the reward for a meetup inside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointClassification {
    #[serde(rename = "type")]
    pub tier: String,
    pub min_size: u32,
    pub max_size: u32,
    pub base_points: u32,
    /// Display metadata, passed through untouched.
    pub label: String,
    pub color: String,
}

impl PointClassification {
    pub fn contains(&self, lobby_size: u32) -> bool {
        (self.min_size..=self.max_size).contains(&lobby_size)
    }
}

/// Level and progress derived from a point total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u64,
    /// Progress toward the next level, 0..=90 in steps of 10.
    pub progress_percent: u8,
}

#[derive(Debug, Error)]
pub enum PointsError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("point table contains no tiers")]
    EmptyTable,

    #[error("tier '{tier}' has min_size {min} above max_size {max}")]
    InvertedBand { tier: String, min: u32, max: u32 },

    #[error("tier '{tier}' starts at {found}, expected {expected}")]
    NonContiguous { tier: String, expected: u32, found: u32 },

    #[error("tier '{tier}' follows a tier that already covers every larger size")]
    TrailingTier { tier: String },

    #[error("cannot read point table: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid point table JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
