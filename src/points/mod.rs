//! Meetup point tiers and user leveling.

pub mod level;
pub mod tiers;
pub mod types;

pub use level::{level_for, meetup_reward, UserProgress, XP_PER_LEVEL};
pub use tiers::PointsTable;
pub use types::{LevelInfo, PointClassification, PointsError};
