//! Levels and caller-owned point totals.

use super::tiers::PointsTable;
use super::types::{LevelInfo, PointsError};
use serde::{Deserialize, Serialize};

/// Points needed per level.
pub const XP_PER_LEVEL: u64 = 10;

fn level_from(points: u64) -> LevelInfo {
    LevelInfo {
        level: points / XP_PER_LEVEL,
        // always < 100
        progress_percent: ((points % XP_PER_LEVEL) * 100 / XP_PER_LEVEL) as u8,
    }
}

/// Level and progress for a point total. Negative totals are a caller error.
pub fn level_for(points: i64) -> Result<LevelInfo, PointsError> {
    let points = u64::try_from(points)
        .map_err(|_| PointsError::InvalidArgument(format!("points must be non-negative, got {}", points)))?;
    Ok(level_from(points))
}

/// Points earned for attending or hosting a meetup of this lobby size.
pub fn meetup_reward(table: &PointsTable, lobby_size: i64) -> Result<u32, PointsError> {
    Ok(table.classify(lobby_size)?.base_points)
}

/// A user's accumulated points. Owned by the caller; awarding returns a new
/// value and level is derived on every read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    points: u64,
}

impl UserProgress {
    pub fn new(points: u64) -> Self {
        Self { points }
    }

    pub fn points(&self) -> u64 {
        self.points
    }

    #[must_use]
    pub fn award(self, points: u32) -> Self {
        Self { points: self.points.saturating_add(u64::from(points)) }
    }

    /// Award the tier reward for a meetup.
    pub fn record_meetup(self, table: &PointsTable, lobby_size: i64) -> Result<Self, PointsError> {
        Ok(self.award(meetup_reward(table, lobby_size)?))
    }

    pub fn level_info(&self) -> LevelInfo {
        level_from(self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(level: u64, progress_percent: u8) -> LevelInfo {
        LevelInfo { level, progress_percent }
    }

    #[test]
    fn test_level_table() {
        assert_eq!(level_for(0).unwrap(), info(0, 0));
        assert_eq!(level_for(9).unwrap(), info(0, 90));
        assert_eq!(level_for(10).unwrap(), info(1, 0));
        assert_eq!(level_for(22).unwrap(), info(2, 20));
        assert_eq!(level_for(25).unwrap(), info(2, 50));
    }

    #[test]
    fn test_level_rejects_negative() {
        assert!(matches!(level_for(-1), Err(PointsError::InvalidArgument(_))));
        assert!(matches!(level_for(i64::MIN), Err(PointsError::InvalidArgument(_))));
    }

    #[test]
    fn test_level_is_monotonic() {
        let mut previous = level_for(0).unwrap().level;
        for p in 1..=500 {
            let current = level_for(p).unwrap().level;
            assert!(current >= previous, "level dropped at {} points", p);
            previous = current;
        }
    }

    #[test]
    fn test_progress_stays_below_100() {
        for p in 0..=200 {
            let pct = level_for(p).unwrap().progress_percent;
            assert!(pct < 100 && pct % 10 == 0, "{} points -> {}%", p, pct);
        }
    }

    #[test]
    fn test_user_progress_award() {
        let start = UserProgress::default();
        let after = start.award(7).award(15);
        assert_eq!(start.points(), 0);
        assert_eq!(after.points(), 22);
        assert_eq!(after.level_info(), info(2, 20));
        assert_eq!(UserProgress::new(u64::MAX).award(5).points(), u64::MAX);
    }

    #[test]
    fn test_record_meetup() {
        let table = PointsTable::builtin();
        let progress = UserProgress::new(9).record_meetup(table, 8).unwrap();
        assert_eq!(progress.points(), 11);
        assert_eq!(progress.level_info().level, 1);

        assert!(UserProgress::new(9).record_meetup(table, 0).is_err());
    }

    #[test]
    fn test_meetup_reward() {
        let table = PointsTable::builtin();
        assert_eq!(meetup_reward(table, 3).unwrap(), 1);
        assert_eq!(meetup_reward(table, 250).unwrap(), 5);
    }
}
