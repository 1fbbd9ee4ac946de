use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Score values and level progression.
///
/// Scoring is table driven: clearing several rows at once is worth more than
/// clearing them one by one, so points are looked up by the number of rows
/// removed in a single lock rather than accumulated per row.
///
/// # Example
///
/// ```
/// use rustris_engine::ScoringPolicy;
///
/// let policy = ScoringPolicy::default();
/// assert_eq!(policy.score(4, 1), 800);
/// assert_eq!(policy.score(2, 3), 900);
/// assert_eq!(policy.level_for(25), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Points per lock, indexed by rows cleared, before the level multiplier.
    ///
    /// Clears larger than the table use its last entry.
    pub line_clear_points: Vec<u64>,
    /// Total lines needed for each level increase.
    pub lines_per_level: u32,
    pub starting_level: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            line_clear_points: vec![0, 100, 300, 500, 800],
            lines_per_level: 10,
            starting_level: 1,
        }
    }
}

impl ScoringPolicy {
    /// Points awarded for clearing `rows_cleared` rows at `level`.
    #[must_use]
    pub fn score(&self, rows_cleared: usize, level: u32) -> u64 {
        let base = self
            .line_clear_points
            .get(rows_cleared)
            .or_else(|| self.line_clear_points.last())
            .copied()
            .unwrap_or(0);
        base.saturating_mul(u64::from(level))
    }

    /// Level reached after `total_lines` cleared lines.
    #[must_use]
    pub fn level_for(&self, total_lines: u64) -> u32 {
        let gained = total_lines / u64::from(self.lines_per_level.max(1));
        self.starting_level
            .saturating_add(u32::try_from(gained).unwrap_or(u32::MAX))
    }
}

/// Interval between gravity ticks as a function of level.
///
/// The interval shrinks linearly by `step_ms` per level above 1 and never
/// drops below `min_interval_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityPolicy {
    pub base_interval_ms: u64,
    pub step_ms: u64,
    pub min_interval_ms: u64,
}

impl Default for GravityPolicy {
    fn default() -> Self {
        Self {
            base_interval_ms: 1000,
            step_ms: 100,
            min_interval_ms: 100,
        }
    }
}

impl GravityPolicy {
    #[must_use]
    pub fn interval(&self, level: u32) -> Duration {
        let reduction = self
            .step_ms
            .saturating_mul(u64::from(level.saturating_sub(1)));
        let millis = self
            .base_interval_ms
            .saturating_sub(reduction)
            .max(self.min_interval_ms);
        Duration::from_millis(millis)
    }
}
