use serde::Serialize;

use super::scoring::ScoringPolicy;

/// Outcome of recording one lock-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOutcome {
    pub rows_cleared: usize,
    pub points: u64,
    /// New level, if this lock raised it.
    pub level_up: Option<u32>,
}

/// Game statistics tracking score, level, lines cleared, and piece count.
///
/// - **Score**: points earned from line clears
/// - **Level**: derived from total lines cleared through [`ScoringPolicy::level_for`]
/// - **Completed pieces**: total number of pieces locked
/// - **Line clear distribution**: count of locks clearing 0, 1, 2, 3 and 4+ rows
///
/// # Example
///
/// ```
/// use rustris_engine::{GameStats, ScoringPolicy};
///
/// let policy = ScoringPolicy::default();
/// let mut stats = GameStats::new(&policy);
/// let outcome = stats.record_lock(4, &policy);
///
/// assert_eq!(outcome.points, 800);
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_lines(), 4);
/// assert_eq!(stats.line_cleared_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: u64,
    level: u32,
    completed_pieces: u64,
    total_cleared_lines: u64,
    line_cleared_counter: [u64; 5],
}

impl GameStats {
    /// Creates a new tracker with every counter at zero.
    #[must_use]
    pub fn new(policy: &ScoringPolicy) -> Self {
        Self {
            score: 0,
            level: policy.starting_level,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> u64 {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> u64 {
        self.total_cleared_lines
    }

    /// Histogram of locks by rows cleared.
    ///
    /// Index 4 also counts the (non-standard) clears of more than four rows.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[u64; 5] {
        &self.line_cleared_counter
    }

    /// Updates statistics after a piece has been locked and rows cleared.
    ///
    /// Points are computed at the level in effect before this lock.
    pub fn record_lock(&mut self, rows_cleared: usize, policy: &ScoringPolicy) -> LockOutcome {
        let points = policy.score(rows_cleared, self.level);
        self.score = self.score.saturating_add(points);
        self.completed_pieces += 1;
        self.total_cleared_lines += rows_cleared as u64;
        self.line_cleared_counter[rows_cleared.min(4)] += 1;

        let level = policy.level_for(self.total_cleared_lines);
        let level_up = (level > self.level).then_some(level);
        self.level = self.level.max(level);

        LockOutcome {
            rows_cleared,
            points,
            level_up,
        }
    }
}
