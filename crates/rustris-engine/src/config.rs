//! Game configuration.
//!
//! Every value here is a policy choice rather than a rule of the game, so all
//! of them are configurable and default to the classic conventions. A config
//! is deserialized from JSON with missing fields taking their defaults, and
//! is checked by [`GameConfig::validate`] before a session uses it.

use serde::{Deserialize, Serialize};

use crate::{
    PieceKind,
    engine::scoring::{GravityPolicy, ScoringPolicy},
};

/// Errors reported by [`GameConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must be at least {min}x{min}, got {columns}x{rows}")]
    BoardTooSmall {
        columns: usize,
        rows: usize,
        min: usize,
    },
    #[display("board must be at most {max} columns and rows, got {columns}x{rows}")]
    BoardTooLarge {
        columns: usize,
        rows: usize,
        max: usize,
    },
    #[display("block size must be positive")]
    ZeroBlockSize,
    #[display("line clear score table must not be empty")]
    EmptyScoreTable,
    #[display("lines per level must be positive")]
    ZeroLinesPerLevel,
    #[display("starting level must be at least 1")]
    ZeroStartingLevel,
    #[display("gravity intervals must be positive")]
    ZeroGravityInterval,
    #[display("minimum gravity interval {min_ms}ms exceeds base interval {base_ms}ms")]
    GravityIntervalOrder { min_ms: u64, base_ms: u64 },
    #[display("preview length must be at most {max}, got {len}")]
    PreviewTooLong { len: usize, max: usize },
}

/// Board dimensions and the pixel size a renderer draws each cell with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub columns: usize,
    pub rows: usize,
    pub block_size: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            columns: 10,
            rows: 20,
            block_size: 30,
        }
    }
}

impl BoardConfig {
    /// Smallest board every rotation state fits on.
    pub const MIN_SIZE: usize = 4;
    pub const MAX_SIZE: usize = 1024;

    /// Pixel dimensions `(width, height)` of a drawing surface for the board.
    ///
    /// ```
    /// use rustris_engine::BoardConfig;
    ///
    /// assert_eq!(BoardConfig::default().canvas_size(), (300, 600));
    /// ```
    #[must_use]
    pub fn canvas_size(&self) -> (u64, u64) {
        let block = u64::from(self.block_size);
        (
            self.columns as u64 * block,
            self.rows as u64 * block,
        )
    }
}

/// Complete configuration of a game session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board: BoardConfig,
    pub scoring: ScoringPolicy,
    pub gravity: GravityPolicy,
    /// Number of upcoming pieces exposed to the renderer.
    pub preview_len: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board: BoardConfig::default(),
            scoring: ScoringPolicy::default(),
            gravity: GravityPolicy::default(),
            preview_len: 5,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let BoardConfig {
            columns,
            rows,
            block_size,
        } = self.board;
        if columns < BoardConfig::MIN_SIZE || rows < BoardConfig::MIN_SIZE {
            return Err(ConfigError::BoardTooSmall {
                columns,
                rows,
                min: BoardConfig::MIN_SIZE,
            });
        }
        if columns > BoardConfig::MAX_SIZE || rows > BoardConfig::MAX_SIZE {
            return Err(ConfigError::BoardTooLarge {
                columns,
                rows,
                max: BoardConfig::MAX_SIZE,
            });
        }
        if block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }

        if self.scoring.line_clear_points.is_empty() {
            return Err(ConfigError::EmptyScoreTable);
        }
        if self.scoring.lines_per_level == 0 {
            return Err(ConfigError::ZeroLinesPerLevel);
        }
        if self.scoring.starting_level == 0 {
            return Err(ConfigError::ZeroStartingLevel);
        }

        let GravityPolicy {
            base_interval_ms,
            min_interval_ms,
            ..
        } = self.gravity;
        if base_interval_ms == 0 || min_interval_ms == 0 {
            return Err(ConfigError::ZeroGravityInterval);
        }
        if min_interval_ms > base_interval_ms {
            return Err(ConfigError::GravityIntervalOrder {
                min_ms: min_interval_ms,
                base_ms: base_interval_ms,
            });
        }

        if self.preview_len > PieceKind::LEN {
            return Err(ConfigError::PreviewTooLong {
                len: self.preview_len,
                max: PieceKind::LEN,
            });
        }
        Ok(())
    }
}
