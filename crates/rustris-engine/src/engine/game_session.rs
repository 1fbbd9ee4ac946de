use std::time::Duration;

use arrayvec::ArrayVec;
use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::{
    ConfigError, GameConfig,
    core::{
        board::Board,
        piece::{Piece, PieceKind, RotationDirection},
        placement::{self, SoftTick},
    },
};

use super::{
    game_stats::GameStats,
    piece_buffer::{PieceBuffer, PieceSeed},
};

/// Phase of the game loop.
///
/// Between two calls to [`GameSession::handle`] a session is always either
/// `Falling` or `GameOver`; the other phases are passed through while an
/// event is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    /// The next piece is about to enter the board.
    Spawning,
    /// The active piece responds to gravity and input.
    Falling { piece: Piece },
    /// The piece can no longer move down and is merged into the board.
    Locking { piece: Piece },
    /// Full rows are removed and score/level updated.
    Clearing,
    /// Terminal: a new piece could not be spawned.
    GameOver,
}

/// Discrete player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputEvent {
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    SoftDrop,
    HardDrop,
    /// Toggles pause.
    Pause,
}

/// Anything that can drive a session forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    /// Gravity timer fired.
    Tick,
    Input(InputEvent),
}

impl From<InputEvent> for GameEvent {
    fn from(input: InputEvent) -> Self {
        Self::Input(input)
    }
}

/// Notable outcome of handling one event, for the UI to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "notice", rename_all = "snake_case")]
pub enum Notice {
    Spawned { kind: PieceKind },
    Locked { piece: Piece },
    LinesCleared { rows: usize, points: u64 },
    LevelUp { level: u32 },
    GameOver,
    Paused,
    Resumed,
}

/// Notices produced by one event. A single event causes at most one
/// lock, clear, level-up and spawn.
pub type Notices = ArrayVec<Notice, 8>;

/// What triggers a transition: an external event, or settling one of the
/// automatic phases.
#[derive(Debug, Clone, Copy)]
enum Trigger {
    Event(GameEvent),
    Settle,
}

/// Read-only view of the session for renderers.
#[derive(Debug, Clone, Serialize)]
pub struct VisibleState<'a> {
    pub board: &'a Board,
    pub active_piece: Option<Piece>,
    /// Where the active piece would land on a hard drop.
    pub ghost_piece: Option<Piece>,
    pub next_pieces: Vec<PieceKind>,
    pub score: u64,
    pub level: u32,
    pub lines: u64,
    pub paused: bool,
    pub game_over: bool,
}

/// A single game from first spawn to game over.
///
/// The session owns the board, the active piece (inside [`Phase::Falling`]),
/// the piece queue and the statistics. It is mutated only through
/// [`Self::handle`], which runs every event through one transition function.
///
/// # Example
///
/// ```
/// use rustris_engine::{GameConfig, GameEvent, GameSession, InputEvent};
///
/// let mut session = GameSession::new(GameConfig::default()).unwrap();
/// session.handle(InputEvent::MoveLeft.into());
/// session.handle(InputEvent::RotateCw.into());
/// session.handle(GameEvent::Tick);
/// session.handle(InputEvent::HardDrop.into());
///
/// assert_eq!(session.stats().completed_pieces(), 1);
/// assert!(session.phase().is_falling());
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    phase: Phase,
    paused: bool,
    seed: PieceSeed,
    piece_buffer: PieceBuffer,
    stats: GameStats,
}

impl GameSession {
    /// Starts a session with a random piece seed.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but deals pieces from `seed`.
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::start(config, seed, None))
    }

    /// Starts a session on a prepared board instead of an empty one.
    ///
    /// The board's dimensions take precedence over `config.board`.
    pub fn with_board(
        mut config: GameConfig,
        seed: PieceSeed,
        board: Board,
    ) -> Result<Self, ConfigError> {
        config.board.columns = board.columns();
        config.board.rows = board.rows();
        config.validate()?;
        Ok(Self::start(config, seed, Some(board)))
    }

    fn start(config: GameConfig, seed: PieceSeed, board: Option<Board>) -> Self {
        let board = board.unwrap_or_else(|| Board::new(config.board.columns, config.board.rows));
        let mut session = Self {
            board,
            phase: Phase::Spawning,
            paused: false,
            seed,
            piece_buffer: PieceBuffer::with_seed(seed),
            stats: GameStats::new(&config.scoring),
            config,
        };
        debug!(%seed, "starting session");
        let mut notices = Notices::new();
        session.settle(&mut notices);
        session
    }

    /// Discards all state and starts over with a new random seed.
    pub fn reset(&mut self) {
        self.reset_with_seed(rand::rng().random());
    }

    /// Discards all state and starts over, dealing pieces from `seed`.
    pub fn reset_with_seed(&mut self, seed: PieceSeed) {
        *self = Self::start(self.config.clone(), seed, None);
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    /// The falling piece, if any.
    #[must_use]
    pub fn active_piece(&self) -> Option<Piece> {
        match self.phase {
            Phase::Falling { piece } => Some(piece),
            _ => None,
        }
    }

    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.piece_buffer.preview(self.config.preview_len)
    }

    /// Interval until the next gravity tick should be delivered.
    ///
    /// `None` while paused or after game over: no ticks are consumed then.
    #[must_use]
    pub fn tick_interval(&self) -> Option<Duration> {
        (self.phase.is_falling() && !self.paused)
            .then(|| self.config.gravity.interval(self.stats.level()))
    }

    /// Snapshot for rendering one frame.
    #[must_use]
    pub fn visible_state(&self) -> VisibleState<'_> {
        let active_piece = self.active_piece();
        VisibleState {
            board: &self.board,
            active_piece,
            ghost_piece: active_piece.map(|piece| placement::hard_drop(&self.board, &piece)),
            next_pieces: self.next_pieces().collect(),
            score: self.stats.score(),
            level: self.stats.level(),
            lines: self.stats.total_cleared_lines(),
            paused: self.paused,
            game_over: self.is_game_over(),
        }
    }

    /// Applies one event and settles the automatic phases that follow it.
    ///
    /// Events are consumed only while the session is `Falling`; after game
    /// over they are ignored. While paused, only [`InputEvent::Pause`] is
    /// consumed.
    pub fn handle(&mut self, event: GameEvent) -> Notices {
        let mut notices = Notices::new();
        trace!(?event, phase = ?self.phase, "handling event");
        self.phase = self.transition(self.phase, Trigger::Event(event), &mut notices);
        self.settle(&mut notices);
        notices
    }

    fn settle(&mut self, notices: &mut Notices) {
        while matches!(
            self.phase,
            Phase::Spawning | Phase::Locking { .. } | Phase::Clearing
        ) {
            self.phase = self.transition(self.phase, Trigger::Settle, notices);
        }
    }

    /// Every legal phase transition of the game loop.
    fn transition(&mut self, phase: Phase, trigger: Trigger, notices: &mut Notices) -> Phase {
        match (phase, trigger) {
            (Phase::Spawning, _) => {
                let kind = self.piece_buffer.pop_next();
                match placement::spawn(&self.board, kind) {
                    Ok(piece) => {
                        notices.push(Notice::Spawned { kind });
                        Phase::Falling { piece }
                    }
                    Err(err) => {
                        info!(
                            score = self.stats.score(),
                            lines = self.stats.total_cleared_lines(),
                            "game over: {err}"
                        );
                        notices.push(Notice::GameOver);
                        Phase::GameOver
                    }
                }
            }

            (Phase::Falling { .. }, Trigger::Event(GameEvent::Input(InputEvent::Pause))) => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
                notices.push(if self.paused {
                    Notice::Paused
                } else {
                    Notice::Resumed
                });
                phase
            }
            (Phase::Falling { .. }, Trigger::Event(_)) if self.paused => phase,
            (Phase::Falling { piece }, Trigger::Event(GameEvent::Tick)) => self.fall(piece),
            (Phase::Falling { piece }, Trigger::Event(GameEvent::Input(input))) => {
                self.apply_input(piece, input)
            }
            (Phase::Falling { .. }, Trigger::Settle) => phase,

            (Phase::Locking { piece }, _) => {
                let merged = self.board.merge(&piece.cells(), piece.color());
                assert!(
                    merged.is_ok(),
                    "locked piece {piece} must fit the board: {merged:?}"
                );
                debug!(%piece, "piece locked");
                notices.push(Notice::Locked { piece });
                Phase::Clearing
            }

            (Phase::Clearing, _) => {
                let rows = self.board.clear_full_rows();
                let outcome = self.stats.record_lock(rows, &self.config.scoring);
                if rows > 0 {
                    debug!(rows, points = outcome.points, "rows cleared");
                    notices.push(Notice::LinesCleared {
                        rows,
                        points: outcome.points,
                    });
                }
                if let Some(level) = outcome.level_up {
                    debug!(level, "level up");
                    notices.push(Notice::LevelUp { level });
                }
                Phase::Spawning
            }

            (Phase::GameOver, _) => Phase::GameOver,
        }
    }

    fn fall(&self, piece: Piece) -> Phase {
        match placement::soft_tick(&self.board, &piece) {
            SoftTick::Moved(piece) => Phase::Falling { piece },
            SoftTick::Lock => Phase::Locking { piece },
        }
    }

    fn apply_input(&self, piece: Piece, input: InputEvent) -> Phase {
        let board = &self.board;
        let moved = match input {
            InputEvent::MoveLeft => placement::try_move(board, &piece, -1, 0),
            InputEvent::MoveRight => placement::try_move(board, &piece, 1, 0),
            InputEvent::RotateCw => placement::rotate(board, &piece, RotationDirection::Clockwise),
            InputEvent::RotateCcw => {
                placement::rotate(board, &piece, RotationDirection::CounterClockwise)
            }
            InputEvent::SoftDrop => return self.fall(piece),
            InputEvent::HardDrop => {
                return Phase::Locking {
                    piece: placement::hard_drop(board, &piece),
                };
            }
            InputEvent::Pause => None,
        };
        if moved.is_none() {
            trace!(?input, "input rejected");
        }
        Phase::Falling {
            piece: moved.unwrap_or(piece),
        }
    }
}
