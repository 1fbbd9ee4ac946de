use rustris_engine::{
    Board, ConfigError, GameConfig, GameEvent, GameSession, GameStats, InputEvent, Phase,
    PieceSeed, VisibleState,
};
use serde::{Deserialize, Serialize};

/// A recorded game: the seed the pieces were dealt from and every event in
/// the order it was handled.
///
/// Replaying the events against a session with the same seed and
/// configuration reproduces the game exactly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventScript {
    pub seed: PieceSeed,
    /// Configuration the script was recorded with; the default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<GameConfig>,
    /// Board the game started on; empty when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
    pub events: Vec<ScriptEvent>,
}

impl EventScript {
    /// Creates the session the script was recorded from, using `config`
    /// in place of the recorded configuration.
    pub fn start_session(&self, config: GameConfig) -> Result<GameSession, ConfigError> {
        match &self.board {
            Some(board) => GameSession::with_board(config, self.seed, board.clone()),
            None => GameSession::with_seed(config, self.seed),
        }
    }
}

/// Text form of a [`GameEvent`] in scripts: `"tick"`, `"move_left"`, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptEvent {
    Tick,
    MoveLeft,
    MoveRight,
    RotateCw,
    RotateCcw,
    SoftDrop,
    HardDrop,
    Pause,
}

impl From<ScriptEvent> for GameEvent {
    fn from(event: ScriptEvent) -> Self {
        let input = match event {
            ScriptEvent::Tick => return GameEvent::Tick,
            ScriptEvent::MoveLeft => InputEvent::MoveLeft,
            ScriptEvent::MoveRight => InputEvent::MoveRight,
            ScriptEvent::RotateCw => InputEvent::RotateCw,
            ScriptEvent::RotateCcw => InputEvent::RotateCcw,
            ScriptEvent::SoftDrop => InputEvent::SoftDrop,
            ScriptEvent::HardDrop => InputEvent::HardDrop,
            ScriptEvent::Pause => InputEvent::Pause,
        };
        GameEvent::Input(input)
    }
}

impl From<GameEvent> for ScriptEvent {
    fn from(event: GameEvent) -> Self {
        match event {
            GameEvent::Tick => ScriptEvent::Tick,
            GameEvent::Input(InputEvent::MoveLeft) => ScriptEvent::MoveLeft,
            GameEvent::Input(InputEvent::MoveRight) => ScriptEvent::MoveRight,
            GameEvent::Input(InputEvent::RotateCw) => ScriptEvent::RotateCw,
            GameEvent::Input(InputEvent::RotateCcw) => ScriptEvent::RotateCcw,
            GameEvent::Input(InputEvent::SoftDrop) => ScriptEvent::SoftDrop,
            GameEvent::Input(InputEvent::HardDrop) => ScriptEvent::HardDrop,
            GameEvent::Input(InputEvent::Pause) => ScriptEvent::Pause,
        }
    }
}

/// Final state of a session, printed by `simulate` and `replay`.
#[derive(Debug, Serialize)]
pub struct SessionReport<'a> {
    pub seed: PieceSeed,
    pub events_handled: usize,
    pub phase: &'a Phase,
    pub stats: &'a GameStats,
    pub state: VisibleState<'a>,
}

impl<'a> SessionReport<'a> {
    pub fn new(session: &'a GameSession, events_handled: usize) -> Self {
        Self {
            seed: session.seed(),
            events_handled,
            phase: session.phase(),
            stats: session.stats(),
            state: session.visible_state(),
        }
    }
}
