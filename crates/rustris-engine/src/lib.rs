//! Piece and board simulation core for a falling-block puzzle game.
//!
//! - [`core`]: board, tetromino tables and collision/placement checks
//! - [`engine`]: scoring, piece generation, the session state machine and
//!   the event loop that serializes inputs and gravity ticks
//! - [`config`]: policy constants (board size, scoring, gravity)
//!
//! Rendering and input devices are outside this crate; they talk to a
//! [`GameSession`] through [`GameSession::visible_state`],
//! [`GameSession::handle`] and [`GameSession::tick_interval`].

pub use self::{config::*, core::*, engine::*};

pub mod config;
pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell ({col}, {row}) is outside the board")]
pub struct OutOfBoundsError {
    pub col: i32,
    pub row: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MergeError {
    #[display("{_0}")]
    OutOfBounds(OutOfBoundsError),
    #[display("cell ({col}, {row}) is already occupied")]
    Overlap { col: i32, row: i32 },
}

impl From<OutOfBoundsError> for MergeError {
    fn from(err: OutOfBoundsError) -> Self {
        MergeError::OutOfBounds(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("spawn position of {piece} is blocked")]
pub struct SpawnBlockedError {
    #[error(not(source))]
    pub piece: Piece,
}
