//! Game loop on top of the [`core`](crate::core) data structures.
//!
//! - [`GameSession`] - one game: board, active piece, phase machine and statistics
//! - [`GameStats`] - score, level and line counts
//! - [`ScoringPolicy`] / [`GravityPolicy`] - points per clear, level thresholds
//!   and tick intervals
//! - [`PieceBuffer`] - 7-bag piece generation system
//! - [`PieceSeed`] - seed for deterministic piece generation
//! - [`EventLoop`] - real-time driver merging channel input with gravity ticks
//!
//! # Game Flow
//!
//! ```text
//! Spawning ──ok──▶ Falling ──tick/soft drop at floor, hard drop──▶ Locking
//!    │  ▲             │ ▲  move, rotate, tick                          │
//!    │  │             └─┘                                              ▼
//!    │  └──────────────────────────────────────────────────────── Clearing
//!    └──blocked──▶ GameOver
//! ```
//!
//! `Spawning`, `Locking` and `Clearing` need no input and are passed through
//! within a single [`GameSession::handle`] call.

pub use self::{event_loop::*, game_session::*, game_stats::*, piece_buffer::*, scoring::*};

mod event_loop;
mod game_session;
mod game_stats;
mod piece_buffer;
pub(crate) mod scoring;
