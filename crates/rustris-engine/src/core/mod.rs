pub use self::{board::*, piece::*, placement::SoftTick};

pub(crate) mod board;
pub(crate) mod piece;
pub mod placement;
