//! Two-player chess rules engine with a line-based peer relay.
//!
//! [`game::GameState`] owns the authoritative position and is the only thing
//! that mutates it. Legality runs in two gates: [`rules`] decides geometry and
//! occupancy, then [`simulate`] plays the move on a scratch copy and rejects
//! it if the mover's king would be attacked ([`attacks`]).

pub mod attacks;
pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod input;
pub mod piece;
pub mod position;
pub mod protocol;
pub mod relay;
pub mod rules;
pub mod simulate;

pub use board::{Board, Square};
pub use error::{MoveError, RejectReason};
pub use game::{GameState, GameStatus, MoveOutcome, MoveRecord};
pub use piece::{Piece, Player, Rank};
pub use position::{Position, Special};
