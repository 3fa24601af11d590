//! Checkers (draughts) rules engine on the standard 8x8 board.
//!
//! [`game::GameController`] is the entry point: it owns the [`board::Board`],
//! asks [`moves`] for legal destinations, sequences turns and capture chains,
//! and classifies finished games through [`terminal`]. [`observation`] and
//! [`snapshot`] are the numeric and serialized views used by agents and
//! networked peers.

pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod hash;
pub mod moves;
pub mod observation;
pub mod piece;
pub mod snapshot;
pub mod terminal;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use board::{Board, Square};
pub use config::RulesConfig;
pub use error::{CheckersError, Result};
pub use game::GameController;
pub use moves::{Move, MoveMap};
pub use piece::{Color, Piece};
pub use terminal::{DrawReason, Outcome};
