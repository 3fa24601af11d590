//! Whole-game snapshots exchanged between two networked peers.
//!
//! The relay treats a snapshot as opaque JSON; only this module knows its
//! shape. Decoding re-validates every piece, so a corrupt payload can never
//! produce a board with pieces off the grid, on light squares, or stacked.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Square};
use crate::config::RulesConfig;
use crate::error::{CheckersError, Result};
use crate::game::GameController;
use crate::piece::{Color, Piece};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Snapshot {
    pub turn: Color,
    pub halfmoves_since_capture: u32,
    pub pieces: Vec<Piece>,
    /// The piece still jumping when the snapshot was taken mid-chain.
    #[serde(default)]
    pub chain: Option<Square>,
}

impl Snapshot {
    pub fn of(game: &GameController) -> Self {
        Snapshot {
            turn: game.turn(),
            halfmoves_since_capture: game.halfmoves_since_capture(),
            pieces: game.board().pieces(None).copied().collect(),
            chain: if game.in_chain() { game.selected() } else { None },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(CheckersError::Snapshot)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CheckersError::Snapshot)
    }

    /// Rebuild the board, rejecting any piece that breaks board invariants.
    pub fn to_board(&self) -> Result<Board> {
        let mut board = Board::empty();
        for piece in &self.pieces {
            let square = piece.square.checked()?;
            if board.get(square).is_some() {
                return Err(CheckersError::DuplicateSquare(square));
            }
            board.place(*piece)?;
        }
        Ok(board)
    }
}

impl GameController {
    /// Resume a game from a peer's snapshot. The repetition history restarts
    /// at the snapshot position. A chain in progress stays locked to its
    /// piece, which must still have a capture.
    pub fn from_snapshot(snapshot: &Snapshot, config: RulesConfig) -> Result<Self> {
        let board = snapshot.to_board()?;
        let mut game = GameController::with_state(
            board,
            snapshot.turn,
            snapshot.halfmoves_since_capture,
            config,
        );
        if let Some(square) = snapshot.chain {
            game.resume_chain(square.checked()?)?;
        }
        Ok(game)
    }

    /// Poll-style ingestion of a peer update. `None` means nothing arrived
    /// this tick; an undecodable payload is logged and dropped. Returns
    /// whether the game was replaced.
    pub fn receive_snapshot(&mut self, payload: Option<&str>) -> bool {
        let Some(payload) = payload else {
            return false;
        };
        let restored = Snapshot::from_json(payload)
            .and_then(|snapshot| GameController::from_snapshot(&snapshot, self.config().clone()));
        match restored {
            Ok(game) => {
                tracing::debug!(turn = %game.turn(), "applied peer snapshot");
                *self = game;
                true
            }
            Err(err) => {
                tracing::warn!("dropping peer snapshot: {err}");
                false
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::of(self)
    }
}
