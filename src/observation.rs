//! Fixed-size numeric view of a game for learning agents.
//!
//! Cells are indexed `row * 8 + col`. Values: 0 empty, 1 white man,
//! 2 white king, -1 red man, -2 red king. Actions are flat
//! `from * 64 + to` indices into a 4096-entry mask.

use serde::{Deserialize, Serialize};

use crate::board::{Board, Square, COLS, ROWS};
use crate::error::{CheckersError, Result};
use crate::game::GameController;
use crate::piece::{Color, Piece};

pub const CELLS: usize = ROWS * COLS;
pub const ACTIONS: usize = CELLS * CELLS;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Observation {
    pub board: Vec<i8>,
    pub action_mask: Vec<u8>,
}

impl Observation {
    /// Board encoding plus the mask of actions legal for the side to move.
    pub fn of(game: &GameController) -> Self {
        let mut action_mask = vec![0u8; ACTIONS];
        for mv in game.legal_actions() {
            action_mask[encode_action(mv.from, mv.to)] = 1;
        }
        Observation {
            board: encode_board(game.board()).to_vec(),
            action_mask,
        }
    }

    pub fn legal_action_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.action_mask
            .iter()
            .enumerate()
            .filter(|(_, legal)| **legal == 1)
            .map(|(i, _)| i)
    }
}

pub fn cell_value(piece: &Piece) -> i8 {
    let sign = match piece.color {
        Color::White => 1,
        Color::Red => -1,
    };
    if piece.king {
        2 * sign
    } else {
        sign
    }
}

pub fn encode_board(board: &Board) -> [i8; CELLS] {
    let mut cells = [0i8; CELLS];
    for p in board.pieces(None) {
        cells[p.square.index()] = cell_value(p);
    }
    cells
}

pub fn encode_action(from: Square, to: Square) -> usize {
    from.index() * CELLS + to.index()
}

pub fn decode_action(action: usize) -> Result<(Square, Square)> {
    if action >= ACTIONS {
        return Err(CheckersError::InvalidAction(action));
    }
    let from = Square::from_index(action / CELLS)?;
    let to = Square::from_index(action % CELLS)?;
    Ok((from, to))
}
