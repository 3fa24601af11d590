use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::RulesConfig;
use crate::hash::{PositionKey, RepetitionTracker};
use crate::moves::legal_moves;
use crate::piece::Color;

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum DrawReason {
    ThreefoldRepetition,
    MoveLimit,
    NoLegalMoves,
    InsufficientMaterial,
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum Outcome {
    Playing,
    Win(Color),
    Draw(DrawReason),
}

impl Outcome {
    pub fn is_over(self) -> bool {
        !matches!(self, Outcome::Playing)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Playing => write!(f, "In progress"),
            Outcome::Win(color) => write!(f, "{color} wins"),
            Outcome::Draw(DrawReason::ThreefoldRepetition) => write!(f, "Draw by repetition"),
            Outcome::Draw(DrawReason::MoveLimit) => write!(f, "Draw: no capture within move limit"),
            Outcome::Draw(DrawReason::NoLegalMoves) => write!(f, "Draw: no legal moves"),
            Outcome::Draw(DrawReason::InsufficientMaterial) => {
                write!(f, "Draw: insufficient material")
            }
        }
    }
}

/// Classify the position with `turn` to move. Checks run in priority order:
/// elimination, repetition, move limit, stalemate, insufficient material.
pub fn evaluate(
    board: &Board,
    turn: Color,
    halfmoves_since_capture: u32,
    tracker: &RepetitionTracker,
    config: &RulesConfig,
) -> Outcome {
    for color in [turn, turn.opposite()] {
        if board.count(color) == 0 {
            return Outcome::Win(color.opposite());
        }
    }

    let key = PositionKey::new(board, turn);
    if tracker.count(&key) >= config.repetition_limit {
        return Outcome::Draw(DrawReason::ThreefoldRepetition);
    }

    if halfmoves_since_capture >= config.draw_halfmoves {
        return Outcome::Draw(DrawReason::MoveLimit);
    }

    if legal_moves(board, turn, false).is_empty() {
        return Outcome::Draw(DrawReason::NoLegalMoves);
    }

    if insufficient_material(board) {
        return Outcome::Draw(DrawReason::InsufficientMaterial);
    }

    Outcome::Playing
}

/// Lone king against a lone king or against two kings.
pub fn insufficient_material(board: &Board) -> bool {
    let material = |c: Color| (board.count(c), board.king_count(c));
    matches!(
        (material(Color::Red), material(Color::White)),
        ((1, 1), (1, 1)) | ((1, 1), (2, 2)) | ((2, 2), (1, 1))
    )
}
