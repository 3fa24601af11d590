// =============================================================================
// Move generation
//
// Simple steps and capture chains for a single piece. The chain search is a
// pure depth-first walk over the current board: nothing is moved or removed
// while searching. The moving piece's origin counts as vacant, and a piece
// already jumped on the current path cannot be jumped again (it still blocks
// the landing cell until the move is committed).
//
// Every landing square of every path is a destination, carrying the pieces
// captured up to that point, so callers can take a chain one jump at a time
// or all at once. When two paths reach the same destination, the longer
// capture list is kept; on a tie the first path found wins, directions being
// searched in the fixed order of `Piece::directions` x [left, right].
// =============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Square};
use crate::piece::{Color, Piece};

/// Destination -> pieces captured on the way there (empty for a simple step).
pub type MoveMap = BTreeMap<Square, Vec<Piece>>;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub captured: Vec<Piece>,
}

impl Move {
    pub fn is_capture(&self) -> bool {
        !self.captured.is_empty()
    }

    /// Draughts-style notation using the 1-32 numbering of dark squares,
    /// e.g. "22-18" or "25x18" (only endpoints are shown for chains).
    pub fn to_notation(&self) -> String {
        let sep = if self.is_capture() { 'x' } else { '-' };
        format!("{}{}{}", square_number(self.from), sep, square_number(self.to))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_notation())
    }
}

/// 1-based number of a dark square, counted row-major from row 0.
pub fn square_number(sq: Square) -> usize {
    sq.row * 4 + sq.col / 2 + 1
}

/// All destinations for `piece`: simple steps plus every capture path.
pub fn valid_moves(board: &Board, piece: &Piece) -> MoveMap {
    let mut moves = MoveMap::new();
    for &dr in piece.directions() {
        for dc in [-1, 1] {
            if let Some(to) = piece.square.offset(dr, dc) {
                if board.is_empty(to) {
                    moves.insert(to, Vec::new());
                }
            }
        }
    }

    let mut path = Vec::new();
    collect_jumps(board, piece, piece.square, &mut path, &mut moves);
    moves
}

/// Only the capturing destinations for `piece`.
pub fn capture_moves(board: &Board, piece: &Piece) -> MoveMap {
    let mut moves = MoveMap::new();
    let mut path = Vec::new();
    collect_jumps(board, piece, piece.square, &mut path, &mut moves);
    moves
}

pub fn side_can_capture(board: &Board, color: Color) -> bool {
    board
        .pieces(Some(color))
        .any(|p| !capture_moves(board, p).is_empty())
}

/// Every move available to `color`, flattened into `Move` values.
/// With `forced_capture` set, simple steps are dropped whenever any
/// capture exists for the side.
pub fn legal_moves(board: &Board, color: Color, forced_capture: bool) -> Vec<Move> {
    let mut moves: Vec<Move> = board
        .pieces(Some(color))
        .flat_map(|p| {
            valid_moves(board, p).into_iter().map(move |(to, captured)| Move {
                from: p.square,
                to,
                captured,
            })
        })
        .collect();
    if forced_capture && moves.iter().any(Move::is_capture) {
        moves.retain(Move::is_capture);
    }
    moves
}

fn collect_jumps(
    board: &Board,
    piece: &Piece,
    at: Square,
    path: &mut Vec<Piece>,
    moves: &mut MoveMap,
) {
    for &dr in piece.directions() {
        for dc in [-1, 1] {
            let Some((victim, landing)) = jump(board, piece, at, dr, dc, path) else {
                continue;
            };
            path.push(victim);
            merge(moves, landing, path);
            // A man that reaches its crowning row ends its move there.
            let crowned_here = !piece.king && landing.row == piece.color.crowning_row();
            if !crowned_here {
                collect_jumps(board, piece, landing, path, moves);
            }
            path.pop();
        }
    }
}

/// The piece jumped and the landing square for a jump from `at` along
/// `(dr, dc)`, if that jump is possible.
fn jump(
    board: &Board,
    piece: &Piece,
    at: Square,
    dr: i32,
    dc: i32,
    path: &[Piece],
) -> Option<(Piece, Square)> {
    let over = at.offset(dr, dc)?;
    let landing = at.offset(2 * dr, 2 * dc)?;
    let victim = *board.get(over)?;
    if victim.color == piece.color || path.iter().any(|p| p.square == over) {
        return None;
    }
    let vacant = board.is_empty(landing) || landing == piece.square;
    vacant.then_some((victim, landing))
}

fn merge(moves: &mut MoveMap, to: Square, path: &[Piece]) {
    match moves.get(&to) {
        Some(existing) if existing.len() >= path.len() => {}
        _ => {
            moves.insert(to, path.to_vec());
        }
    }
}
