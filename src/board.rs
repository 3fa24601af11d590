use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CheckersError, Result};
use crate::piece::{Color, Piece};

pub const ROWS: usize = 8;
pub const COLS: usize = 8;

/// A cell on the 8x8 board. Row 0 is White's back rank, row 7 Red's.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Debug)]
pub struct Square {
    pub row: usize,
    pub col: usize,
}

impl Square {
    pub fn new(row: usize, col: usize) -> Result<Square> {
        if row < ROWS && col < COLS {
            Ok(Square { row, col })
        } else {
            Err(CheckersError::InvalidCoordinate { row, col })
        }
    }

    pub fn from_index(index: usize) -> Result<Square> {
        if index < ROWS * COLS {
            Ok(Square {
                row: index / COLS,
                col: index % COLS,
            })
        } else {
            Err(CheckersError::InvalidCoordinate {
                row: index / COLS,
                col: index % COLS,
            })
        }
    }

    /// Re-check a square that may have been built as a struct literal.
    pub fn checked(self) -> Result<Square> {
        Square::new(self.row, self.col)
    }

    pub fn index(self) -> usize {
        self.row * COLS + self.col
    }

    pub fn is_dark(self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// The square `(dr, dc)` away, if it is still on the board.
    pub fn offset(self, dr: i32, dc: i32) -> Option<Square> {
        let r = self.row as i32 + dr;
        let c = self.col as i32 + dc;
        if (0..ROWS as i32).contains(&r) && (0..COLS as i32).contains(&c) {
            Some(Square {
                row: r as usize,
                col: c as usize,
            })
        } else {
            None
        }
    }

    /// All 32 dark squares in row-major order.
    pub fn dark_squares() -> impl Iterator<Item = Square> {
        (0..ROWS)
            .flat_map(|row| (0..COLS).map(move |col| Square { row, col }))
            .filter(|sq| sq.is_dark())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Board {
    pub squares: [[Option<Piece>; COLS]; ROWS],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; COLS]; ROWS],
        }
    }

    /// Standard opening layout: White on rows 0-2, Red on rows 5-7.
    pub fn new() -> Self {
        let mut board = Board::empty();
        for sq in Square::dark_squares() {
            let color = match sq.row {
                0..=2 => Color::White,
                5..=7 => Color::Red,
                _ => continue,
            };
            board.squares[sq.row][sq.col] = Some(Piece::new(sq, color));
        }
        board
    }

    /// The piece on `square`; `None` for an empty or off-board square.
    pub fn get(&self, square: Square) -> Option<&Piece> {
        self.squares
            .get(square.row)
            .and_then(|row| row.get(square.col))
            .and_then(Option::as_ref)
    }

    /// Checked lookup for coordinates coming from outside the engine.
    pub fn piece_at(&self, row: usize, col: usize) -> Result<Option<&Piece>> {
        let square = Square::new(row, col)?;
        Ok(self.get(square))
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    pub fn place(&mut self, piece: Piece) -> Result<()> {
        let sq = piece.square.checked()?;
        if !sq.is_dark() {
            return Err(CheckersError::LightSquare(sq));
        }
        if self.get(sq).is_some() {
            return Err(CheckersError::Occupied(sq));
        }
        self.squares[sq.row][sq.col] = Some(piece);
        Ok(())
    }

    /// Relocate the piece on `from` to `to`, crowning it if `to` is its
    /// crowning row. Returns the piece as it stands after the move.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<Piece> {
        let from = from.checked()?;
        let to = to.checked()?;
        let mut piece = self.squares[from.row][from.col]
            .take()
            .ok_or(CheckersError::EmptySquare(from))?;
        if self.get(to).is_some() {
            self.squares[from.row][from.col] = Some(piece);
            return Err(CheckersError::Occupied(to));
        }
        piece.square = to;
        if to.row == piece.color.crowning_row() {
            piece.make_king();
        }
        self.squares[to.row][to.col] = Some(piece);
        Ok(piece)
    }

    /// Clear the cells of captured pieces. Off-board squares hold nothing
    /// and are skipped.
    pub fn remove(&mut self, pieces: &[Piece]) {
        for p in pieces {
            if let Some(cell) = self
                .squares
                .get_mut(p.square.row)
                .and_then(|row| row.get_mut(p.square.col))
            {
                *cell = None;
            }
        }
    }

    /// Pieces in row-major order, optionally only those of one color.
    pub fn pieces(&self, color: Option<Color>) -> impl Iterator<Item = &Piece> + '_ {
        self.squares
            .iter()
            .flatten()
            .flatten()
            .filter(move |p| color.map_or(true, |c| p.color == c))
    }

    pub fn count(&self, color: Color) -> usize {
        self.pieces(Some(color)).count()
    }

    pub fn king_count(&self, color: Color) -> usize {
        self.pieces(Some(color)).filter(|p| p.king).count()
    }
}
