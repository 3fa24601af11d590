use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::Square;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Debug)]
pub enum Color {
    Red,
    White,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::Red => Color::White,
            Color::White => Color::Red,
        }
    }

    /// Row step of a man's forward move. Red advances up the board
    /// (toward row 0), White down it.
    pub fn forward(self) -> i32 {
        match self {
            Color::Red => -1,
            Color::White => 1,
        }
    }

    /// The row on which a man of this color is crowned.
    pub fn crowning_row(self) -> usize {
        match self {
            Color::Red => 0,
            Color::White => 7,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Red => write!(f, "Red"),
            Color::White => write!(f, "White"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub struct Piece {
    pub square: Square,
    pub color: Color,
    pub king: bool,
}

impl Piece {
    pub fn new(square: Square, color: Color) -> Self {
        Piece {
            square,
            color,
            king: false,
        }
    }

    pub fn king(square: Square, color: Color) -> Self {
        Piece {
            square,
            color,
            king: true,
        }
    }

    /// Crowning is one-way; nothing ever clears the flag.
    pub fn make_king(&mut self) {
        self.king = true;
    }

    /// Row directions this piece may travel in.
    pub fn directions(&self) -> &'static [i32] {
        if self.king {
            &[-1, 1]
        } else {
            match self.color {
                Color::Red => &[-1],
                Color::White => &[1],
            }
        }
    }
}
