use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Square};
use crate::piece::Color;

const DARK_SQUARES: usize = 32;

/// Exact encoding of a position: one byte per dark square plus the side to
/// move. Built by walking the grid, so it does not depend on the order in
/// which pieces were placed.
///
/// Cell codes: 0 empty, 1 red man, 2 red king, 3 white man, 4 white king.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    cells: [u8; DARK_SQUARES],
    turn: Color,
}

impl PositionKey {
    pub fn new(board: &Board, turn: Color) -> Self {
        let mut cells = [0u8; DARK_SQUARES];
        for (slot, sq) in cells.iter_mut().zip(Square::dark_squares()) {
            *slot = match board.get(sq) {
                None => 0,
                Some(p) => {
                    let base = match p.color {
                        Color::Red => 1,
                        Color::White => 3,
                    };
                    base + u8::from(p.king)
                }
            };
        }
        PositionKey { cells, turn }
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    /// 64-bit FNV-1a digest, for logs and compact display only.
    pub fn digest(&self) -> u64 {
        const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0100_0000_01b3;
        let turn_byte = match self.turn {
            Color::Red => 0u8,
            Color::White => 1,
        };
        self.cells
            .iter()
            .chain(std::iter::once(&turn_byte))
            .fold(OFFSET, |h, &b| (h ^ u64::from(b)).wrapping_mul(PRIME))
    }
}

impl fmt::Debug for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PositionKey({:016x})", self.digest())
    }
}

/// Occurrence counts of every position recorded in one game.
#[derive(Clone, Default, Debug)]
pub struct RepetitionTracker {
    counts: HashMap<PositionKey, u32>,
    history: Vec<PositionKey>,
}

impl RepetitionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence and return the new count for that position.
    pub fn record(&mut self, key: PositionKey) -> u32 {
        self.history.push(key);
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    pub fn count(&self, key: &PositionKey) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn history(&self) -> &[PositionKey] {
        &self.history
    }
}
