use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CheckersError, Result};

/// Half-moves without a capture after which the game is drawn
/// (40 moves per side).
pub const DEFAULT_DRAW_HALFMOVES: u32 = 80;

/// Occurrences of one position that make a repetition draw.
pub const DEFAULT_REPETITION_LIMIT: u32 = 3;

/// Rule knobs for one game. Missing fields in a config file fall back to
/// the defaults above.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(default)]
pub struct RulesConfig {
    pub draw_halfmoves: u32,
    pub repetition_limit: u32,
    /// When set, a side that can capture anywhere must capture.
    pub forced_capture: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            draw_halfmoves: DEFAULT_DRAW_HALFMOVES,
            repetition_limit: DEFAULT_REPETITION_LIMIT,
            forced_capture: false,
        }
    }
}

impl RulesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(CheckersError::Config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        tracing::debug!(?path, ?config, "loaded rules config");
        Ok(config)
    }
}
