use crate::game::GameController;
use crate::observation::Observation;
use crate::piece::Color;
use crate::terminal::Outcome;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct SquarePiece {
    color: String,
    king: bool,
}

#[derive(Serialize)]
struct MoveJson {
    to: [usize; 2],
    captured: Vec<[usize; 2]>,
}

#[derive(Serialize)]
struct BoardState {
    squares: Vec<Vec<Option<SquarePiece>>>,
    current_turn: String,
    selected: Option<[usize; 2]>,
    valid_moves: Vec<MoveJson>,
    in_chain: bool,
    game_over: bool,
    result: Option<String>,
    halfmoves_since_capture: u32,
    last_move: Option<[[usize; 2]; 2]>,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    board_state: Option<BoardState>,
    error: Option<String>,
}

fn color_to_string(c: Color) -> String {
    c.to_string()
}

fn build_board_state(game: &GameController) -> BoardState {
    let board = game.board();
    let squares: Vec<Vec<Option<SquarePiece>>> = board
        .squares
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    cell.map(|p| SquarePiece {
                        color: color_to_string(p.color),
                        king: p.king,
                    })
                })
                .collect()
        })
        .collect();

    let valid_moves: Vec<MoveJson> = game
        .valid_moves()
        .iter()
        .map(|(to, captured)| MoveJson {
            to: [to.row, to.col],
            captured: captured.iter().map(|p| [p.square.row, p.square.col]).collect(),
        })
        .collect();

    let outcome = game.outcome();
    BoardState {
        squares,
        current_turn: color_to_string(game.turn()),
        selected: game.selected().map(|s| [s.row, s.col]),
        valid_moves,
        in_chain: game.in_chain(),
        game_over: outcome.is_over(),
        result: (outcome != Outcome::Playing).then(|| outcome.to_string()),
        halfmoves_since_capture: game.halfmoves_since_capture(),
        last_move: game
            .last_move()
            .map(|m| [[m.from.row, m.from.col], [m.to.row, m.to.col]]),
    }
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

fn error_result(message: String) -> JsValue {
    to_js(&MoveResult {
        board_state: None,
        error: Some(message),
    })
}

#[wasm_bindgen]
pub struct Game {
    inner: GameController,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Game {
        Game {
            inner: GameController::new(),
        }
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn get_board_state(&self) -> JsValue {
        to_js(&build_board_state(&self.inner))
    }

    /// Click on a cell: select a piece or move the selected one.
    pub fn select(&mut self, row: usize, col: usize) -> JsValue {
        match self.inner.select(row, col) {
            Ok(_) => self.get_board_state(),
            Err(err) => error_result(err.to_string()),
        }
    }

    /// Flat `from * 64 + to` action, as produced from the observation mask.
    pub fn step(&mut self, action: usize) -> JsValue {
        match self.inner.step(action) {
            Ok(true) => self.get_board_state(),
            Ok(false) => error_result("Illegal move".to_string()),
            Err(err) => error_result(err.to_string()),
        }
    }

    pub fn get_observation(&self) -> JsValue {
        to_js(&Observation::of(&self.inner))
    }

    pub fn snapshot(&self) -> Option<String> {
        self.inner.snapshot().to_json().ok()
    }

    /// Accept a peer snapshot; returns whether it was applied.
    pub fn load_snapshot(&mut self, payload: Option<String>) -> bool {
        self.inner.receive_snapshot(payload.as_deref())
    }
}
