// =============================================================================
// Game controller
//
// Turn state machine driven by discrete "select cell" events:
//
//   Idle --select own piece--> Selected --apply--> Idle (turn passed)
//                                         \-----> Selected (chain continues)
//
// A capture that leaves further captures available to the landed piece keeps
// the same side to move, with the legal set narrowed to those continuations.
// Crowning always ends the move. After each completed turn the position is
// recorded (keyed with the new side to move) and the outcome re-evaluated;
// once the game is over every input is refused until `reset`.
// =============================================================================

use crate::board::{Board, Square};
use crate::config::RulesConfig;
use crate::error::{CheckersError, Result};
use crate::hash::{PositionKey, RepetitionTracker};
use crate::moves::{capture_moves, legal_moves, side_can_capture, valid_moves, Move, MoveMap};
use crate::observation::decode_action;
use crate::piece::{Color, Piece};
use crate::terminal::{evaluate, Outcome};

#[derive(Clone, Debug)]
pub struct GameController {
    board: Board,
    turn: Color,
    selected: Option<Square>,
    valid_moves: MoveMap,
    halfmoves_since_capture: u32,
    repetitions: RepetitionTracker,
    in_chain: bool,
    outcome: Outcome,
    last_move: Option<Move>,
    config: RulesConfig,
}

impl Default for GameController {
    fn default() -> Self {
        Self::new()
    }
}

impl GameController {
    pub fn new() -> Self {
        Self::with_config(RulesConfig::default())
    }

    pub fn with_config(config: RulesConfig) -> Self {
        Self::with_state(Board::new(), Color::Red, 0, config)
    }

    /// Start from an arbitrary position, e.g. a puzzle or a test setup.
    pub fn from_position(board: Board, turn: Color, config: RulesConfig) -> Self {
        Self::with_state(board, turn, 0, config)
    }

    pub(crate) fn with_state(
        board: Board,
        turn: Color,
        halfmoves_since_capture: u32,
        config: RulesConfig,
    ) -> Self {
        let mut game = GameController {
            board,
            turn,
            selected: None,
            valid_moves: MoveMap::new(),
            halfmoves_since_capture,
            repetitions: RepetitionTracker::new(),
            in_chain: false,
            outcome: Outcome::Playing,
            last_move: None,
            config,
        };
        let key = game.position_key();
        game.repetitions.record(key);
        game.outcome = game.evaluate();
        game
    }

    /// Start a new game with the same rules. The repetition history is
    /// discarded along with the old board.
    pub fn reset(&mut self) {
        *self = Self::with_config(self.config.clone());
        tracing::info!("new game");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Destinations of the selected piece.
    pub fn valid_moves(&self) -> &MoveMap {
        &self.valid_moves
    }

    pub fn halfmoves_since_capture(&self) -> u32 {
        self.halfmoves_since_capture
    }

    pub fn repetitions(&self) -> &RepetitionTracker {
        &self.repetitions
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn in_chain(&self) -> bool {
        self.in_chain
    }

    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn position_key(&self) -> PositionKey {
        PositionKey::new(&self.board, self.turn)
    }

    /// Handle a click on `(row, col)`.
    ///
    /// With a piece selected, this first tries to move it there. If that is
    /// not a legal destination the selection is dropped and the cell is
    /// treated as a fresh selection, except mid-chain, where the chain piece
    /// stays selected. Returns whether anything was moved or selected.
    pub fn select(&mut self, row: usize, col: usize) -> Result<bool> {
        let square = Square::new(row, col)?;
        if self.outcome.is_over() {
            return Ok(false);
        }

        if self.selected.is_some() {
            if self.commit(square)? {
                return Ok(true);
            }
            if self.in_chain {
                return Ok(false);
            }
            self.clear_selection();
        }

        match self.board.get(square).copied() {
            Some(piece) if piece.color == self.turn => {
                self.selected = Some(square);
                self.valid_moves = self.moves_for(&piece);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Move the selected piece to `(row, col)` if that is one of its
    /// destinations.
    pub fn apply(&mut self, row: usize, col: usize) -> Result<bool> {
        let square = Square::new(row, col)?;
        self.commit(square)
    }

    /// Apply a `(source, destination)` action for the side to move. Anything
    /// illegal is refused with `Ok(false)` and leaves the game untouched.
    pub fn apply_action(&mut self, from: Square, to: Square) -> Result<bool> {
        if self.outcome.is_over() || (self.in_chain && self.selected != Some(from)) {
            return Ok(false);
        }
        let piece = match self.board.get(from) {
            Some(p) if p.color == self.turn => *p,
            _ => return Ok(false),
        };
        let moves = self.moves_for(&piece);
        if !moves.contains_key(&to) {
            return Ok(false);
        }
        self.selected = Some(from);
        self.valid_moves = moves;
        self.commit(to)
    }

    /// `apply_action` for a flat `from * 64 + to` action index.
    pub fn step(&mut self, action: usize) -> Result<bool> {
        let (from, to) = decode_action(action)?;
        self.apply_action(from, to)
    }

    /// Destinations open to the piece on `square` right now: empty unless it
    /// belongs to the side to move and, mid-chain, is the chain piece.
    pub fn legal_moves_from(&self, square: Square) -> MoveMap {
        if self.outcome.is_over() {
            return MoveMap::new();
        }
        match self.board.get(square) {
            Some(p) if p.color == self.turn => self.moves_for(p),
            _ => MoveMap::new(),
        }
    }

    /// Every action the side to move may take.
    pub fn legal_actions(&self) -> Vec<Move> {
        if self.outcome.is_over() {
            return Vec::new();
        }
        if self.in_chain {
            let Some(from) = self.selected else {
                return Vec::new();
            };
            return self
                .valid_moves
                .iter()
                .map(|(&to, captured)| Move {
                    from,
                    to,
                    captured: captured.clone(),
                })
                .collect();
        }
        legal_moves(&self.board, self.turn, self.config.forced_capture)
    }

    /// Mid-chain, the next landing square when only one jump is possible.
    /// A UI or agent may feed it straight back into `apply` to auto-resolve
    /// forced chains.
    pub fn forced_continuation(&self) -> Option<Square> {
        if !self.in_chain {
            return None;
        }
        let mut first_jumps = self
            .valid_moves
            .iter()
            .filter(|(_, captured)| captured.len() == 1)
            .map(|(&to, _)| to);
        let only = first_jumps.next()?;
        first_jumps.next().is_none().then_some(only)
    }

    /// Put a restored game back mid-chain with the piece on `square` to move.
    pub(crate) fn resume_chain(&mut self, square: Square) -> Result<()> {
        let piece = match self.board.get(square) {
            Some(p) if p.color == self.turn => *p,
            _ => return Err(CheckersError::NoContinuation(square)),
        };
        let continuations = capture_moves(&self.board, &piece);
        if continuations.is_empty() {
            return Err(CheckersError::NoContinuation(square));
        }
        self.in_chain = true;
        self.selected = Some(square);
        self.valid_moves = continuations;
        Ok(())
    }

    fn moves_for(&self, piece: &Piece) -> MoveMap {
        if self.in_chain {
            return if self.selected == Some(piece.square) {
                capture_moves(&self.board, piece)
            } else {
                MoveMap::new()
            };
        }
        let mut moves = valid_moves(&self.board, piece);
        if self.config.forced_capture && side_can_capture(&self.board, piece.color) {
            moves.retain(|_, captured| !captured.is_empty());
        }
        moves
    }

    fn commit(&mut self, to: Square) -> Result<bool> {
        if self.outcome.is_over() {
            return Ok(false);
        }
        let Some(from) = self.selected else {
            return Ok(false);
        };
        let Some(captured) = self.valid_moves.get(&to).cloned() else {
            return Ok(false);
        };

        let was_king = self.board.get(from).is_some_and(|p| p.king);
        let piece = self.board.move_piece(from, to)?;
        self.board.remove(&captured);

        let mv = Move { from, to, captured };
        if mv.is_capture() {
            self.halfmoves_since_capture = 0;
        } else {
            self.halfmoves_since_capture += 1;
        }
        tracing::debug!(turn = %self.turn, mv = %mv, captured = mv.captured.len(), "move committed");
        let captured_any = mv.is_capture();
        self.last_move = Some(mv);

        let crowned = piece.king && !was_king;
        if captured_any && !crowned {
            let continuations = capture_moves(&self.board, &piece);
            if !continuations.is_empty() {
                self.in_chain = true;
                self.selected = Some(to);
                self.valid_moves = continuations;
                return Ok(true);
            }
        }

        self.end_turn();
        Ok(true)
    }

    fn end_turn(&mut self) {
        self.in_chain = false;
        self.clear_selection();
        self.turn = self.turn.opposite();
        let key = self.position_key();
        let seen = self.repetitions.record(key);
        self.outcome = self.evaluate();
        if self.outcome.is_over() {
            tracing::info!(outcome = %self.outcome, "game over");
        } else {
            tracing::trace!(?key, seen, "position recorded");
        }
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.valid_moves.clear();
    }

    fn evaluate(&self) -> Outcome {
        evaluate(
            &self.board,
            self.turn,
            self.halfmoves_since_capture,
            &self.repetitions,
            &self.config,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::DrawReason;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col).unwrap()
    }

    fn game_with(pieces: &[Piece], turn: Color) -> GameController {
        let mut board = Board::empty();
        for p in pieces {
            board.place(*p).unwrap();
        }
        GameController::from_position(board, turn, RulesConfig::default())
    }

    #[test]
    fn selecting_empty_or_opponent_cells_fails_quietly() {
        let mut game = GameController::new();
        assert!(!game.select(4, 1).unwrap());
        assert!(!game.select(2, 1).unwrap());
        assert_eq!(game.selected(), None);
        assert!(game.select(5, 0).unwrap());
        assert_eq!(game.selected(), Some(sq(5, 0)));
        assert_eq!(game.valid_moves().len(), 1);
    }

    #[test]
    fn out_of_range_select_is_an_error() {
        let mut game = GameController::new();
        assert!(matches!(
            game.select(8, 3),
            Err(CheckersError::InvalidCoordinate { row: 8, col: 3 })
        ));
        assert!(game.apply(0, 9).is_err());
    }

    #[test]
    fn failed_destination_reselects_the_clicked_piece() {
        let mut game = GameController::new();
        assert!(game.select(5, 0).unwrap());
        // (5, 2) is not a destination of (5, 0) but is another red man.
        assert!(game.select(5, 2).unwrap());
        assert_eq!(game.selected(), Some(sq(5, 2)));
        assert_eq!(game.turn(), Color::Red);

        // Clicking an empty non-destination clears the selection.
        assert!(!game.select(3, 0).unwrap());
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn simple_move_passes_the_turn() {
        let mut game = GameController::new();
        game.select(5, 0).unwrap();
        assert!(game.select(4, 1).unwrap());
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.halfmoves_since_capture(), 1);
        assert_eq!(game.selected(), None);
        assert!(game.board().get(sq(4, 1)).is_some());
        assert_eq!(game.last_move().map(Move::to_notation).as_deref(), Some("21-17"));
        assert_eq!(game.repetitions().history().len(), 2);
    }

    #[test]
    fn apply_without_selection_is_refused() {
        let mut game = GameController::new();
        assert!(!game.apply(4, 1).unwrap());
        assert_eq!(game.turn(), Color::Red);
    }

    #[test]
    fn illegal_action_leaves_state_untouched() {
        let mut game = GameController::new();
        let key = game.position_key();
        assert!(!game.apply_action(sq(5, 0), sq(3, 2)).unwrap());
        assert!(!game.apply_action(sq(2, 1), sq(3, 0)).unwrap());
        assert!(!game.apply_action(sq(4, 1), sq(3, 0)).unwrap());
        assert_eq!(game.position_key(), key);
        assert_eq!(game.turn(), Color::Red);
        assert_eq!(game.halfmoves_since_capture(), 0);
        assert_eq!(game.selected(), None);

        assert!(game.apply_action(sq(5, 0), sq(4, 1)).unwrap());
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn chain_keeps_turn_and_locks_selection() {
        let mut game = game_with(
            &[
                Piece::new(sq(6, 1), Color::Red),
                Piece::new(sq(5, 6), Color::Red),
                Piece::new(sq(5, 2), Color::White),
                Piece::new(sq(3, 4), Color::White),
                Piece::new(sq(0, 7), Color::White),
            ],
            Color::Red,
        );
        game.select(6, 1).unwrap();
        assert!(game.select(4, 3).unwrap());
        assert!(game.in_chain());
        assert_eq!(game.turn(), Color::Red);
        assert_eq!(game.halfmoves_since_capture(), 0);
        assert_eq!(game.valid_moves().keys().copied().collect::<Vec<_>>(), vec![sq(2, 5)]);
        assert_eq!(game.forced_continuation(), Some(sq(2, 5)));

        // Another red piece cannot take over mid-chain.
        assert!(!game.select(5, 6).unwrap());
        assert_eq!(game.selected(), Some(sq(4, 3)));
        assert!(!game.apply_action(sq(5, 6), sq(4, 7)).unwrap());
        assert!(game.legal_moves_from(sq(5, 6)).is_empty());

        assert!(game.select(2, 5).unwrap());
        assert!(!game.in_chain());
        assert_eq!(game.turn(), Color::White);
        assert_eq!(game.board().count(Color::White), 1);
    }

    #[test]
    fn crowning_ends_the_chain() {
        let mut game = game_with(
            &[
                Piece::new(sq(2, 5), Color::Red),
                Piece::new(sq(1, 4), Color::White),
                Piece::new(sq(1, 2), Color::White),
            ],
            Color::Red,
        );
        game.select(2, 5).unwrap();
        assert!(game.select(0, 3).unwrap());
        assert!(game.board().get(sq(0, 3)).is_some_and(|p| p.king));
        assert!(!game.in_chain());
        assert_eq!(game.turn(), Color::White);
    }

    #[test]
    fn forced_capture_hides_simple_moves() {
        let pieces = [
            Piece::new(sq(5, 2), Color::Red),
            Piece::new(sq(6, 1), Color::Red),
            Piece::new(sq(4, 3), Color::White),
        ];
        let mut board = Board::empty();
        for p in pieces {
            board.place(p).unwrap();
        }
        let config = RulesConfig {
            forced_capture: true,
            ..RulesConfig::default()
        };
        let mut game = GameController::from_position(board.clone(), Color::Red, config);
        assert!(game.legal_moves_from(sq(6, 1)).is_empty());
        assert_eq!(game.legal_actions().len(), 1);
        assert!(!game.apply_action(sq(6, 1), sq(5, 0)).unwrap());

        let relaxed = GameController::from_position(board, Color::Red, RulesConfig::default());
        assert_eq!(relaxed.legal_moves_from(sq(6, 1)).len(), 1);
        assert!(game.apply_action(sq(5, 2), sq(3, 4)).unwrap());
    }

    #[test]
    fn capturing_last_piece_wins_and_freezes_the_game() {
        let mut game = game_with(
            &[
                Piece::new(sq(5, 2), Color::Red),
                Piece::new(sq(4, 3), Color::White),
            ],
            Color::Red,
        );
        game.select(5, 2).unwrap();
        assert!(game.select(3, 4).unwrap());
        assert_eq!(game.outcome(), Outcome::Win(Color::Red));
        assert!(!game.select(3, 4).unwrap());
        assert!(!game.apply_action(sq(3, 4), sq(2, 3)).unwrap());
        assert!(game.legal_actions().is_empty());

        game.reset();
        assert_eq!(game.outcome(), Outcome::Playing);
        assert_eq!(game.board().count(Color::White), 12);
        assert_eq!(game.repetitions().history().len(), 1);
    }

    #[test]
    fn shuffling_kings_draws_by_repetition() {
        let mut game = game_with(
            &[
                Piece::king(sq(4, 1), Color::Red),
                Piece::new(sq(7, 6), Color::Red),
                Piece::king(sq(1, 6), Color::White),
                Piece::new(sq(0, 1), Color::White),
            ],
            Color::Red,
        );
        let cycle = [((4, 1), (3, 2)), ((1, 6), (2, 5)), ((3, 2), (4, 1)), ((2, 5), (1, 6))];
        for round in 0..2 {
            for (i, &((fr, fc), (tr, tc))) in cycle.iter().enumerate() {
                assert_eq!(game.outcome(), Outcome::Playing, "round {round} step {i}");
                game.select(fr, fc).unwrap();
                assert!(game.select(tr, tc).unwrap());
            }
        }
        assert_eq!(game.repetitions().count(&game.position_key()), 3);
        assert_eq!(game.outcome(), Outcome::Draw(DrawReason::ThreefoldRepetition));
    }
}
