// src/game.rs
use crate::attacks;
use crate::board::{Board, Square};
use crate::error::{MoveError, RejectReason};
use crate::piece::{Piece, Player, Rank};
use crate::position::{Position, Special};
use crate::rules;
use crate::simulate;
use serde::Serialize;
use std::fmt;

// --- Game Status ---

#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// The side to move is in check but has a way out.
    Check(Player),
    Checkmate { winner: Player },
    Stalemate,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate { .. } | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::Ongoing => write!(f, "in progress"),
            GameStatus::Check(player) => write!(f, "{} is in check", player),
            GameStatus::Checkmate { winner } => write!(f, "checkmate, {} wins", winner),
            GameStatus::Stalemate => write!(f, "stalemate, draw"),
        }
    }
}

// --- Move History ---

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct MoveRecord {
    pub player: Player,
    pub rank: Rank,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Rank>,
    pub special: Option<Special>,
    /// Status of the game right after this move.
    pub status: GameStatus,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.special {
            Some(Special::CastleKingside) => write!(f, "O-O")?,
            Some(Special::CastleQueenside) => write!(f, "O-O-O")?,
            Some(Special::Promotion) => write!(f, "{}{}q", self.from, self.to)?,
            _ => write!(f, "{}{}", self.from, self.to)?,
        }
        match self.status {
            GameStatus::Checkmate { .. } => write!(f, "#"),
            GameStatus::Check(_) => write!(f, "+"),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Accepted(MoveRecord),
    Rejected(RejectReason),
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted(_))
    }
}

// --- Game State Engine ---

/// Authoritative game: the position plus history and the status after the last move.
#[derive(Debug, Clone)]
pub struct GameState {
    position: Position,
    history: Vec<MoveRecord>,
    status: GameStatus,
}

impl GameState {
    /// Starts a game from the standard opening position, White to move.
    pub fn new() -> Self {
        GameState::from_position(Position::standard())
    }

    /// Starts a game from an arbitrary position (test boards, puzzles).
    pub fn from_position(position: Position) -> Self {
        let mut game = GameState { position, history: Vec::new(), status: GameStatus::Ongoing };
        game.status = game.compute_status();
        game
    }

    pub fn reset(&mut self) {
        *self = GameState::new();
    }

    pub fn piece_at(&self, col: i32, row: i32) -> Option<Piece> {
        self.position.board.piece_at(col, row)
    }

    pub fn board(&self) -> &Board { &self.position.board }
    pub fn position(&self) -> &Position { &self.position }
    pub fn side_to_move(&self) -> Player { self.position.side_to_move }
    pub fn en_passant_target(&self) -> Option<Piece> { self.position.en_passant_target }
    pub fn history(&self) -> &[MoveRecord] { &self.history }
    pub fn status(&self) -> GameStatus { self.status }

    /// Geometric legality for the side to move, ignoring self-check.
    pub fn is_valid_move(&self, from_col: i32, from_row: i32, to_col: i32, to_row: i32) -> bool {
        match (Square::new(from_col, from_row), Square::new(to_col, to_row)) {
            (Some(from), Some(to)) => rules::is_valid_move(&self.position, self.position.side_to_move, from, to),
            _ => false,
        }
    }

    /// Whether the mover's king is safe after the move, judged on a scratch copy.
    pub fn is_move_valid_to_escape_check(&self, from_col: i32, from_row: i32, to_col: i32, to_row: i32) -> bool {
        match (Square::new(from_col, from_row), Square::new(to_col, to_row)) {
            (Some(from), Some(to)) => simulate::is_move_valid_to_escape_check(&self.position, from, to),
            _ => false,
        }
    }

    /// Full legality check for the side to move.
    pub fn validate(&self, from_col: i32, from_row: i32, to_col: i32, to_row: i32) -> Result<(Square, Square), RejectReason> {
        let from = Square::new(from_col, from_row).ok_or(RejectReason::OutOfBounds)?;
        let to = Square::new(to_col, to_row).ok_or(RejectReason::OutOfBounds)?;
        self.validate_squares(self.position.side_to_move, from, to)?;
        Ok((from, to))
    }

    fn validate_squares(&self, mover: Player, from: Square, to: Square) -> Result<(), RejectReason> {
        rules::check_move(&self.position, mover, from, to, rules::Probe::Move)?;
        if !simulate::is_move_valid_to_escape_check(&self.position, from, to) {
            return Err(RejectReason::SelfCheck);
        }
        Ok(())
    }

    /// Attempts a move. A rejected move leaves the game exactly as it was.
    pub fn move_piece(&mut self, from_col: i32, from_row: i32, to_col: i32, to_row: i32) -> MoveOutcome {
        let (from, to) = match self.validate(from_col, from_row, to_col, to_row) {
            Ok(squares) => squares,
            Err(reason) => return MoveOutcome::Rejected(reason),
        };
        let applied = match self.position.apply_unchecked(from, to) {
            Some(applied) => applied,
            None => return MoveOutcome::Rejected(RejectReason::NoPiece),
        };

        self.status = self.compute_status();
        let record = MoveRecord {
            player: applied.mover.owner,
            rank: applied.mover.rank,
            from,
            to,
            captured: applied.captured.map(|p| p.rank),
            special: applied.special,
            status: self.status,
        };
        self.history.push(record.clone());
        MoveOutcome::Accepted(record)
    }

    /// Same as [`GameState::move_piece`] with the rejection as an error.
    pub fn try_move(&mut self, from_col: i32, from_row: i32, to_col: i32, to_row: i32) -> Result<MoveRecord, MoveError> {
        match self.move_piece(from_col, from_row, to_col, to_row) {
            MoveOutcome::Accepted(record) => Ok(record),
            MoveOutcome::Rejected(reason) => Err(MoveError {
                from: (from_col, from_row),
                to: (to_col, to_row),
                reason,
            }),
        }
    }

    pub fn is_king_in_check(&self, player: Player) -> bool {
        attacks::is_king_in_check(&self.position, player)
    }

    /// In check with no move that is both legal and check-escaping.
    pub fn is_checkmate(&self, player: Player) -> bool {
        self.is_king_in_check(player) && !self.has_legal_move(player)
    }

    /// Not in check, but no legal move at all.
    pub fn is_stalemate(&self, player: Player) -> bool {
        !self.is_king_in_check(player) && !self.has_legal_move(player)
    }

    /// Every `(from, to)` pair `player` could legally play, as if it were their turn.
    pub fn legal_moves(&self, player: Player) -> Vec<(Square, Square)> {
        let mut moves = Vec::new();
        for piece in self.position.board.pieces_of(player) {
            let from = Square::of(&piece);
            for to in Square::all() {
                if self.validate_squares(player, from, to).is_ok() {
                    moves.push((from, to));
                }
            }
        }
        moves
    }

    pub fn has_legal_move(&self, player: Player) -> bool {
        self.position.board.pieces_of(player).any(|piece| {
            let from = Square::of(&piece);
            Square::all().any(|to| self.validate_squares(player, from, to).is_ok())
        })
    }

    fn compute_status(&self) -> GameStatus {
        let player = self.position.side_to_move;
        let in_check = self.is_king_in_check(player);
        match (in_check, self.has_legal_move(player)) {
            (true, false) => GameStatus::Checkmate { winner: player.opposite() },
            (false, false) => GameStatus::Stalemate,
            (true, true) => GameStatus::Check(player),
            (false, true) => GameStatus::Ongoing,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        GameState::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.position.board)?;
        writeln!(f, "Turn: {}", self.position.side_to_move)?;
        match self.position.en_passant_target {
            Some(pawn) => writeln!(f, "En Passant Target: {}", Square::of(&pawn))?,
            None => writeln!(f, "En Passant Target: -")?,
        }
        write!(f, "Status: {}", self.status)
    }
}

/// Formats a history as numbered move pairs, e.g. `1. e2e4 e7e5`.
pub fn format_history(history: &[MoveRecord]) -> String {
    let mut out = String::new();
    let mut move_num = 1;
    let mut line = String::new();
    for record in history {
        match record.player {
            Player::White => {
                if !line.is_empty() {
                    out.push_str(&line);
                    out.push('\n');
                    move_num += 1;
                }
                line = format!("{}. {}", move_num, record);
            }
            Player::Black => {
                if line.is_empty() {
                    line = format!("{}. ... {}", move_num, record);
                } else {
                    line.push_str(&format!(" {}", record));
                }
                out.push_str(&line);
                out.push('\n');
                line.clear();
                move_num += 1;
            }
        }
    }
    if !line.is_empty() {
        out.push_str(&line);
        out.push('\n');
    }
    out
}
