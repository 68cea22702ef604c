// src/position.rs
use crate::board::{Board, Square};
use crate::piece::{display_tag, Piece, Player, Rank};
use serde::{Deserialize, Serialize};

/// Special-move side effects performed while applying a move.
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq)]
pub enum Special {
    CastleKingside,
    CastleQueenside,
    EnPassant,
    Promotion,
}

/// What applying a move did to the board.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Applied {
    pub mover: Piece,   // Snapshot before the move
    pub placed: Piece,  // Snapshot after the move (promoted if applicable)
    pub captured: Option<Piece>,
    pub special: Option<Special>,
}

/// Board, side to move and en-passant marker: everything the rules look at.
/// Cloning gives an independent deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub board: Board,
    pub side_to_move: Player,
    /// Pawn that just advanced two rows; capturable en passant this ply only.
    pub en_passant_target: Option<Piece>,
}

impl Position {
    pub fn standard() -> Self {
        Position { board: Board::standard(), side_to_move: Player::White, en_passant_target: None }
    }

    pub fn from_pieces<I: IntoIterator<Item = Piece>>(pieces: I, side_to_move: Player) -> Self {
        Position { board: Board::from_pieces(pieces), side_to_move, en_passant_target: None }
    }

    /// Marks the pawn on `sq` as the en-passant target. Ignored if `sq` holds no pawn.
    pub fn with_en_passant_target(mut self, sq: Square) -> Self {
        if let Some(pawn) = self.board.get(sq).filter(|p| p.rank == Rank::Pawn) {
            let flagged = pawn.with_en_passant_vulnerable(true);
            self.board.place(flagged);
            self.en_passant_target = Some(flagged);
        }
        self
    }

    /// Applies a move with no legality filtering and switches the side to move.
    ///
    /// Performs en-passant removal, castling rook relocation and queen
    /// promotion exactly as an accepted move would. Returns `None` (and leaves
    /// the position untouched) only when `from` is empty.
    pub(crate) fn apply_unchecked(&mut self, from: Square, to: Square) -> Option<Applied> {
        let mover = self.board.get(from)?;
        let dcol = to.col as i32 - from.col as i32;
        let drow = to.row as i32 - from.row as i32;

        let mut captured = None;
        let mut special = None;

        // En passant: diagonal pawn step onto an empty square takes the pawn beside it.
        if mover.rank == Rank::Pawn && dcol.abs() == 1 && self.board.is_empty(to) {
            let beside = Square { col: to.col, row: from.row };
            captured = self.board.remove(beside);
            if captured.is_some() {
                special = Some(Special::EnPassant);
            }
        }

        // Castling: king and rook both relocate, nothing else to book-keep.
        if mover.rank == Rank::King && dcol.abs() == 2 && drow == 0 {
            let kingside = dcol > 0;
            let rook_from = Square { col: if kingside { 7 } else { 0 }, row: from.row };
            let rook_to_col = if kingside { to.col - 1 } else { to.col + 1 };

            self.board.remove(from);
            let placed = mover.with_position(to.col, to.row);
            self.board.place(placed);
            if let Some(rook) = self.board.remove(rook_from) {
                self.board.place(rook.with_position(rook_to_col, from.row));
            }
            self.clear_en_passant_target();
            self.side_to_move = self.side_to_move.opposite();
            let special = Some(if kingside { Special::CastleKingside } else { Special::CastleQueenside });
            return Some(Applied { mover, placed, captured: None, special });
        }

        if let Some(taken) = self.board.remove(to) {
            captured = Some(taken);
        }
        self.board.remove(from);

        let mut placed = mover.with_position(to.col, to.row).with_en_passant_vulnerable(false);
        if mover.rank == Rank::Pawn && to.row == mover.owner.promotion_row() {
            placed = placed.with_promotion(Rank::Queen, display_tag(mover.owner, Rank::Queen));
            special = Some(Special::Promotion);
        }

        self.clear_en_passant_target();
        if mover.rank == Rank::Pawn && drow.abs() == 2 {
            placed = placed.with_en_passant_vulnerable(true);
            self.en_passant_target = Some(placed);
        }
        self.board.place(placed);

        self.side_to_move = self.side_to_move.opposite();
        Some(Applied { mover, placed, captured, special })
    }

    fn clear_en_passant_target(&mut self) {
        if let Some(old) = self.en_passant_target.take() {
            let sq = Square::of(&old);
            if let Some(pawn) = self.board.get(sq).filter(|p| *p == old) {
                self.board.place(pawn.with_en_passant_vulnerable(false));
            }
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(col: u8, row: u8) -> Square {
        Square { col, row }
    }

    #[test]
    fn double_step_sets_marker_and_single_step_clears_it() {
        let mut pos = Position::standard();
        pos.apply_unchecked(sq(4, 1), sq(4, 3));
        let target = pos.en_passant_target.expect("marker set");
        assert_eq!((target.col, target.row), (4, 3));
        assert!(pos.board.get(sq(4, 3)).map_or(false, |p| p.en_passant_vulnerable));
        assert_eq!(pos.side_to_move, Player::Black);

        pos.apply_unchecked(sq(0, 6), sq(0, 5));
        assert!(pos.en_passant_target.is_none());
        assert!(pos.board.get(sq(4, 3)).map_or(false, |p| !p.en_passant_vulnerable));
    }

    #[test]
    fn castling_relocates_rook_next_to_king() {
        let mut pos = Position::from_pieces([
            Piece::new(4, 0, Player::White, Rank::King),
            Piece::new(0, 0, Player::White, Rank::Rook),
            Piece::new(4, 7, Player::Black, Rank::King),
        ], Player::White);
        let applied = pos.apply_unchecked(sq(4, 0), sq(2, 0)).expect("applied");
        assert_eq!(applied.special, Some(Special::CastleQueenside));
        let rook = pos.board.get(sq(3, 0)).expect("rook on d1");
        assert!(rook.is(Player::White, Rank::Rook) && rook.has_moved);
        assert!(pos.board.get(sq(2, 0)).map_or(false, |k| k.has_moved));
        assert!(pos.board.get(sq(0, 0)).is_none());
    }

    #[test]
    fn empty_source_changes_nothing() {
        let mut pos = Position::standard();
        let before = pos.clone();
        assert!(pos.apply_unchecked(sq(4, 4), sq(4, 5)).is_none());
        assert_eq!(pos, before);
    }
}
