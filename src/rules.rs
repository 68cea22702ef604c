// src/rules.rs
//! Per-rank movement legality.
//!
//! These functions decide geometry and occupancy only. Whether a move leaves
//! the mover's own king in check is decided afterwards by
//! [`crate::simulate`].

use crate::attacks;
use crate::board::Square;
use crate::error::RejectReason;
use crate::piece::{Piece, Player, Rank};
use crate::position::Position;

/// What a legality query is being asked for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Probe {
    /// A real move: pawns need an occupant to capture, castling is considered.
    Move,
    /// Does the piece attack the destination? Pawns attack both forward
    /// diagonals whether occupied or not, and castling is never an attack.
    /// Castling legality only ever asks attack probes, so it cannot re-enter
    /// itself through the attack oracle.
    Attack,
}

/// Legality of `from -> to` for `mover`, without the self-check test.
pub fn check_move(pos: &Position, mover: Player, from: Square, to: Square, probe: Probe) -> Result<(), RejectReason> {
    let piece = pos.board.get(from).ok_or(RejectReason::NoPiece)?;
    if from == to { return Err(RejectReason::SameSquare); }
    if piece.owner != mover { return Err(RejectReason::WrongTurn); }
    if pos.board.get(to).map_or(false, |target| target.owner == piece.owner) {
        return Err(RejectReason::OccupiedByOwnPiece);
    }

    match piece.rank {
        Rank::Pawn => pawn_move(pos, &piece, from, to, probe),
        Rank::Knight => knight_move(from, to),
        Rank::Bishop => bishop_move(pos, from, to),
        Rank::Rook => rook_move(pos, from, to),
        Rank::Queen => queen_move(pos, from, to),
        Rank::King => king_move(pos, &piece, from, to, probe),
    }
}

/// Boolean form of [`check_move`] for a real move.
pub fn is_valid_move(pos: &Position, mover: Player, from: Square, to: Square) -> bool {
    check_move(pos, mover, from, to, Probe::Move).is_ok()
}

fn deltas(from: Square, to: Square) -> (i32, i32) {
    (to.col as i32 - from.col as i32, to.row as i32 - from.row as i32)
}

fn pawn_move(pos: &Position, pawn: &Piece, from: Square, to: Square, probe: Probe) -> Result<(), RejectReason> {
    let direction = pawn.owner.pawn_direction();
    let start_row = pawn.owner.pawn_start_row();
    let (dcol, drow) = deltas(from, to);
    let target = pos.board.get(to);

    if dcol == 0 {
        if probe == Probe::Attack { return Err(RejectReason::IllegalPattern); } // Pushes never attack
        if drow == direction {
            return if target.is_none() { Ok(()) } else { Err(RejectReason::BlockedPath) };
        }
        if drow == 2 * direction && from.row == start_row {
            let between = from.offset(0, direction).ok_or(RejectReason::IllegalPattern)?;
            return if target.is_none() && pos.board.is_empty(between) {
                Ok(())
            } else {
                Err(RejectReason::BlockedPath)
            };
        }
        return Err(RejectReason::IllegalPattern);
    }

    if dcol.abs() == 1 && drow == direction {
        if probe == Probe::Attack || target.is_some() { return Ok(()); }
        // En passant: the victim stands beside the destination, on the mover's row.
        let en_passant = pos.en_passant_target.map_or(false, |victim| {
            victim.rank == Rank::Pawn
                && victim.owner != pawn.owner
                && victim.col == to.col
                && victim.row == from.row
        });
        if en_passant { return Ok(()); }
    }
    Err(RejectReason::IllegalPattern)
}

fn knight_move(from: Square, to: Square) -> Result<(), RejectReason> {
    let (dcol, drow) = deltas(from, to);
    match (dcol.abs(), drow.abs()) {
        (1, 2) | (2, 1) => Ok(()),
        _ => Err(RejectReason::IllegalPattern),
    }
}

fn slide(pos: &Position, from: Square, to: Square) -> Result<(), RejectReason> {
    if pos.board.is_path_clear(from, to) { Ok(()) } else { Err(RejectReason::BlockedPath) }
}

fn bishop_move(pos: &Position, from: Square, to: Square) -> Result<(), RejectReason> {
    let (dcol, drow) = deltas(from, to);
    if dcol.abs() != drow.abs() { return Err(RejectReason::IllegalPattern); }
    slide(pos, from, to)
}

fn rook_move(pos: &Position, from: Square, to: Square) -> Result<(), RejectReason> {
    let (dcol, drow) = deltas(from, to);
    if (dcol == 0) == (drow == 0) { return Err(RejectReason::IllegalPattern); }
    slide(pos, from, to)
}

fn queen_move(pos: &Position, from: Square, to: Square) -> Result<(), RejectReason> {
    match rook_move(pos, from, to) {
        Err(RejectReason::IllegalPattern) => bishop_move(pos, from, to),
        result => result,
    }
}

fn king_move(pos: &Position, king: &Piece, from: Square, to: Square, probe: Probe) -> Result<(), RejectReason> {
    let (dcol, drow) = deltas(from, to);
    if dcol.abs() <= 1 && drow.abs() <= 1 {
        return Ok(());
    }
    if drow == 0 && dcol.abs() == 2 {
        if probe == Probe::Attack { return Err(RejectReason::IllegalPattern); }
        if king.has_moved { return Err(RejectReason::CastlingNotAllowed); }
        return castling(pos, from, to);
    }
    Err(RejectReason::IllegalPattern)
}

/// Castling legality for a two-column king move.
///
/// King and rook must be unmoved, every square between them empty, and no
/// square the king stands on or passes through (start and end included) may
/// be attacked by the opponent.
pub fn castling(pos: &Position, from: Square, to: Square) -> Result<(), RejectReason> {
    let king = match pos.board.get(from) {
        Some(k) if k.rank == Rank::King && !k.has_moved => k,
        _ => return Err(RejectReason::CastlingNotAllowed),
    };

    let kingside = to.col > from.col;
    let rook_sq = Square { col: if kingside { 7 } else { 0 }, row: from.row };
    match pos.board.get(rook_sq) {
        Some(rook) if rook.is(king.owner, Rank::Rook) && !rook.has_moved => {}
        _ => return Err(RejectReason::CastlingNotAllowed),
    }

    if !pos.board.is_path_clear(from, rook_sq) {
        return Err(RejectReason::BlockedPath);
    }

    let step: i32 = if kingside { 1 } else { -1 };
    let opponent = king.owner.opposite();
    let mut col = from.col as i32;
    loop {
        let passing = Square { col: col as u8, row: from.row };
        if attacks::is_square_under_attack(pos, passing, opponent) {
            return Err(RejectReason::CastlingNotAllowed);
        }
        if col == to.col as i32 { break; }
        col += step;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(col: u8, row: u8) -> Square {
        Square { col, row }
    }

    fn kings_and(pieces: &[Piece]) -> Position {
        let mut all = vec![
            Piece::new(4, 0, Player::White, Rank::King),
            Piece::new(4, 7, Player::Black, Rank::King),
        ];
        all.extend_from_slice(pieces);
        Position::from_pieces(all, Player::White)
    }

    #[test]
    fn preconditions_short_circuit() {
        let pos = Position::standard();
        let mv = |from, to| check_move(&pos, Player::White, from, to, Probe::Move);
        assert_eq!(mv(sq(4, 4), sq(4, 5)), Err(RejectReason::NoPiece));
        assert_eq!(mv(sq(4, 1), sq(4, 1)), Err(RejectReason::SameSquare));
        assert_eq!(mv(sq(4, 6), sq(4, 5)), Err(RejectReason::WrongTurn));
        assert_eq!(mv(sq(0, 0), sq(0, 1)), Err(RejectReason::OccupiedByOwnPiece));
    }

    #[test]
    fn pawn_pushes() {
        let pos = Position::standard();
        assert!(is_valid_move(&pos, Player::White, sq(4, 1), sq(4, 2)));
        assert!(is_valid_move(&pos, Player::White, sq(4, 1), sq(4, 3)));
        assert!(!is_valid_move(&pos, Player::White, sq(4, 1), sq(4, 4)));
        assert!(!is_valid_move(&pos, Player::White, sq(4, 1), sq(5, 2))); // Diagonal onto empty
        assert!(is_valid_move(&pos, Player::Black, sq(3, 6), sq(3, 4)));
        assert!(!is_valid_move(&pos, Player::Black, sq(3, 6), sq(3, 7)));
    }

    #[test]
    fn double_push_needs_both_squares_empty() {
        let blocker = Piece::new(4, 2, Player::Black, Rank::Knight);
        let pos = kings_and(&[Piece::new(4, 1, Player::White, Rank::Pawn), blocker]);
        assert_eq!(check_move(&pos, Player::White, sq(4, 1), sq(4, 3), Probe::Move), Err(RejectReason::BlockedPath));

        let far_blocker = Piece::new(4, 3, Player::Black, Rank::Knight);
        let pos = kings_and(&[Piece::new(4, 1, Player::White, Rank::Pawn), far_blocker]);
        assert!(!is_valid_move(&pos, Player::White, sq(4, 1), sq(4, 3)));
        assert!(is_valid_move(&pos, Player::White, sq(4, 1), sq(4, 2)));
    }

    #[test]
    fn pawn_captures_diagonally_only_onto_enemy() {
        let pos = kings_and(&[
            Piece::new(3, 3, Player::White, Rank::Pawn),
            Piece::new(4, 4, Player::Black, Rank::Rook),
            Piece::new(3, 4, Player::Black, Rank::Rook),
        ]);
        assert!(is_valid_move(&pos, Player::White, sq(3, 3), sq(4, 4)));
        assert!(!is_valid_move(&pos, Player::White, sq(3, 3), sq(2, 4)));
        assert!(!is_valid_move(&pos, Player::White, sq(3, 3), sq(3, 4)));
        // As an attack probe the empty diagonal counts, the push does not
        assert!(check_move(&pos, Player::White, sq(3, 3), sq(2, 4), Probe::Attack).is_ok());
        assert!(check_move(&pos, Player::White, sq(3, 3), sq(3, 4), Probe::Attack).is_err());
    }

    #[test]
    fn en_passant_requires_marker_beside_the_pawn() {
        let pos = kings_and(&[
            Piece::new(4, 4, Player::White, Rank::Pawn),
            Piece::new(3, 4, Player::Black, Rank::Pawn),
        ]);
        assert!(!is_valid_move(&pos, Player::White, sq(4, 4), sq(3, 5)));

        let pos = pos.with_en_passant_target(sq(3, 4));
        assert!(is_valid_move(&pos, Player::White, sq(4, 4), sq(3, 5)));
        assert!(!is_valid_move(&pos, Player::White, sq(4, 4), sq(5, 5)));
    }

    #[test]
    fn knight_jumps_over_pieces() {
        let pos = Position::standard();
        assert!(is_valid_move(&pos, Player::White, sq(1, 0), sq(2, 2)));
        assert!(is_valid_move(&pos, Player::White, sq(1, 0), sq(0, 2)));
        assert_eq!(check_move(&pos, Player::White, sq(1, 0), sq(1, 2), Probe::Move), Err(RejectReason::IllegalPattern));
    }

    #[test]
    fn sliders_are_blocked() {
        let pos = Position::standard();
        assert_eq!(check_move(&pos, Player::White, sq(0, 0), sq(0, 4), Probe::Move), Err(RejectReason::BlockedPath));
        assert_eq!(check_move(&pos, Player::White, sq(2, 0), sq(5, 3), Probe::Move), Err(RejectReason::BlockedPath));
        assert_eq!(check_move(&pos, Player::White, sq(3, 0), sq(3, 3), Probe::Move), Err(RejectReason::BlockedPath));

        let open = kings_and(&[Piece::new(3, 3, Player::White, Rank::Queen)]);
        assert!(is_valid_move(&open, Player::White, sq(3, 3), sq(3, 7)));
        assert!(is_valid_move(&open, Player::White, sq(3, 3), sq(7, 7)));
        assert!(is_valid_move(&open, Player::White, sq(3, 3), sq(0, 3)));
        assert_eq!(check_move(&open, Player::White, sq(3, 3), sq(4, 5), Probe::Move), Err(RejectReason::IllegalPattern));
    }

    #[test]
    fn rook_and_bishop_shapes() {
        let pos = kings_and(&[
            Piece::new(0, 3, Player::White, Rank::Rook),
            Piece::new(7, 3, Player::White, Rank::Bishop),
        ]);
        assert!(is_valid_move(&pos, Player::White, sq(0, 3), sq(6, 3)));
        assert!(!is_valid_move(&pos, Player::White, sq(0, 3), sq(1, 4)));
        assert!(is_valid_move(&pos, Player::White, sq(7, 3), sq(4, 6)));
        assert!(!is_valid_move(&pos, Player::White, sq(7, 3), sq(7, 5)));
    }

    #[test]
    fn king_steps_one_square() {
        let pos = kings_and(&[]);
        assert!(is_valid_move(&pos, Player::White, sq(4, 0), sq(5, 1)));
        assert!(!is_valid_move(&pos, Player::White, sq(4, 0), sq(4, 2)));
    }

    #[test]
    fn castling_conditions() {
        let rook = Piece::new(7, 0, Player::White, Rank::Rook);
        let pos = kings_and(&[rook]);
        assert!(is_valid_move(&pos, Player::White, sq(4, 0), sq(6, 0)));
        // Queenside rook missing
        assert_eq!(check_move(&pos, Player::White, sq(4, 0), sq(2, 0), Probe::Move), Err(RejectReason::CastlingNotAllowed));

        let moved_rook = kings_and(&[Piece { has_moved: true, ..rook }]);
        assert!(!is_valid_move(&moved_rook, Player::White, sq(4, 0), sq(6, 0)));

        let blocked = kings_and(&[rook, Piece::new(5, 0, Player::White, Rank::Bishop)]);
        assert_eq!(check_move(&blocked, Player::White, sq(4, 0), sq(6, 0), Probe::Move), Err(RejectReason::BlockedPath));

        // Black rook covers the square the king passes through
        let attacked = kings_and(&[rook, Piece::new(5, 5, Player::Black, Rank::Rook)]);
        assert_eq!(check_move(&attacked, Player::White, sq(4, 0), sq(6, 0), Probe::Move), Err(RejectReason::CastlingNotAllowed));

        // A pawn attack on an empty square counts too
        let pawn_covers = kings_and(&[rook, Piece::new(6, 1, Player::Black, Rank::Pawn)]);
        assert!(!is_valid_move(&pawn_covers, Player::White, sq(4, 0), sq(6, 0)));
    }

    #[test]
    fn castling_probe_terminates_with_both_kings_unmoved() {
        // Both sides could castle; each castling test asks about the other side's king.
        let pos = Position::from_pieces([
            Piece::new(4, 0, Player::White, Rank::King),
            Piece::new(7, 0, Player::White, Rank::Rook),
            Piece::new(4, 7, Player::Black, Rank::King),
            Piece::new(7, 7, Player::Black, Rank::Rook),
            Piece::new(0, 7, Player::Black, Rank::Rook),
        ], Player::White);
        assert!(is_valid_move(&pos, Player::White, sq(4, 0), sq(6, 0)));
        assert!(!attacks::is_square_under_attack(&pos, sq(6, 7), Player::White));
    }
}
