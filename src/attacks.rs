// src/attacks.rs
use crate::board::Square;
use crate::piece::Player;
use crate::position::Position;
use crate::rules::{self, Probe};

/// True if any piece of `by` attacks `target`.
///
/// Attacks are not filtered for the attacker's own king safety: a pinned
/// piece still gives check.
pub fn is_square_under_attack(pos: &Position, target: Square, by: Player) -> bool {
    pos.board.pieces_of(by).any(|attacker| {
        rules::check_move(pos, by, Square::of(&attacker), target, Probe::Attack).is_ok()
    })
}

/// Whether `player`'s king is attacked. A board without that king is never in check.
pub fn is_king_in_check(pos: &Position, player: Player) -> bool {
    match pos.board.find_king(player) {
        Some(king) => is_square_under_attack(pos, Square::of(&king), player.opposite()),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Piece, Rank};

    #[test]
    fn opening_position_has_no_check() {
        let pos = Position::standard();
        assert!(!is_king_in_check(&pos, Player::White));
        assert!(!is_king_in_check(&pos, Player::Black));
        // Third row is covered by white pawns and knights
        assert!(is_square_under_attack(&pos, Square { col: 2, row: 2 }, Player::White));
        assert!(!is_square_under_attack(&pos, Square { col: 4, row: 3 }, Player::White));
    }

    #[test]
    fn check_is_seen_regardless_of_side_to_move() {
        let pos = Position::from_pieces([
            Piece::new(4, 0, Player::White, Rank::King),
            Piece::new(4, 7, Player::Black, Rank::King),
            Piece::new(4, 5, Player::Black, Rank::Rook),
        ], Player::Black);
        assert!(is_king_in_check(&pos, Player::White));
        assert!(!is_king_in_check(&pos, Player::Black));
    }

    #[test]
    fn pinned_attacker_still_gives_check() {
        // Black knight is pinned to its king by the white rook but still checks the white king.
        let pos = Position::from_pieces([
            Piece::new(4, 0, Player::White, Rank::King),
            Piece::new(3, 2, Player::Black, Rank::Knight),
            Piece::new(3, 7, Player::Black, Rank::King),
            Piece::new(3, 0, Player::White, Rank::Rook),
        ], Player::White);
        assert!(is_king_in_check(&pos, Player::White));
    }

    #[test]
    fn missing_king_is_not_in_check() {
        let pos = Position::from_pieces([Piece::new(0, 0, Player::Black, Rank::Queen)], Player::White);
        assert!(!is_king_in_check(&pos, Player::White));
    }
}
