// src/simulate.rs
use crate::attacks;
use crate::board::Square;
use crate::position::Position;

/// Plays `from -> to` on a scratch copy of `pos` and reports whether the
/// mover's king is safe afterwards. The copy is dropped before returning.
pub fn is_move_valid_to_escape_check(pos: &Position, from: Square, to: Square) -> bool {
    let mover = match pos.board.get(from) {
        Some(piece) => piece.owner,
        None => return false,
    };
    let mut scratch = pos.clone();
    scratch.apply_unchecked(from, to);
    !attacks::is_king_in_check(&scratch, mover)
}
