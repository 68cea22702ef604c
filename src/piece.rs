// src/piece.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

// --- Enums ---
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Player { White, Black }

impl Player {
    pub fn opposite(&self) -> Player {
        match self { Player::White => Player::Black, Player::Black => Player::White }
    }

    /// Row direction this side's pawns advance in.
    pub fn pawn_direction(&self) -> i32 {
        match self { Player::White => 1, Player::Black => -1 }
    }

    pub fn pawn_start_row(&self) -> u8 {
        match self { Player::White => 1, Player::Black => 6 }
    }

    /// Farthest row from this side, where its pawns promote.
    pub fn promotion_row(&self) -> u8 {
        match self { Player::White => 7, Player::Black => 0 }
    }

    pub fn back_row(&self) -> u8 {
        match self { Player::White => 0, Player::Black => 7 }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::White => write!(f, "White"),
            Player::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Rank { King, Queen, Bishop, Rook, Knight, Pawn }

impl Rank {
    fn symbol(&self) -> char {
        match self {
            Rank::King => 'k', Rank::Queen => 'q', Rank::Bishop => 'b',
            Rank::Rook => 'r', Rank::Knight => 'n', Rank::Pawn => 'p',
        }
    }
}

/// Display tag for a piece of the given owner and rank: uppercase for White.
pub fn display_tag(owner: Player, rank: Rank) -> char {
    match owner {
        Player::White => rank.symbol().to_ascii_uppercase(),
        Player::Black => rank.symbol(),
    }
}

// --- Piece ---

/// Snapshot of one chess unit. Every mutator returns a new value.
///
/// Equality and hashing only look at `(col, row, owner, rank)`: two snapshots
/// of the same unit on the same square compare equal even if one of them has
/// `has_moved` set.
#[derive(Debug, Serialize, Deserialize, Copy, Clone)]
pub struct Piece {
    pub col: u8,
    pub row: u8,
    pub owner: Player,
    pub rank: Rank,
    pub has_moved: bool,
    pub en_passant_vulnerable: bool,
    pub tag: char,
}

impl Piece {
    pub fn new(col: u8, row: u8, owner: Player, rank: Rank) -> Self {
        Piece {
            col, row, owner, rank,
            has_moved: false,
            en_passant_vulnerable: false,
            tag: display_tag(owner, rank),
        }
    }

    /// Copy relocated to `(col, row)` and flagged as moved.
    pub fn with_position(&self, col: u8, row: u8) -> Self {
        Piece { col, row, has_moved: true, ..*self }
    }

    pub fn with_promotion(&self, rank: Rank, tag: char) -> Self {
        Piece { rank, tag, ..*self }
    }

    pub fn with_en_passant_vulnerable(&self, vulnerable: bool) -> Self {
        Piece { en_passant_vulnerable: vulnerable, ..*self }
    }

    pub fn is(&self, owner: Player, rank: Rank) -> bool {
        self.owner == owner && self.rank == rank
    }
}

impl PartialEq for Piece {
    fn eq(&self, other: &Self) -> bool {
        self.col == other.col && self.row == other.row
            && self.owner == other.owner && self.rank == other.rank
    }
}

impl Eq for Piece {}

impl Hash for Piece {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.col, self.row, self.owner, self.rank).hash(state);
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)
    }
}
