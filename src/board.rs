// src/board.rs
use crate::piece::{Piece, Player, Rank};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BOARD_SIZE: u8 = 8;

// --- Squares ---
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Square {
    pub col: u8,
    pub row: u8,
}

impl Square {
    /// Validated constructor; `None` outside `[0,7]`.
    pub fn new(col: i32, row: i32) -> Option<Square> {
        if (0..BOARD_SIZE as i32).contains(&col) && (0..BOARD_SIZE as i32).contains(&row) {
            Some(Square { col: col as u8, row: row as u8 })
        } else {
            None
        }
    }

    /// Square shifted by a delta, if still on the board.
    pub fn offset(&self, dcol: i32, drow: i32) -> Option<Square> {
        Square::new(self.col as i32 + dcol, self.row as i32 + drow)
    }

    pub fn of(piece: &Piece) -> Square {
        Square { col: piece.col, row: piece.row }
    }

    /// Parses coordinate-square notation like "e2" (column a-h, row 1-8).
    pub fn from_algebraic(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file_char = chars.next()?;
        let rank_char = chars.next()?;
        if chars.next().is_some() { return None; }
        let col = match file_char { 'a'..='h' => file_char as u8 - b'a', _ => return None };
        let row = match rank_char { '1'..='8' => rank_char as u8 - b'1', _ => return None };
        Some(Square { col, row })
    }

    /// All 64 squares, row by row.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square { col, row }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.col) as char, (b'1' + self.row) as char)
    }
}

// --- Board Index ---

/// 8x8 grid, at most one piece per cell. Cells are indexed `[row][col]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    cells: [[Option<Piece>; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl Board {
    pub fn empty() -> Self {
        Board::default()
    }

    /// Canonical 32-piece opening layout.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        const BACK_ROW: [Rank; 8] = [
            Rank::Rook, Rank::Knight, Rank::Bishop, Rank::Queen,
            Rank::King, Rank::Bishop, Rank::Knight, Rank::Rook,
        ];
        for (col, &rank) in BACK_ROW.iter().enumerate() {
            let col = col as u8;
            board.place(Piece::new(col, Player::White.back_row(), Player::White, rank));
            board.place(Piece::new(col, Player::Black.back_row(), Player::Black, rank));
            board.place(Piece::new(col, Player::White.pawn_start_row(), Player::White, Rank::Pawn));
            board.place(Piece::new(col, Player::Black.pawn_start_row(), Player::Black, Rank::Pawn));
        }
        board
    }

    /// Builds a board from a collection of pieces; a later piece on an
    /// already occupied square replaces the earlier one. Pieces whose
    /// coordinates fall outside the board are skipped.
    pub fn from_pieces<I: IntoIterator<Item = Piece>>(pieces: I) -> Self {
        let mut board = Board::empty();
        for piece in pieces {
            board.place(piece);
        }
        board
    }

    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells.get(sq.row as usize)?.get(sq.col as usize).copied().flatten()
    }

    /// Point lookup on raw coordinates; `None` when empty or off the board.
    pub fn piece_at(&self, col: i32, row: i32) -> Option<Piece> {
        Square::new(col, row).and_then(|sq| self.get(sq))
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    fn cell_mut(&mut self, col: u8, row: u8) -> Option<&mut Option<Piece>> {
        self.cells.get_mut(row as usize)?.get_mut(col as usize)
    }

    /// Puts `piece` on its own square, returning whatever was there.
    /// A piece with off-board coordinates is not placed.
    pub fn place(&mut self, piece: Piece) -> Option<Piece> {
        self.cell_mut(piece.col, piece.row)?.replace(piece)
    }

    pub fn remove(&mut self, sq: Square) -> Option<Piece> {
        self.cell_mut(sq.col, sq.row)?.take()
    }

    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        self.cells.iter().flat_map(|row| row.iter().filter_map(|cell| *cell))
    }

    pub fn pieces_of(&self, owner: Player) -> impl Iterator<Item = Piece> + '_ {
        self.pieces().filter(move |p| p.owner == owner)
    }

    pub fn find_king(&self, owner: Player) -> Option<Piece> {
        self.pieces().find(|p| p.is(owner, Rank::King))
    }

    pub fn len(&self) -> usize {
        self.pieces().count()
    }

    /// True when every square strictly between `from` and `to` is empty.
    /// The squares must share a row, column or diagonal.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        let dcol = (to.col as i32 - from.col as i32).signum();
        let drow = (to.row as i32 - from.row as i32).signum();
        let mut current = from;
        loop {
            current = match current.offset(dcol, drow) {
                Some(next) => next,
                None => return false,
            };
            if current == to { return true; }
            if !self.is_empty(current) { return false; }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +-----------------+")?;
        for row in (0..BOARD_SIZE).rev() {
            write!(f, "{} | ", row)?;
            for col in 0..BOARD_SIZE {
                match self.get(Square { col, row }) {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "  +-----------------+")?;
        write!(f, "    0 1 2 3 4 5 6 7")
    }
}
