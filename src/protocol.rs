// src/protocol.rs
//! Line codec used between peers: one move per line, `fromCol,fromRow,toCol,toRow`.
//!
//! Decoding only checks the shape of the line. Coordinates are handed to the
//! engine as received, which rejects anything off the board.

use crate::error::ProtocolError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fmt;

lazy_static! {
    static ref MOVE_LINE: Regex =
        Regex::new(r"^\s*(-?[0-9]+)\s*,\s*(-?[0-9]+)\s*,\s*(-?[0-9]+)\s*,\s*(-?[0-9]+)\s*$")
            .expect("move line pattern is valid");
}

#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq)]
pub struct WireMove {
    pub from_col: i32,
    pub from_row: i32,
    pub to_col: i32,
    pub to_row: i32,
}

impl WireMove {
    pub fn new(from_col: i32, from_row: i32, to_col: i32, to_row: i32) -> Self {
        WireMove { from_col, from_row, to_col, to_row }
    }
}

impl fmt::Display for WireMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.from_col, self.from_row, self.to_col, self.to_row)
    }
}

/// Encodes a move as a line body (no trailing newline).
pub fn encode(mv: &WireMove) -> String {
    mv.to_string()
}

pub fn decode(line: &str) -> Result<WireMove, ProtocolError> {
    let caps = MOVE_LINE
        .captures(line)
        .ok_or_else(|| ProtocolError::Malformed(line.trim_end().to_string()))?;
    let mut fields = [0i32; 4];
    for (i, field) in fields.iter_mut().enumerate() {
        let text = &caps[i + 1];
        *field = text
            .parse()
            .map_err(|_| ProtocolError::NumberTooLarge(text.to_string()))?;
    }
    Ok(WireMove::new(fields[0], fields[1], fields[2], fields[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_and_padded_lines() {
        assert_eq!(decode("4,1,4,3"), Ok(WireMove::new(4, 1, 4, 3)));
        assert_eq!(decode(" 6 , 0,5 ,2 \r\n"), Ok(WireMove::new(6, 0, 5, 2)));
    }

    #[test]
    fn keeps_out_of_range_numbers_for_the_engine() {
        assert_eq!(decode("9,-1,0,12"), Ok(WireMove::new(9, -1, 0, 12)));
    }

    #[test]
    fn rejects_malformed_lines() {
        for bad in ["", "4,1,4", "4,1,4,3,2", "a,1,4,3", "4;1;4;3", "e2e4"] {
            assert!(matches!(decode(bad), Err(ProtocolError::Malformed(_))), "{:?}", bad);
        }
        assert!(matches!(decode("99999999999,0,0,0"), Err(ProtocolError::NumberTooLarge(_))));
    }

    #[test]
    fn encode_matches_wire_format() {
        assert_eq!(encode(&WireMove::new(4, 1, 4, 3)), "4,1,4,3");
    }
}
