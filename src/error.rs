// src/error.rs
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::io;

// --- Move Rejection ---

/// Why the engine refused a move. A refused move never changes the game.
#[derive(Debug, Serialize, Copy, Clone, PartialEq, Eq)]
pub enum RejectReason {
    OutOfBounds,
    NoPiece,
    WrongTurn,
    SameSquare,
    OccupiedByOwnPiece,
    IllegalPattern,   // Wrong shape for the piece (knight moving straight, pawn moving back...)
    BlockedPath,
    CastlingNotAllowed,
    SelfCheck,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::OutOfBounds => write!(f, "coordinates must be between 0 and 7"),
            RejectReason::NoPiece => write!(f, "no piece on the source square"),
            RejectReason::WrongTurn => write!(f, "it is not that piece's turn to move"),
            RejectReason::SameSquare => write!(f, "source and destination are the same square"),
            RejectReason::OccupiedByOwnPiece => write!(f, "destination is occupied by your own piece"),
            RejectReason::IllegalPattern => write!(f, "the piece cannot move that way"),
            RejectReason::BlockedPath => write!(f, "the path is blocked"),
            RejectReason::CastlingNotAllowed => write!(f, "castling is not allowed here"),
            RejectReason::SelfCheck => write!(f, "the move leaves your king in check"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveError {
    pub from: (i32, i32),
    pub to: (i32, i32),
    pub reason: RejectReason,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Illegal move {},{} -> {},{}: {}",
            self.from.0, self.from.1, self.to.0, self.to.1, self.reason)
    }
}
impl Error for MoveError {}

// --- Wire Protocol ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Line is not four comma-separated integers.
    Malformed(String),
    /// A field looked numeric but does not fit an integer.
    NumberTooLarge(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::Malformed(line) => write!(f, "Malformed move line: '{}'. Expected 'fromCol,fromRow,toCol,toRow'.", line),
            ProtocolError::NumberTooLarge(field) => write!(f, "Coordinate '{}' is out of integer range", field),
        }
    }
}
impl Error for ProtocolError {}

// --- Configuration ---

#[derive(Debug)]
pub enum ConfigError {
    Io(String, io::Error),
    Parse(String, serde_json::Error),
    MissingArgument(String),
    InvalidArgument(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(file, e) => write!(f, "I/O error with config file '{}': {}", file, e),
            ConfigError::Parse(file, e) => write!(f, "Invalid config file '{}': {}", file, e),
            ConfigError::MissingArgument(flag) => write!(f, "Missing value for option '{}'", flag),
            ConfigError::InvalidArgument(arg) => write!(f, "Invalid command-line argument: '{}'", arg),
        }
    }
}
impl Error for ConfigError {}

// --- Peer Relay ---

#[derive(Debug)]
pub enum RelayError {
    Bind(u16, io::Error),
    Accept(io::Error),
    Connect(String, io::Error),
    Send(io::Error),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Bind(port, e) => write!(f, "Server error on port {}: {}", port, e),
            RelayError::Accept(e) => write!(f, "Server error while waiting for a peer: {}", e),
            RelayError::Connect(addr, e) => write!(f, "Failed to connect to server {}: {}", addr, e),
            RelayError::Send(e) => write!(f, "Failed to send move to peer: {}", e),
        }
    }
}
impl Error for RelayError {}

// --- Terminal Commands ---

#[derive(Debug)]
pub enum CommandError {
    UnknownCommand(String),
    MissingArgument(String),
    InvalidArgument(String),
    Protocol(ProtocolError),
    Relay(RelayError),
    IoError(io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::UnknownCommand(cmd) => write!(f, "Unknown command: '{}'. Type 'help' for commands.", cmd),
            CommandError::MissingArgument(cmd) => write!(f, "Missing argument for command: '{}'", cmd),
            CommandError::InvalidArgument(arg) => write!(f, "Invalid argument: '{}'", arg),
            CommandError::Protocol(e) => write!(f, "{}", e),
            CommandError::Relay(e) => write!(f, "{}", e),
            CommandError::IoError(e) => write!(f, "Input/Output error: {}", e),
        }
    }
}
impl Error for CommandError {}

impl From<ProtocolError> for CommandError {
    fn from(e: ProtocolError) -> Self { CommandError::Protocol(e) }
}
impl From<RelayError> for CommandError {
    fn from(e: RelayError) -> Self { CommandError::Relay(e) }
}
impl From<io::Error> for CommandError {
    fn from(e: io::Error) -> Self { CommandError::IoError(e) }
}
