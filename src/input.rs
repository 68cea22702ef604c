// src/input.rs
use crate::board::Square;
use crate::error::CommandError;
use crate::protocol::{self, WireMove};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // e2e4, e2-e4, e2 e4
    static ref SQUARE_MOVE: Regex =
        Regex::new(r"^([a-h][1-8])(?:\s*-\s*|\s+)?([a-h][1-8])$").expect("square move pattern is valid");
}

#[derive(Debug, PartialEq, Eq)]
pub enum UserInput {
    Move(WireMove),
    Command(Command),
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Board, Status, Reset,
    /// `true` prints one JSON object per move.
    History(bool),
    Host(Option<u16>),
    Join(Option<String>, Option<u16>),
    Disconnect, Help, Quit,
}

/// Parses a terminal line into a move or a command.
pub fn parse_user_input(input: &str) -> Result<UserInput, CommandError> {
    let trimmed_input = input.trim();
    let mut parts = trimmed_input.split_whitespace();
    let command_word = parts.next().unwrap_or("").to_lowercase();
    let arguments: Vec<&str> = parts.collect();

    let command = match command_word.as_str() {
        "board" | "show" => Some(Command::Board),
        "history" => match arguments.first() {
            None => Some(Command::History(false)),
            Some(&"json") => Some(Command::History(true)),
            Some(other) => return Err(CommandError::InvalidArgument(other.to_string())),
        },
        "status" => Some(Command::Status),
        "reset" | "new" => Some(Command::Reset),
        "host" => Some(Command::Host(parse_port(arguments.first())?)),
        "join" => Some(Command::Join(
            arguments.first().map(|s| s.to_string()),
            parse_port(arguments.get(1))?,
        )),
        "disconnect" => Some(Command::Disconnect),
        "help" | "?" => Some(Command::Help),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    };
    if let Some(command) = command {
        return Ok(UserInput::Command(command));
    }

    parse_move(trimmed_input).map(UserInput::Move)
}

fn parse_port(arg: Option<&&str>) -> Result<Option<u16>, CommandError> {
    match arg {
        Some(text) => text.parse().map(Some).map_err(|_| CommandError::InvalidArgument(text.to_string())),
        None => Ok(None),
    }
}

/// Accepts the wire form `4,1,4,3` or square names `e2e4`.
pub fn parse_move(input: &str) -> Result<WireMove, CommandError> {
    if input.contains(',') {
        return protocol::decode(input).map_err(CommandError::from);
    }
    let lower = input.to_lowercase();
    let caps = SQUARE_MOVE
        .captures(&lower)
        .ok_or_else(|| CommandError::UnknownCommand(input.to_string()))?;
    match (Square::from_algebraic(&caps[1]), Square::from_algebraic(&caps[2])) {
        (Some(from), Some(to)) => Ok(WireMove::new(from.col as i32, from.row as i32, to.col as i32, to.row as i32)),
        _ => Err(CommandError::InvalidArgument(input.to_string())),
    }
}
