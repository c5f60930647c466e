//! Command loop parsing.

use thiserror::Error;

/// Why a command line could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("expected 'startpos' or 'fen' after 'position'")]
    MissingPositionKind,

    #[error("expected 'startpos' or 'fen', got '{0}'")]
    UnknownPositionKind(String),

    #[error("'position fen' needs a FEN string")]
    MissingFen,

    #[error("unexpected '{0}' after 'position startpos'")]
    UnexpectedToken(String),

    #[error("only 'go perft <depth>' is supported")]
    UnsupportedGo,

    #[error("'go perft' needs a depth")]
    MissingDepth,

    #[error("invalid depth '{0}'")]
    InvalidDepth(String),
}

/// One line of input to the command loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set up a position, optionally followed by moves in UCI notation.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// Count nodes to the given depth, divided by root move.
    GoPerft(u32),
    /// Print the board.
    Display,
    /// Leave the loop.
    Quit,
    /// Blank line.
    Empty,
    /// Anything else, kept verbatim for the error message.
    Unknown(String),
}

impl Command {
    /// Parses one input line.
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let input = input.trim();
        let mut parts = input.split_whitespace();

        match parts.next().unwrap_or("") {
            "position" => Self::parse_position(parts),
            "go" => Self::parse_go(parts),
            "d" => Ok(Command::Display),
            "quit" => Ok(Command::Quit),
            "" => Ok(Command::Empty),
            _ => Ok(Command::Unknown(input.to_string())),
        }
    }

    fn parse_position<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Self, CommandError> {
        let fen = match parts.next() {
            Some("startpos") => match parts.next() {
                None | Some("moves") => None,
                Some(other) => return Err(CommandError::UnexpectedToken(other.to_string())),
            },
            Some("fen") => {
                // FEN fields run until "moves" or the end of the line.
                let fields: Vec<&str> = parts.by_ref().take_while(|&part| part != "moves").collect();
                if fields.is_empty() {
                    return Err(CommandError::MissingFen);
                }
                Some(fields.join(" "))
            }
            Some(other) => return Err(CommandError::UnknownPositionKind(other.to_string())),
            None => return Err(CommandError::MissingPositionKind),
        };

        let moves = parts.map(str::to_string).collect();
        Ok(Command::Position { fen, moves })
    }

    fn parse_go<'a>(mut parts: impl Iterator<Item = &'a str>) -> Result<Self, CommandError> {
        if parts.next() != Some("perft") {
            return Err(CommandError::UnsupportedGo);
        }
        let depth = parts.next().ok_or(CommandError::MissingDepth)?;
        depth
            .parse()
            .map(Command::GoPerft)
            .map_err(|_| CommandError::InvalidDepth(depth.to_string()))
    }
}
