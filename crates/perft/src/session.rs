//! Line-oriented command loop over one position.

use crate::command::{Command, CommandError};
use crate::driver::{run_divide, run_perft};
use movegen::{MoveParseError, Position, PositionError};
use std::io::{self, BufRead, Write};
use thiserror::Error;

/// A command that was understood but could not be carried out.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Position(#[from] PositionError),

    #[error(transparent)]
    Move(#[from] MoveParseError),

    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The current position and output settings of a command loop.
pub struct Session {
    position: Position,
    json: bool,
}

impl Session {
    pub fn new(position: Position, json: bool) -> Self {
        Session { position, json }
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Reads commands until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        for line in input.lines() {
            if self.handle_line(&line?, out)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Executes one line. Command errors are reported on `out` and the
    /// loop goes on; only write failures end it.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        match self.execute(line, out) {
            Ok(flow) => Ok(flow),
            Err(SessionError::Io(err)) => Err(err),
            Err(err) => {
                tracing::debug!(line, error = %err, "command failed");
                writeln!(out, "error: {}", err)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow, SessionError> {
        match Command::parse(line)? {
            Command::Position { fen, moves } => self.set_position(fen.as_deref(), &moves)?,
            Command::GoPerft(depth) => self.go_perft(depth, out)?,
            Command::Display => writeln!(out, "{}", self.position)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Empty => {}
            Command::Unknown(text) => return Err(SessionError::Unknown(text)),
        }
        out.flush()?;
        Ok(Flow::Continue)
    }

    /// Replaces the position only if the FEN and every move are valid.
    fn set_position(&mut self, fen: Option<&str>, moves: &[String]) -> Result<(), SessionError> {
        let mut position = match fen {
            Some(fen) => Position::from_fen(fen)?,
            None => Position::startpos(),
        };
        for text in moves {
            position.play(text)?;
        }
        self.position = position;
        Ok(())
    }

    fn go_perft<W: Write>(&mut self, depth: u32, out: &mut W) -> Result<(), SessionError> {
        if depth == 0 {
            let report = run_perft(&mut self.position, 0);
            if self.json {
                serde_json::to_writer(&mut *out, &report)?;
                writeln!(out)?;
            } else {
                writeln!(out, "{}", report)?;
            }
            return Ok(());
        }

        let report = run_divide(&mut self.position, depth);
        if self.json {
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}", report)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_script(script: &str) -> (Session, String) {
        let mut session = Session::new(Position::startpos(), false);
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn position_with_moves() {
        let (session, output) = run_script("position startpos moves e2e4 c7c5 g1f3\n");
        assert!(output.is_empty());
        assert_eq!(
            session.position().to_fen(),
            "rnbqkbnr/pp1ppppp/8/2p5/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
        );
    }

    #[test]
    fn go_perft_prints_divide() {
        let (_, output) = run_script("position fen 4k3/8/8/8/8/8/8/4K2R w K - 0 1\ngo perft 1\n");
        assert!(output.contains("e1g1: 1\n"));
        assert!(output.contains("Moves: 15\n"));
    }

    #[test]
    fn go_perft_json() {
        let mut session = Session::new(Position::startpos(), true);
        let mut out = Vec::new();
        session.handle_line("go perft 2", &mut out).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["nodes"], 400);
        assert_eq!(json["moves"].as_array().map(Vec::len), Some(20));
    }

    #[test]
    fn go_perft_zero_counts_the_root() {
        let (_, output) = run_script("go perft 0\n");
        assert!(output.starts_with("depth  0  nodes            1"));
    }

    #[test]
    fn errors_are_reported_and_loop_continues() {
        let (session, output) = run_script(
            "position startpos moves e2e5\nflip\ngo perft x\nposition fen 8/8 w\nd\n",
        );
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "error: illegal move in this position: e2e5");
        assert_eq!(lines[1], "error: unknown command: flip");
        assert_eq!(lines[2], "error: invalid depth 'x'");
        assert!(lines[3].starts_with("error: "));
        assert!(output.contains("Fen: rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"));
        assert_eq!(session.position(), &Position::startpos());
    }

    #[test]
    fn position_with_capturable_king_is_rejected() {
        let (session, output) =
            run_script("position fen 4k2R/8/8/8/8/8/8/4K3 w - - 0 1\ngo perft 1\n");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "error: Black is in check but it is not their move");
        assert!(output.contains("Moves: 20\n"));
        assert_eq!(session.position(), &Position::startpos());
    }

    #[test]
    fn quit_stops_reading() {
        let (_, output) = run_script("quit\nd\n");
        assert!(output.is_empty());
    }

    #[test]
    fn blank_lines_are_ignored() {
        let mut session = Session::new(Position::startpos(), false);
        let mut out = Vec::new();
        assert_eq!(session.handle_line("   ", &mut out).unwrap(), Flow::Continue);
        assert!(out.is_empty());
    }
}
