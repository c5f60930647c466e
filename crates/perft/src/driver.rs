//! Timed perft runs and their reports.

use movegen::{perft, perft_divide, Position};
use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// Node count of one perft run.
#[derive(Debug, Clone, Serialize)]
pub struct PerftReport {
    pub depth: u32,
    pub nodes: u64,
    #[serde(rename = "time_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
    pub nps: u64,
}

/// Node count below one root move.
#[derive(Debug, Clone, Serialize)]
pub struct DivideEntry {
    #[serde(rename = "move")]
    pub mv: String,
    pub nodes: u64,
}

/// Per-move breakdown of one perft run.
#[derive(Debug, Clone, Serialize)]
pub struct DivideReport {
    pub moves: Vec<DivideEntry>,
    #[serde(flatten)]
    pub total: PerftReport,
}

fn as_millis<S: serde::Serializer>(elapsed: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(elapsed.as_millis().min(u128::from(u64::MAX)) as u64)
}

/// Nodes per second, or zero when the run was too quick to time.
pub fn nodes_per_second(nodes: u64, elapsed: Duration) -> u64 {
    let nanos = elapsed.as_nanos();
    if nanos == 0 {
        return 0;
    }
    (u128::from(nodes) * 1_000_000_000 / nanos).min(u128::from(u64::MAX)) as u64
}

/// Counts leaf nodes at `depth`.
pub fn run_perft(position: &mut Position, depth: u32) -> PerftReport {
    let start = Instant::now();
    let nodes = perft(position, depth);
    let elapsed = start.elapsed();
    tracing::debug!(depth, nodes, ?elapsed, "perft finished");
    PerftReport {
        depth,
        nodes,
        elapsed,
        nps: nodes_per_second(nodes, elapsed),
    }
}

/// Counts leaf nodes at `depth` below each legal move.
pub fn run_divide(position: &mut Position, depth: u32) -> DivideReport {
    let start = Instant::now();
    let moves: Vec<DivideEntry> = perft_divide(position, depth)
        .into_iter()
        .map(|(mv, nodes)| DivideEntry {
            mv: mv.to_uci(),
            nodes,
        })
        .collect();
    let elapsed = start.elapsed();
    let nodes: u64 = moves.iter().map(|entry| entry.nodes).sum();
    tracing::debug!(depth, nodes, root_moves = moves.len(), ?elapsed, "divide finished");
    DivideReport {
        moves,
        total: PerftReport {
            depth,
            nodes,
            elapsed,
            nps: nodes_per_second(nodes, elapsed),
        },
    }
}

impl fmt::Display for PerftReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "depth {:>2}  nodes {:>12}  time {:>8} ms  nps {}",
            self.depth,
            self.nodes,
            self.elapsed.as_millis(),
            self.nps
        )
    }
}

impl fmt::Display for DivideReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.moves {
            writeln!(f, "{}: {}", entry.mv, entry.nodes)?;
        }
        writeln!(f)?;
        writeln!(f, "Moves: {}", self.moves.len())?;
        write!(f, "{}", self.total)
    }
}
