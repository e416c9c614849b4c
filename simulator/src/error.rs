use std::time::Duration;

use thiserror::Error;

/// The budget a gauntlet ran over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutBound {
    WaveDuration(Duration),
    GauntletDuration(Duration),
    WaveExchanges(u32),
    TotalExchanges(u32),
}

impl std::fmt::Display for TimeoutBound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeoutBound::WaveDuration(limit) => write!(f, "wave exceeded {limit:?}"),
            TimeoutBound::GauntletDuration(limit) => write!(f, "gauntlet exceeded {limit:?}"),
            TimeoutBound::WaveExchanges(limit) => write!(f, "wave exceeded {limit} exchanges"),
            TimeoutBound::TotalExchanges(limit) => {
                write!(f, "gauntlet exceeded {limit} total exchanges")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("{hero} timed out in wave {wave} against [{}]: {bound}", .monsters.join(", "))]
    Timeout {
        hero: String,
        wave: usize,
        monsters: Vec<String>,
        bound: TimeoutBound,
    },
    #[error("{hero} gave up after {attempts} attempts: {source}")]
    RetriesExhausted {
        hero: String,
        attempts: u32,
        source: Box<SimulationError>,
    },
    #[error("invalid simulation request: {0}")]
    InvalidRequest(String),
    #[error("unable to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl SimulationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, SimulationError::Timeout { .. })
    }
}
