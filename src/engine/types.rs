use crate::solver::SolverError;
use thiserror::Error;

/// Phase de résolution du MIP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Minimise l'effectif total.
    Headcount,
    /// À effectif plafonné, minimise les temps pleins — donc maximise la
    /// part des temps partiels.
    PartTimeShare { headcount_cap: u32 },
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error("coverage shortfall at day {day} hour {hour} after roster expansion")]
    CoverageShortfall { day: u8, hour: u8 },
}
