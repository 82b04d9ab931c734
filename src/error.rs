use std::fmt;

/// A broken structural invariant of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invariant {
    MissingStart,
    MissingFinish,
    MultipleStarts { count: usize },
    MultipleFinishes { count: usize },
    /// A start or finish cell is also flagged as a wall.
    WallOnEndpoint { index: usize },
    /// Walking the `previous` links revisited a cell.
    CyclicPath { index: usize },
    /// Start and finish would land on the same cell.
    EndpointCollision { index: usize },
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invariant::MissingStart => write!(f, "grid has no start cell"),
            Invariant::MissingFinish => write!(f, "grid has no finish cell"),
            Invariant::MultipleStarts { count } => write!(f, "grid has {count} start cells"),
            Invariant::MultipleFinishes { count } => write!(f, "grid has {count} finish cells"),
            Invariant::WallOnEndpoint { index } => {
                write!(f, "cell {index} is both a wall and an endpoint")
            }
            Invariant::CyclicPath { index } => {
                write!(f, "back-pointer chain revisits cell {index}")
            }
            Invariant::EndpointCollision { index } => {
                write!(f, "cell {index} is already the other endpoint")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvariantViolation(Invariant),
    OutOfRange { index: usize, len: usize },
    InvalidDimensions { rows: usize, cols: usize },
    /// The grid is owned by an in-progress replay.
    Busy,
    UnknownSelector { kind: &'static str, value: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvariantViolation(invariant) => write!(f, "invariant violation: {invariant}"),
            Error::OutOfRange { index, len } => {
                write!(f, "cell index {index} is out of range for a grid of {len} cells")
            }
            Error::InvalidDimensions { rows, cols } => write!(
                f,
                "invalid grid dimensions {rows}x{cols} (need at least 1 row and 2 columns)"
            ),
            Error::Busy => write!(f, "grid is busy with an active replay"),
            Error::UnknownSelector { kind, value } => write!(f, "unknown {kind} '{value}'"),
        }
    }
}

impl std::error::Error for Error {}

impl From<Invariant> for Error {
    fn from(invariant: Invariant) -> Self {
        Error::InvariantViolation(invariant)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
