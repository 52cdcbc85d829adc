use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Rejected board mutation. The grid is left untouched whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid coordinates ({row}, {col})")]
    InvalidCoordinates { row: usize, col: usize },
    #[error("no piece to move at ({row}, {col})")]
    EmptySquare { row: usize, col: usize },
    #[error("invalid piece code {0}")]
    InvalidPiece(i8),
    #[error("invalid move notation `{0}`")]
    InvalidNotation(String),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("failed to start engine `{}`: {source}", .path.display())]
    Spawn { path: PathBuf, #[source] source: io::Error },
    #[error("engine is not running")]
    NotRunning,
    #[error("write to engine failed: {0}")]
    Write(#[source] io::Error),
    #[error("read from engine failed: {0}")]
    Read(#[source] io::Error),
    #[error("unexpected engine reply: {0}")]
    Protocol(String),
    #[error("engine closed its output")]
    EndOfStream,
    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),
}
