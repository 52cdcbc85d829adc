// Board mirror + UCI engine client
pub mod board;
pub mod error;
pub mod game;
pub mod uci;

pub use board::{BoardState, Grid, Player};
pub use error::{BoardError, EngineError};
pub use game::{play_game, spawn_game, GameEvent, GameOver, GameSummary, MatchConfig};
pub use uci::{EngineConfig, EngineSession};
