// Engine-vs-itself game loop. Runs on its own thread; the presentation side only ever sees
// copies of the board, delivered as events over a channel.
use crate::board::{BoardState, Grid, MoveKind, Player};
use crate::error::EngineError;
use crate::uci::{EngineId, EngineSession, Score, SearchOutcome};
use log::{debug, info, warn};
use serde::Serialize;
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct MatchConfig {
    pub movetime_ms: u64,
    pub max_plies: usize,
    /// Pause after each ply so a viewer can follow.
    pub move_delay: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self { Self { movetime_ms: 1000, max_plies: 300, move_delay: Duration::ZERO } }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOver {
    Checkmate,
    Resignation,
    Draw,
    /// `bestmove (none)` / `0000` without a mate score: stalemate or another dead end.
    NoLegalMove,
    /// Output closed without a `bestmove` line.
    EngineExited,
    PlyLimit,
    /// The event receiver went away.
    Abandoned,
}

impl GameOver {
    /// Classifies a `bestmove` token. `None` means an ordinary move was played.
    pub fn from_best_move(best: Option<&str>, last_score: Option<Score>) -> Option<Self> {
        let Some(best) = best else { return Some(Self::EngineExited) };
        match best {
            "resign" => Some(Self::Resignation),
            "1/2-1/2" => Some(Self::Draw),
            "mate" => Some(Self::Checkmate),
            "(none)" | "0000" if last_score == Some(Score::Mate(0)) => Some(Self::Checkmate),
            "(none)" | "0000" => Some(Self::NoLegalMove),
            _ => None,
        }
    }

    pub fn from_outcome(outcome: &SearchOutcome) -> Option<Self> {
        Self::from_best_move(outcome.best_move.as_deref(), outcome.score)
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::Checkmate => "Checkmate",
            Self::Resignation => "Resignation",
            Self::Draw => "Draw",
            Self::NoLegalMove => "No legal move",
            Self::EngineExited => "Engine exited",
            Self::PlyLimit => "Ply limit reached",
            Self::Abandoned => "Abandoned",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    Started { engine: EngineId, board: Grid, turn: Player },
    Moved { ply: usize, mv: String, kind: MoveKind, board: Grid, turn: Player, score: Option<Score> },
    /// The board refused the engine's move; the grid is unchanged but the game goes on.
    Rejected { ply: usize, mv: String, error: String },
    Finished { reason: GameOver, plies: usize },
}

#[derive(Clone, Debug, Serialize)]
pub struct GameSummary {
    pub reason: GameOver,
    pub moves: Vec<String>,
    pub board: Grid,
}

/// Plays until a terminal `bestmove`, the ply limit, or an engine error. The session is
/// stopped on every exit path.
pub fn play_game(session: &mut EngineSession, board: &mut BoardState, config: &MatchConfig, events: &Sender<GameEvent>) -> Result<GameSummary, EngineError> {
    let res = run(session, board, config, events);
    if let Err(e) = &res { warn!("game aborted: {e}"); }
    session.stop();
    res
}

fn run(session: &mut EngineSession, board: &mut BoardState, config: &MatchConfig, events: &Sender<GameEvent>) -> Result<GameSummary, EngineError> {
    let engine = session.handshake()?;
    session.set_position(&[])?;
    let mut history: Vec<String> = Vec::new();
    let mut open = events.send(GameEvent::Started { engine, board: board.snapshot(), turn: board.current_turn() }).is_ok();

    let reason = loop {
        if !open { break GameOver::Abandoned; }
        if history.len() >= config.max_plies { break GameOver::PlyLimit; }
        let outcome = session.go_movetime(config.movetime_ms)?;
        if let Some(over) = GameOver::from_outcome(&outcome) { break over; }
        let Some(mv) = outcome.best_move else { break GameOver::EngineExited };
        let ply = history.len() + 1;
        info!("ply {ply}: {} plays {mv}", board.current_turn());

        let event = match board.make_move_uci(&mv) {
            Ok(applied) => {
                board.advance_turn();
                GameEvent::Moved { ply, mv: mv.clone(), kind: applied.kind, board: board.snapshot(), turn: board.current_turn(), score: outcome.score }
            }
            Err(e) => {
                // the engine's game continues regardless; keep the side to move in step with it
                board.advance_turn();
                GameEvent::Rejected { ply, mv: mv.clone(), error: e.to_string() }
            }
        };
        open = events.send(event).is_ok();
        history.push(mv);
        session.set_position(&history)?;
        if !config.move_delay.is_zero() { thread::sleep(config.move_delay); }
    };

    info!("game over after {} plies: {}", history.len(), reason.reason());
    if events.send(GameEvent::Finished { reason, plies: history.len() }).is_err() {
        debug!("no receiver for the final event");
    }
    Ok(GameSummary { reason, moves: history, board: board.snapshot() })
}

/// Runs a fresh game on a dedicated thread, starting the session first if needed.
pub fn spawn_game(mut session: EngineSession, config: MatchConfig) -> io::Result<(Receiver<GameEvent>, JoinHandle<Result<GameSummary, EngineError>>)> {
    let (tx, rx) = mpsc::channel();
    let handle = thread::Builder::new().name("engine-driver".into()).spawn(move || {
        session.start()?;
        let mut board = BoardState::startpos();
        play_game(&mut session, &mut board, &config, &tx)
    })?;
    Ok((rx, handle))
}
