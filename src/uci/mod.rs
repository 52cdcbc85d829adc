// UCI client. One session owns one engine; requests are strictly half-duplex: every command
// that expects an answer is followed by exactly one blocking read before the next command.
pub mod info;
pub mod memory;
pub mod transport;

use crate::error::EngineError;
use log::{debug, info, warn};
use std::io;
use std::path::PathBuf;
use std::time::Duration;

pub use info::{EngineId, Score, SearchOutcome};
pub use memory::{MemoryTransport, Transcript};
pub use transport::{EngineTransport, ProcessTransport};

pub const DEFAULT_ENGINE: &str = "stockfish";

#[derive(Clone, Debug)]
pub struct EngineConfig {
    pub path: PathBuf,
    pub args: Vec<String>,
    /// Deadline for each line read; `None` blocks indefinitely.
    pub read_timeout: Option<Duration>,
    /// Sent as `setoption` once, right after the handshake.
    pub options: Vec<(String, String)>,
}

impl Default for EngineConfig {
    fn default() -> Self { Self::new(DEFAULT_ENGINE) }
}

impl EngineConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), args: Vec::new(), read_timeout: None, options: Vec::new() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push((name.into(), value.into()));
        self
    }
}

/// Stopped until [`start`](Self::start) (or [`attach`](Self::attach)); Running until [`stop`](Self::stop).
pub struct EngineSession {
    config: EngineConfig,
    transport: Option<Box<dyn EngineTransport>>,
}

impl EngineSession {
    pub fn new(config: EngineConfig) -> Self { Self { config, transport: None } }

    /// A running session over an existing transport, e.g. a [`MemoryTransport`].
    pub fn attach(config: EngineConfig, transport: impl EngineTransport + 'static) -> Self {
        Self { config, transport: Some(Box::new(transport)) }
    }

    pub fn config(&self) -> &EngineConfig { &self.config }

    pub fn is_running(&self) -> bool { self.transport.is_some() }

    /// Spawns the engine. A failed spawn leaves the session stopped.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.is_running() {
            debug!("start: engine already running");
            return Ok(());
        }
        let t = ProcessTransport::spawn(&self.config.path, &self.config.args)
            .map_err(|source| EngineError::Spawn { path: self.config.path.clone(), source })?;
        info!("engine started: {}", self.config.path.display());
        self.transport = Some(Box::new(t));
        Ok(())
    }

    pub fn send_command(&mut self, cmd: &str) -> Result<(), EngineError> {
        let t = self.transport.as_mut().ok_or(EngineError::NotRunning)?;
        debug!(">> {cmd}");
        t.write_line(cmd).map_err(EngineError::Write)
    }

    fn next_line(&mut self) -> Result<Option<String>, EngineError> {
        let timeout = self.config.read_timeout;
        let t = self.transport.as_mut().ok_or(EngineError::NotRunning)?;
        match t.read_line(timeout) {
            Ok(Some(line)) => {
                debug!("<< {line}");
                Ok(Some(line))
            }
            Ok(None) => {
                debug!("<< EOF");
                Ok(None)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Err(EngineError::Timeout(timeout.unwrap_or_default())),
            Err(e) => Err(EngineError::Read(e)),
        }
    }

    /// Reads up to and including the next `uciok`, `readyok` or `bestmove` line; every line
    /// read is returned newline-terminated. A closed stream before that is `EndOfStream`.
    pub fn read_response(&mut self) -> Result<String, EngineError> {
        let mut out = String::new();
        while let Some(line) = self.next_line()? {
            out.push_str(&line);
            out.push('\n');
            if info::is_sentinel(&line) { return Ok(out); }
        }
        Err(EngineError::EndOfStream)
    }

    /// Reads until a `bestmove` line and returns its second token (`e2e4`, `resign`, `(none)`, ...).
    /// `None` when the stream closed first: no move is available.
    pub fn read_best_move(&mut self) -> Result<Option<String>, EngineError> {
        Ok(self.read_search()?.best_move)
    }

    /// Like [`read_best_move`](Self::read_best_move), keeping the last score and depth reported
    /// by `info` lines on the way.
    pub fn read_search(&mut self) -> Result<SearchOutcome, EngineError> {
        let mut outcome = SearchOutcome::default();
        while let Some(line) = self.next_line()? {
            if let Some(bm) = info::parse_bestmove(&line) {
                outcome.best_move = bm.best;
                outcome.ponder = bm.ponder;
                return Ok(outcome);
            }
            if let Some(i) = info::parse_info(&line) { outcome.absorb_info(i); }
        }
        warn!("engine output closed before bestmove");
        Ok(outcome)
    }

    /// `uci` / `uciok`, then the configured options, then `isready` / `readyok`.
    pub fn handshake(&mut self) -> Result<EngineId, EngineError> {
        self.send_command("uci")?;
        let mut id = EngineId::default();
        for line in self.read_response()?.lines() { id.absorb(line); }
        let options = self.config.options.clone();
        for (name, value) in &options {
            self.send_command(&format!("setoption name {name} value {value}"))?;
        }
        self.is_ready()?;
        info!("engine ready: {}", id.name.as_deref().unwrap_or("(unnamed)"));
        Ok(id)
    }

    pub fn is_ready(&mut self) -> Result<(), EngineError> {
        self.send_command("isready")?;
        let resp = self.read_response()?;
        if resp.lines().any(|l| l.trim_end() == info::READYOK) {
            Ok(())
        } else {
            // a stray bestmove ended the read; the engine was still busy
            Err(EngineError::Protocol(format!("expected readyok, got {:?}", resp.trim_end())))
        }
    }

    /// `position startpos`, followed by `moves ...` when the history is not empty.
    pub fn set_position(&mut self, moves: &[String]) -> Result<(), EngineError> {
        if moves.is_empty() {
            self.send_command("position startpos")
        } else {
            self.send_command(&format!("position startpos moves {}", moves.join(" ")))
        }
    }

    pub fn go_movetime(&mut self, ms: u64) -> Result<SearchOutcome, EngineError> {
        self.send_command(&format!("go movetime {ms}"))?;
        self.read_search()
    }

    /// Best-effort `quit`, then kill. Does nothing when already stopped.
    pub fn stop(&mut self) {
        let Some(mut t) = self.transport.take() else { return };
        if let Err(e) = t.write_line("quit") {
            debug!("quit not delivered: {e}");
        }
        t.terminate();
        info!("engine stopped");
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) { self.stop(); }
}
