// In-memory stand-in for an engine process, for driving EngineSession without a binary.
use super::transport::EngineTransport;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Responder = Box<dyn FnMut(&str) -> Vec<String> + Send>;

#[derive(Debug, Default)]
struct Log {
    sent: Vec<String>,
    terminated: bool,
}

/// Shared view of what a [`MemoryTransport`] received, readable after the transport has
/// been moved into a session.
#[derive(Clone, Debug, Default)]
pub struct Transcript(Arc<Mutex<Log>>);

impl Transcript {
    pub fn sent(&self) -> Vec<String> {
        self.0.lock().map(|l| l.sent.clone()).unwrap_or_default()
    }

    pub fn terminated(&self) -> bool {
        self.0.lock().map(|l| l.terminated).unwrap_or(false)
    }
}

/// Output is a queue of lines; once it is empty the stream counts as closed. A responder,
/// when set, appends lines to the queue for every command written.
pub struct MemoryTransport {
    pending: VecDeque<String>,
    responder: Option<Responder>,
    writable: bool,
    log: Transcript,
}

impl Default for MemoryTransport {
    fn default() -> Self { Self::new() }
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self { pending: VecDeque::new(), responder: None, writable: true, log: Transcript::default() }
    }

    /// Engine output that is already waiting before any command is sent.
    pub fn with_output<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut t = Self::new();
        t.pending.extend(lines.into_iter().map(Into::into));
        t
    }

    pub fn respond_with<F>(mut self, f: F) -> Self
    where
        F: FnMut(&str) -> Vec<String> + Send + 'static,
    {
        self.responder = Some(Box::new(f));
        self
    }

    /// Every write fails with `BrokenPipe`, as if the process had died.
    pub fn broken_pipe(mut self) -> Self {
        self.writable = false;
        self
    }

    pub fn transcript(&self) -> Transcript { self.log.clone() }

    /// Minimal engine: answers the handshake and readiness probes, and plays `moves` in
    /// order, one per `go`. When they run out it answers `bestmove (none)` after a
    /// `score mate 0` line.
    pub fn fake_engine<I, S>(moves: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut queue: VecDeque<String> = moves.into_iter().map(Into::into).collect();
        Self::new().respond_with(move |cmd| {
            let verb = cmd.split_whitespace().next().unwrap_or("");
            match verb {
                "uci" => vec!["id name FakeEngine".into(), "id author uciboard".into(), "uciok".into()],
                "isready" => vec!["readyok".into()],
                "go" => match queue.pop_front() {
                    Some(mv) => vec!["info depth 1 score cp 17 pv ".to_string() + &mv, format!("bestmove {mv}")],
                    None => vec!["info depth 0 score mate 0".into(), "bestmove (none)".into()],
                },
                _ => Vec::new(),
            }
        })
    }
}

impl EngineTransport for MemoryTransport {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        if !self.writable {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "engine input closed"));
        }
        if let Ok(mut log) = self.log.0.lock() { log.sent.push(line.to_string()); }
        if let Some(f) = self.responder.as_mut() {
            self.pending.extend(f(line));
        }
        Ok(())
    }

    fn read_line(&mut self, _timeout: Option<Duration>) -> io::Result<Option<String>> {
        Ok(self.pending.pop_front())
    }

    fn terminate(&mut self) {
        if let Ok(mut log) = self.log.0.lock() { log.terminated = true; }
        self.writable = false;
        self.pending.clear();
    }
}
