use log::debug;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Line-oriented pipe to an engine. `EngineSession` speaks UCI over this and nothing else.
pub trait EngineTransport: Send {
    /// Writes `line` plus a newline and flushes.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Next output line without its terminator. `Ok(None)` once the engine closed its output;
    /// an error of kind `TimedOut` when `timeout` elapsed first.
    fn read_line(&mut self, timeout: Option<Duration>) -> io::Result<Option<String>>;

    /// Forcibly ends the engine. Must be safe to call more than once.
    fn terminate(&mut self);
}

/// A spawned engine executable. Stdout is drained by a reader thread into a channel so that
/// reads can carry a deadline.
pub struct ProcessTransport {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<io::Result<String>>,
    terminated: bool,
}

impl ProcessTransport {
    pub fn spawn(path: &Path, args: &[String]) -> io::Result<Self> {
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;
        let pipes = child.stdin.take().zip(child.stdout.take());
        let Some((stdin, stdout)) = pipes else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "engine pipes unavailable"));
        };

        let (tx, rx) = mpsc::channel();
        let reader = thread::Builder::new().name("uci-reader".into()).spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed { break; }
            }
        });
        // detached: it ends on EOF once the child is gone
        if let Err(e) = reader {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
        debug!("spawned {} (pid {})", path.display(), child.id());
        Ok(Self { child, stdin, lines: rx, terminated: false })
    }
}

impl EngineTransport for ProcessTransport {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.stdin.write_all(line.as_bytes())?;
        self.stdin.write_all(b"\n")?;
        self.stdin.flush()
    }

    fn read_line(&mut self, timeout: Option<Duration>) -> io::Result<Option<String>> {
        let msg = match timeout {
            None => self.lines.recv().ok(),
            Some(d) => match self.lines.recv_timeout(d) {
                Ok(m) => Some(m),
                Err(RecvTimeoutError::Timeout) => {
                    return Err(io::Error::new(io::ErrorKind::TimedOut, format!("no engine output within {d:?}")));
                }
                Err(RecvTimeoutError::Disconnected) => None,
            },
        };
        msg.transpose()
    }

    fn terminate(&mut self) {
        if self.terminated { return; }
        self.terminated = true;
        let _ = self.child.kill();
        let status = self.child.wait();
        debug!("engine pid {} reaped: {:?}", self.child.id(), status);
    }
}

impl Drop for ProcessTransport {
    fn drop(&mut self) { self.terminate(); }
}
