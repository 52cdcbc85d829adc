// Parsers for the engine's side of the protocol: `id`, `info ... score` and `bestmove` lines.
use serde::Serialize;

pub const UCIOK: &str = "uciok";
pub const READYOK: &str = "readyok";
pub const BESTMOVE: &str = "bestmove";

/// True for the lines that end a blocking read: `uciok`, `readyok`, or any `bestmove ...`.
pub fn is_sentinel(line: &str) -> bool {
    let line = line.trim_end();
    line == UCIOK || line == READYOK || line.starts_with(BESTMOVE)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Score {
    Cp(i32),
    /// Moves to mate; negative when the side to move is being mated, zero when it already is.
    Mate(i32),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EngineId {
    pub name: Option<String>,
    pub author: Option<String>,
}

impl EngineId {
    /// Picks up `id name ...` / `id author ...`; ignores every other line.
    pub fn absorb(&mut self, line: &str) {
        let Some(rest) = line.trim().strip_prefix("id ") else { return };
        if let Some(name) = rest.strip_prefix("name ") {
            self.name = Some(name.trim().to_string());
        } else if let Some(author) = rest.strip_prefix("author ") {
            self.author = Some(author.trim().to_string());
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InfoLine {
    pub depth: Option<u32>,
    pub score: Option<Score>,
}

pub fn parse_info(line: &str) -> Option<InfoLine> {
    let mut tokens = line.split_whitespace();
    if tokens.next()? != "info" { return None; }
    let mut info = InfoLine::default();
    while let Some(tok) = tokens.next() {
        match tok {
            "depth" => info.depth = tokens.next().and_then(|s| s.parse().ok()),
            "score" => {
                info.score = match (tokens.next(), tokens.next().and_then(|s| s.parse::<i32>().ok())) {
                    (Some("cp"), Some(v)) => Some(Score::Cp(v)),
                    (Some("mate"), Some(v)) => Some(Score::Mate(v)),
                    _ => None,
                };
            }
            // the rest of the line is free text
            "string" | "pv" => break,
            _ => {}
        }
    }
    Some(info)
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BestMoveLine {
    pub best: Option<String>,
    pub ponder: Option<String>,
}

/// `None` unless the line starts with `bestmove`. The move is the second token, verbatim.
pub fn parse_bestmove(line: &str) -> Option<BestMoveLine> {
    if !line.starts_with(BESTMOVE) { return None; }
    let mut tokens = line.split_whitespace().skip(1);
    let best = tokens.next().map(str::to_string);
    let ponder = match tokens.next() {
        Some("ponder") => tokens.next().map(str::to_string),
        _ => None,
    };
    Some(BestMoveLine { best, ponder })
}

/// Everything a `go` produced up to and including its `bestmove` line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchOutcome {
    pub best_move: Option<String>,
    pub ponder: Option<String>,
    pub score: Option<Score>,
    pub depth: Option<u32>,
}

impl SearchOutcome {
    pub fn absorb_info(&mut self, info: InfoLine) {
        if info.score.is_some() { self.score = info.score; }
        if info.depth.is_some() { self.depth = info.depth; }
    }
}
