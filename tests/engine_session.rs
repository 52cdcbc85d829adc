use uciboard::uci::{EngineConfig, EngineSession, MemoryTransport, Score};
use uciboard::EngineError;

fn session(t: MemoryTransport) -> EngineSession {
    EngineSession::attach(EngineConfig::default(), t)
}

#[test]
fn read_response_stops_at_sentinel() {
    let mut s = session(MemoryTransport::with_output([
        "id name Stockfish 16",
        "option name Hash type spin default 16 min 1 max 33554432",
        "uciok",
        "readyok",
    ]));
    let resp = s.read_response().unwrap();
    assert_eq!(resp, "id name Stockfish 16\noption name Hash type spin default 16 min 1 max 33554432\nuciok\n");
    assert_eq!(s.read_response().unwrap(), "readyok\n");
}

#[test]
fn read_response_includes_bestmove_line() {
    let mut s = session(MemoryTransport::with_output(["info depth 1 score cp 20", "bestmove e2e4 ponder e7e5", "extra"]));
    assert_eq!(s.read_response().unwrap(), "info depth 1 score cp 20\nbestmove e2e4 ponder e7e5\n");
}

#[test]
fn read_response_on_closed_stream_is_end_of_stream() {
    let mut s = session(MemoryTransport::with_output(["id name Half"]));
    assert!(matches!(s.read_response(), Err(EngineError::EndOfStream)));
}

#[test]
fn best_move_is_second_token() {
    let mut s = session(MemoryTransport::with_output([
        "info depth 10 score cp 31 pv e2e4",
        "info depth 11 score mate 4 pv d1h5",
        "bestmove d1h5 ponder g7g6",
    ]));
    let out = s.read_search().unwrap();
    assert_eq!(out.best_move.as_deref(), Some("d1h5"));
    assert_eq!(out.ponder.as_deref(), Some("g7g6"));
    assert_eq!(out.score, Some(Score::Mate(4)));
    assert_eq!(out.depth, Some(11));
}

#[test]
fn best_move_passes_termination_tokens_through() {
    let mut s = session(MemoryTransport::with_output(["bestmove resign", "bestmove 1/2-1/2"]));
    assert_eq!(s.read_best_move().unwrap().as_deref(), Some("resign"));
    assert_eq!(s.read_best_move().unwrap().as_deref(), Some("1/2-1/2"));
}

#[test]
fn best_move_on_closed_stream_is_none() {
    let mut s = session(MemoryTransport::with_output(["info depth 1 score cp 0", "info string bye"]));
    assert_eq!(s.read_best_move().unwrap(), None);
}

#[test]
fn send_command_writes_one_line() {
    let t = MemoryTransport::new();
    let log = t.transcript();
    let mut s = session(t);
    s.send_command("position startpos").unwrap();
    s.set_position(&["e2e4".to_string(), "e7e5".to_string()]).unwrap();
    assert_eq!(log.sent(), vec!["position startpos", "position startpos moves e2e4 e7e5"]);
}

#[test]
fn write_to_dead_engine_fails() {
    let mut s = session(MemoryTransport::new().broken_pipe());
    assert!(matches!(s.send_command("isready"), Err(EngineError::Write(_))));
}

#[test]
fn stopped_session_rejects_io() {
    let mut s = EngineSession::new(EngineConfig::new("unused"));
    assert!(!s.is_running());
    assert!(matches!(s.send_command("uci"), Err(EngineError::NotRunning)));
    assert!(matches!(s.read_best_move(), Err(EngineError::NotRunning)));
    s.stop();
}

#[test]
fn stop_sends_quit_and_is_idempotent() {
    let t = MemoryTransport::new();
    let log = t.transcript();
    let mut s = session(t);
    s.stop();
    assert!(!s.is_running());
    assert!(log.terminated());
    assert_eq!(log.sent(), vec!["quit"]);
    s.stop();
    assert_eq!(log.sent(), vec!["quit"]);
}

#[test]
fn stop_swallows_quit_failure() {
    let t = MemoryTransport::new().broken_pipe();
    let log = t.transcript();
    let mut s = session(t);
    s.stop();
    assert!(log.terminated());
    assert!(!s.is_running());
}

#[test]
fn handshake_collects_id_and_sends_options() {
    let t = MemoryTransport::fake_engine(Vec::<String>::new());
    let log = t.transcript();
    let mut s = EngineSession::attach(EngineConfig::default().with_option("Threads", "2"), t);
    let id = s.handshake().unwrap();
    assert_eq!(id.name.as_deref(), Some("FakeEngine"));
    assert_eq!(log.sent(), vec!["uci", "setoption name Threads value 2", "isready"]);
}

#[test]
fn go_movetime_round_trip() {
    let t = MemoryTransport::fake_engine(["e2e4"]);
    let log = t.transcript();
    let mut s = session(t);
    let out = s.go_movetime(250).unwrap();
    assert_eq!(out.best_move.as_deref(), Some("e2e4"));
    assert_eq!(out.score, Some(Score::Cp(17)));
    assert_eq!(log.sent(), vec!["go movetime 250"]);
}

#[test]
fn start_with_missing_executable_stays_stopped() {
    let mut s = EngineSession::new(EngineConfig::new("/nonexistent/uciboard-no-such-engine"));
    assert!(matches!(s.start(), Err(EngineError::Spawn { .. })));
    assert!(!s.is_running());
}
