use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use picks_terminal::loader::spawn_loader;
use picks_terminal::picks_fetch::{LoadError, PicksSource, load_snapshot};
use picks_terminal::snapshot::parse_snapshot_json;
use picks_terminal::state::{AppState, Delta, LoadPhase, apply_delta};

fn fixture_path() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("picks.json");
    path
}

fn loaded_state(initial: &str) -> AppState {
    let raw = fs::read_to_string(fixture_path()).expect("fixture file should be readable");
    let mut state = AppState::new(initial);
    apply_delta(
        &mut state,
        Delta::Loaded(parse_snapshot_json(&raw).expect("fixture should parse")),
    );
    state
}

/// Serves exactly one canned HTTP response on a local port and hands back
/// the raw request head it received.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    let (req_tx, req_rx) = mpsc::channel();
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            let _ = req_tx.send(String::from_utf8_lossy(&head).into_owned());
            let response = format!(
                "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    (format!("http://{addr}/data/picks.json"), req_rx)
}

#[test]
fn starts_in_loading_with_nothing_rendered() {
    let mut state = AppState::new("2024-01-03");
    assert_eq!(state.phase, LoadPhase::Loading);
    assert_eq!(state.status_line(), "Loading picks…");
    assert_eq!(state.request_date("2024-01-03"), None);
    assert!(state.view.is_none());
    assert!(!state.store.is_loaded());
}

#[test]
fn initial_date_falls_back_to_earliest() {
    let state = loaded_state("2024-01-03");
    assert_eq!(state.phase, LoadPhase::Ready);
    assert_eq!(state.displayed_date(), Some("2024-01-02"));
    assert_eq!(
        state.date_bounds,
        Some(("2024-01-02".to_string(), "2024-01-05".to_string()))
    );
    assert_eq!(
        state.status_line(),
        "Generated: 2024-01-02T14:05:11Z | Dates: 2024-01-02 .. 2024-01-05"
    );
    assert_eq!(state.view.as_ref().map(|v| v.picks.len()), Some(2));
}

#[test]
fn end_to_end_date_requests() {
    let mut state = loaded_state("2024-01-02");

    assert_eq!(state.request_date("2024-01-03").as_deref(), Some("2024-01-02"));
    let view = state.view.as_ref().expect("view");
    assert!(!view.empty);
    assert_eq!(view.picks.len(), 2);
    assert!(view.build_note.is_some());

    state.select_next();
    assert_eq!(state.selected, 1);

    assert_eq!(state.request_date("2024-01-05").as_deref(), Some("2024-01-05"));
    let view = state.view.as_ref().expect("view");
    assert!(view.empty);
    assert!(view.picks.is_empty());
    assert_eq!(view.build_note, None);
    assert_eq!(state.selected, 0);
}

#[test]
fn submit_and_step_share_the_resolve_path() {
    let mut state = loaded_state("2024-01-02");

    state.date_input = "2024-01-05".to_string();
    state.submit_date_input();
    assert_eq!(state.displayed_date(), Some("2024-01-05"));

    state.step(-1);
    assert_eq!(state.displayed_date(), Some("2024-01-02"));
    assert_eq!(state.date_input, "2024-01-02");

    state.date_input.clear();
    state.submit_date_input();
    assert_eq!(state.displayed_date(), Some("2024-01-02"));
}

#[test]
fn http_error_status_leaves_error_state() {
    let (url, _) = serve_once("HTTP/1.1 404 Not Found", "{}");
    let source = PicksSource::parse(&url);

    let err = load_snapshot(&source).unwrap_err();
    assert!(matches!(err, LoadError::Status(404)));

    let mut state = AppState::new("2024-01-02");
    apply_delta(&mut state, Delta::LoadFailed(err.user_message(&source)));

    assert!(matches!(state.phase, LoadPhase::Error(_)));
    let banner = state.error_banner().expect("banner shown");
    assert!(banner.starts_with("Could not load picks.json."));
    assert!(banner.ends_with("Error: HTTP 404"));
    assert!(state.view.is_none());
    assert!(!state.store.is_loaded());
    assert_eq!(state.request_date("2024-01-02"), None);
}

#[test]
fn malformed_http_body_is_parse_error() {
    let (url, _) = serve_once("HTTP/1.1 200 OK", "{\"dates\": 7}");
    let err = load_snapshot(&PicksSource::parse(&url)).unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));
}

#[test]
fn loader_thread_reports_loaded_snapshot() {
    let (tx, rx) = mpsc::channel();
    let source = PicksSource::File(fixture_path());
    spawn_loader(source, tx).join().expect("loader thread");

    let mut state = AppState::new("2024-01-05");
    for delta in rx.try_iter() {
        apply_delta(&mut state, delta);
    }
    assert!(state.is_ready());
    assert_eq!(state.displayed_date(), Some("2024-01-05"));
    assert!(state.logs.iter().any(|l| l.contains("Loaded 2 dates, 2 picks")));
}

#[test]
fn loader_thread_reports_failure() {
    let (tx, rx) = mpsc::channel();
    spawn_loader(PicksSource::File(PathBuf::from("/nonexistent/picks.json")), tx)
        .join()
        .expect("loader thread");

    let mut state = AppState::new("2024-01-05");
    for delta in rx.try_iter() {
        apply_delta(&mut state, delta);
    }
    assert!(state.error_banner().is_some());
    assert!(state.view.is_none());
}

#[test]
fn url_fetch_sends_no_cache_headers() {
    let raw = fs::read_to_string(fixture_path()).expect("fixture file should be readable");
    let body: &'static str = Box::leak(raw.into_boxed_str());
    let (url, requests) = serve_once("HTTP/1.1 200 OK", body);

    let snapshot = load_snapshot(&PicksSource::parse(&url)).expect("snapshot over http");
    assert_eq!(snapshot.dates, vec!["2024-01-02", "2024-01-05"]);

    let head = requests
        .recv_timeout(Duration::from_secs(5))
        .expect("request captured")
        .to_ascii_lowercase();
    assert!(head.starts_with("get /data/picks.json "));
    assert!(head.contains("cache-control: no-cache"));
    assert!(head.contains("pragma: no-cache"));
}

#[test]
fn refused_connection_keeps_underlying_cause() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
        listener.local_addr().expect("local addr")
    };
    let source = PicksSource::parse(&format!("http://{addr}/data/picks.json"));

    let err = load_snapshot(&source).unwrap_err();
    assert!(matches!(err, LoadError::Transport(_)));
    let banner = err.user_message(&source).to_ascii_lowercase();
    assert!(banner.contains("error sending request"));
    assert!(banner.contains("connect"), "banner lacks cause: {banner}");
}
