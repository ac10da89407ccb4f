use std::sync::mpsc::Sender;
use std::thread;

use crate::picks_fetch::{PicksSource, load_snapshot};
use crate::state::Delta;

/// Runs the session's single fetch off the UI thread.
pub fn spawn_loader(source: PicksSource, tx: Sender<Delta>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = tx.send(Delta::Log(format!("[INFO] Fetching picks from {source}")));
        let delta = match load_snapshot(&source) {
            Ok(snapshot) => Delta::Loaded(snapshot),
            Err(err) => Delta::LoadFailed(err.user_message(&source)),
        };
        // Receiver gone means the UI already quit.
        let _ = tx.send(delta);
    })
}
