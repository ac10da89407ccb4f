use std::collections::VecDeque;

use crate::config::is_iso_date;
use crate::date_resolver::{resolve_date, step_date};
use crate::render::{DateView, render_date};
use crate::snapshot::{Snapshot, SnapshotNotes};
use crate::store::DataStore;

const MAX_LOGS: usize = 200;
const DATE_INPUT_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Error(String),
}

/// Messages from the loader thread.
#[derive(Debug)]
pub enum Delta {
    Loaded(Snapshot),
    LoadFailed(String),
    Log(String),
}

pub struct AppState {
    pub phase: LoadPhase,
    pub store: DataStore,
    /// Date asked for at startup, resolved once the snapshot arrives.
    pub initial_request: String,
    pub date_input: String,
    /// Input still holds the shown date; the next keypress starts a new one.
    pub input_pristine: bool,
    pub date_bounds: Option<(String, String)>,
    pub view: Option<DateView>,
    pub selected: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub notes_overlay: bool,
}

impl AppState {
    pub fn new(initial_request: impl Into<String>) -> Self {
        let initial_request = initial_request.into();
        Self {
            phase: LoadPhase::Loading,
            store: DataStore::new(),
            date_input: initial_request.clone(),
            input_pristine: true,
            initial_request,
            date_bounds: None,
            view: None,
            selected: 0,
            logs: VecDeque::new(),
            help_overlay: false,
            notes_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn is_ready(&self) -> bool {
        self.phase == LoadPhase::Ready
    }

    pub fn error_banner(&self) -> Option<&str> {
        match &self.phase {
            LoadPhase::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn status_line(&self) -> String {
        match &self.phase {
            LoadPhase::Loading => "Loading picks…".to_string(),
            LoadPhase::Error(_) => "Load failed".to_string(),
            LoadPhase::Ready => {
                let generated = self.store.generated_label().unwrap_or("unknown");
                match &self.date_bounds {
                    Some((min, max)) => format!("Generated: {generated} | Dates: {min} .. {max}"),
                    None => format!("Generated: {generated} | Dates: none"),
                }
            }
        }
    }

    pub fn displayed_date(&self) -> Option<&str> {
        self.view.as_ref().map(|v| v.date.as_str())
    }

    pub fn notes(&self) -> Option<&SnapshotNotes> {
        self.store.snapshot()?.notes.as_ref()
    }

    fn on_loaded(&mut self, snapshot: Snapshot) {
        let days = snapshot.dates.len();
        let picks = snapshot.pick_count();
        self.store.replace(snapshot);
        self.phase = LoadPhase::Ready;
        self.date_bounds = self
            .store
            .bounds()
            .map(|(min, max)| (min.to_string(), max.to_string()));
        self.push_log(format!("[INFO] Loaded {days} dates, {picks} picks"));

        let requested = self.initial_request.clone();
        let initial = resolve_date(&requested, &self.store);
        if initial != requested {
            self.push_log(format!("[INFO] No picks dated {requested}; showing {initial}"));
        }
        self.show_date(&initial);
    }

    fn on_load_failed(&mut self, msg: String) {
        self.store.clear();
        self.view = None;
        self.selected = 0;
        self.date_bounds = None;
        self.push_log(format!("[WARN] {msg}"));
        self.phase = LoadPhase::Error(msg);
    }

    /// Resolves `desired` and re-renders. Returns the date actually shown.
    pub fn request_date(&mut self, desired: &str) -> Option<String> {
        if !self.is_ready() {
            return None;
        }
        let resolved = resolve_date(desired, &self.store);
        self.show_date(&resolved);
        Some(resolved)
    }

    pub fn submit_date_input(&mut self) {
        let desired = self.date_input.trim().to_string();
        if desired.is_empty() {
            return;
        }
        if !is_iso_date(&desired) {
            self.push_log(format!("[WARN] Ignoring date input {desired:?} (want YYYY-MM-DD)"));
            return;
        }
        self.request_date(&desired);
    }

    pub fn input_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || c == '-') {
            return;
        }
        if self.input_pristine {
            self.date_input.clear();
            self.input_pristine = false;
        }
        if self.date_input.len() >= DATE_INPUT_LEN {
            return;
        }
        self.date_input.push(c);
        self.on_input_changed();
    }

    pub fn input_backspace(&mut self) {
        self.input_pristine = false;
        self.date_input.pop();
    }

    pub fn clear_input(&mut self) {
        self.input_pristine = false;
        self.date_input.clear();
    }

    pub fn step(&mut self, offset: isize) {
        if !self.is_ready() {
            return;
        }
        let current = self
            .displayed_date()
            .map(str::to_string)
            .unwrap_or_else(|| self.date_input.clone());
        let next = step_date(&current, offset, &self.store);
        self.request_date(&next);
    }

    pub fn select_next(&mut self) {
        let total = self.view.as_ref().map(|v| v.picks.len()).unwrap_or(0);
        if total > 0 {
            self.selected = (self.selected + 1).min(total - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    // A completed, well-formed date counts as a change; partial typing does not.
    fn on_input_changed(&mut self) {
        if self.date_input.len() == DATE_INPUT_LEN && is_iso_date(&self.date_input) {
            let desired = self.date_input.clone();
            self.request_date(&desired);
        }
    }

    fn show_date(&mut self, date: &str) {
        // Drop the previous picks before the new set goes in.
        self.view = None;
        self.selected = 0;
        let view = render_date(&self.store, date);
        if view.empty {
            self.push_log(format!("[INFO] No picks for {date}"));
        }
        self.date_input = date.to_string();
        self.input_pristine = true;
        self.view = Some(view);
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Loaded(snapshot) => state.on_loaded(snapshot),
        Delta::LoadFailed(msg) => state.on_load_failed(msg),
        Delta::Log(msg) => state.push_log(msg),
    }
}
