use std::env;

use chrono::{Local, NaiveDate};

use crate::picks_fetch::PicksSource;

pub const DEFAULT_PICKS_SOURCE: &str = "./data/picks.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: PicksSource,
    pub requested_date: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let source = env::var("PICKS_SOURCE")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PICKS_SOURCE.to_string());
        Self {
            source: PicksSource::parse(&source),
            requested_date: opt_date_env("PICKS_DATE"),
        }
    }

    /// Date asked for at startup: the override when set, else today.
    pub fn initial_request(&self) -> String {
        self.requested_date.clone().unwrap_or_else(today_iso)
    }
}

pub fn request_timeout_secs() -> u64 {
    env::var("PICKS_TIMEOUT_SECS")
        .ok()
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .max(1)
}

pub fn today_iso() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn is_iso_date(raw: &str) -> bool {
    raw.len() == 10 && NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}

fn opt_date_env(key: &str) -> Option<String> {
    let val = env::var(key).ok()?;
    let trimmed = val.trim();
    is_iso_date(trimmed).then(|| trimmed.to_string())
}
