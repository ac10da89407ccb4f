use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// Full prediction dataset as published upstream.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub by_date: HashMap<String, DateBlock>,
    #[serde(default)]
    pub notes: Option<SnapshotNotes>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateBlock {
    #[serde(default)]
    pub picks: Vec<Pick>,
    #[serde(default)]
    pub build_note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pick {
    #[serde(rename = "gamePk", default)]
    pub game_pk: Option<u64>,
    pub home_name: String,
    pub away_name: String,
    pub pick_name: String,
    pub win_prob: f64,
    pub home_elo: f64,
    pub away_elo: f64,
    #[serde(default)]
    pub home_adv: Option<f64>,
    pub factors: String,
    pub form_home: Score,
    pub form_away: Score,
    pub fat_home: Score,
    pub fat_away: Score,
    pub why: Why,
}

/// Additive decomposition of the picked side's win probability.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Why {
    pub base: f64,
    pub home_ice_pp: f64,
    pub form_pp: f64,
    pub fatigue_pp: f64,
    #[serde(rename = "final")]
    pub final_prob: f64,
}

// Upstream writes these as pre-signed strings ("+5"); hand-written files use numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Score {
    Number(f64),
    Text(String),
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Number(value) => write!(f, "{value}"),
            Score::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotNotes {
    #[serde(default)]
    pub prob_shrink: Option<f64>,
    #[serde(default)]
    pub max_rebuild_days: Option<u32>,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub home_adv: Option<String>,
    #[serde(default)]
    pub home_adv_bounds: Option<(f64, f64)>,
}

impl Snapshot {
    pub fn generated_label(&self) -> &str {
        self.generated_at
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("unknown")
    }

    pub fn pick_count(&self) -> usize {
        self.by_date.values().map(|block| block.picks.len()).sum()
    }
}

pub fn parse_snapshot_json(raw: &str) -> serde_json::Result<Snapshot> {
    serde_json::from_str(raw.trim_start_matches('\u{feff}'))
}
