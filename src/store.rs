use crate::snapshot::{DateBlock, Snapshot};

/// Owns the one snapshot fetched for this session.
#[derive(Debug, Default)]
pub struct DataStore {
    snapshot: Option<Snapshot>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }

    /// Swaps in a fully parsed snapshot. There is no partially loaded state.
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn dates(&self) -> &[String] {
        self.snapshot
            .as_ref()
            .map(|s| s.dates.as_slice())
            .unwrap_or(&[])
    }

    pub fn bounds(&self) -> Option<(&str, &str)> {
        let dates = self.dates();
        let first = dates.first()?;
        let last = dates.last()?;
        Some((first.as_str(), last.as_str()))
    }

    pub fn block(&self, date: &str) -> Option<&DateBlock> {
        self.snapshot.as_ref()?.by_date.get(date)
    }

    pub fn generated_label(&self) -> Option<&str> {
        self.snapshot.as_ref().map(Snapshot::generated_label)
    }
}
