use crate::store::DataStore;

/// Picks the date to display for `desired`.
///
/// An exact match wins. Anything else falls back to the earliest available
/// date, not the closest one. With no snapshot or no dates the request is
/// echoed back and the view shows an empty state.
pub fn resolve_date(desired: &str, store: &DataStore) -> String {
    if !store.is_loaded() {
        return desired.to_string();
    }
    let dates = store.dates();
    if dates.iter().any(|d| d == desired) {
        return desired.to_string();
    }
    dates
        .first()
        .cloned()
        .unwrap_or_else(|| desired.to_string())
}

/// Moves `offset` entries through the available dates, clamped to the ends.
pub fn step_date(current: &str, offset: isize, store: &DataStore) -> String {
    let dates = store.dates();
    if dates.is_empty() {
        return current.to_string();
    }
    let anchor = resolve_date(current, store);
    let idx = dates.iter().position(|d| *d == anchor).unwrap_or(0);
    let target = idx
        .saturating_add_signed(offset)
        .min(dates.len() - 1);
    dates[target].clone()
}
