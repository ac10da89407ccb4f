use anyhow::{Context, anyhow};

use picks_terminal::config::{AppConfig, is_iso_date};
use picks_terminal::date_resolver::resolve_date;
use picks_terminal::picks_fetch::load_snapshot;
use picks_terminal::render::{date_view_text, render_date};
use picks_terminal::store::DataStore;

// Prints one date's picks as plain text. Usage: picks_print [YYYY-MM-DD]
fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = AppConfig::from_env();

    let requested = match std::env::args().nth(1) {
        Some(arg) if is_iso_date(arg.trim()) => arg.trim().to_string(),
        Some(arg) => return Err(anyhow!("expected a YYYY-MM-DD date, got {arg:?}")),
        None => config.initial_request(),
    };

    let snapshot = load_snapshot(&config.source)
        .map_err(|err| anyhow!(err.user_message(&config.source)))
        .context("picks load failed")?;
    let generated = snapshot.generated_label().to_string();
    let store = DataStore::with_snapshot(snapshot);

    let date = resolve_date(&requested, &store);
    println!("Generated: {generated}");
    if date != requested {
        println!("(no picks dated {requested}; showing {date})");
    }
    print!("{}", date_view_text(&render_date(&store, &date)));
    Ok(())
}
