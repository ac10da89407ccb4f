use crate::snapshot::Pick;
use crate::store::DataStore;

pub const UNKNOWN_PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, PartialEq)]
pub struct WhyRow {
    pub label: &'static str,
    pub value: String,
    pub total: bool,
}

/// Display fragment for one pick.
#[derive(Debug, Clone, PartialEq)]
pub struct PickView {
    pub game_label: Option<String>,
    pub matchup: String,
    pub prob: String,
    pub winner: String,
    pub home_elo: String,
    pub away_elo: String,
    pub home_adv: String,
    pub meta: String,
    pub factors: String,
    pub why: Vec<WhyRow>,
    pub note: String,
}

/// Everything shown for one resolved date.
#[derive(Debug, Clone, PartialEq)]
pub struct DateView {
    pub date: String,
    pub title: String,
    pub build_note: Option<String>,
    pub picks: Vec<PickView>,
    pub empty: bool,
}

pub fn render_pick(pick: &Pick) -> PickView {
    let home_elo = format_rating(pick.home_elo);
    let away_elo = format_rating(pick.away_elo);
    let home_adv = format_home_adv(pick.home_adv);
    let meta = format!("Elo: {home_elo} / {away_elo} · HomeAdv: {home_adv}");

    let why = vec![
        WhyRow {
            label: "Base (no home ice)",
            value: format_percent(pick.why.base),
            total: false,
        },
        WhyRow {
            label: "Home ice",
            value: format_pp(pick.why.home_ice_pp),
            total: false,
        },
        WhyRow {
            label: "Recent form (L10)",
            value: format_pp(pick.why.form_pp),
            total: false,
        },
        WhyRow {
            label: "Back-to-back fatigue",
            value: format_pp(pick.why.fatigue_pp),
            total: false,
        },
        WhyRow {
            label: "Final",
            value: format_percent(pick.why.final_prob),
            total: true,
        },
    ];

    PickView {
        game_label: pick.game_pk.map(|id| format!("Game {id}")),
        matchup: format!("{} @ {}", pick.away_name, pick.home_name),
        prob: format_percent(pick.win_prob),
        winner: pick.pick_name.clone(),
        home_elo,
        away_elo,
        home_adv,
        meta,
        factors: pick.factors.clone(),
        why,
        note: format!(
            "Home/Away form: {} / {} pts · Fatigue: {} / {} pts",
            pick.form_home, pick.form_away, pick.fat_home, pick.fat_away
        ),
    }
}

pub fn render_date(store: &DataStore, date: &str) -> DateView {
    let block = store.block(date);
    let picks: Vec<PickView> = block
        .map(|b| b.picks.iter().map(render_pick).collect())
        .unwrap_or_default();
    let build_note = block
        .and_then(|b| b.build_note.as_deref())
        .filter(|note| !note.trim().is_empty())
        .map(str::to_string);

    DateView {
        date: date.to_string(),
        title: format!("Picks for {date}"),
        build_note,
        empty: picks.is_empty(),
        picks,
    }
}

/// Probability in [0, 1] as a one-decimal percentage, e.g. `62.3%`.
pub fn format_percent(prob: f64) -> String {
    match scaled_round(prob, 3, Tie::Down) {
        Some(tenths) => format!("{}%", tenths_text(tenths)),
        None => UNKNOWN_PLACEHOLDER.to_string(),
    }
}

/// Signed percentage points, e.g. `+1.2 pp` / `-1.3 pp`.
pub fn format_pp(pp: f64) -> String {
    match scaled_round(pp, 1, Tie::Down) {
        Some(tenths) if tenths < 0 => format!("{} pp", tenths_text(tenths)),
        Some(tenths) => format!("+{} pp", tenths_text(tenths)),
        None => UNKNOWN_PLACEHOLDER.to_string(),
    }
}

pub fn format_rating(rating: f64) -> String {
    match scaled_round(rating, 0, Tie::AwayFromZero) {
        Some(value) => value.to_string(),
        None => UNKNOWN_PLACEHOLDER.to_string(),
    }
}

/// Zero counts as unknown: upstream writes 0 when no home model exists.
pub fn format_home_adv(adv: Option<f64>) -> String {
    match adv {
        Some(value) if value != 0.0 => format_rating(value),
        _ => UNKNOWN_PLACEHOLDER.to_string(),
    }
}

/// Plain-text rendering of a date view, one block per pick.
pub fn date_view_text(view: &DateView) -> String {
    let mut out = format!("{}\n", view.title);
    if let Some(note) = &view.build_note {
        out.push_str(&format!("[{note}]\n"));
    }
    if view.empty {
        out.push_str("No picks for this date.\n");
        return out;
    }
    for (idx, pick) in view.picks.iter().enumerate() {
        out.push('\n');
        out.push_str(&format!("{}. {}  {}\n", idx + 1, pick.matchup, pick.prob));
        out.push_str(&format!("   Pick: {}\n", pick.winner));
        out.push_str(&format!("   {}\n", pick.meta));
        out.push_str(&format!("   {}\n", pick.factors));
        for row in &pick.why {
            out.push_str(&format!("     {:<22} {:>9}\n", row.label, row.value));
        }
        out.push_str(&format!("   {}\n", pick.note));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tie {
    /// Exact halves go toward negative infinity: 62.35 -> 62.3, -1.25 -> -1.3.
    Down,
    AwayFromZero,
}

fn tenths_text(tenths: i64) -> String {
    let sign = if tenths < 0 { "-" } else { "" };
    let abs = tenths.unsigned_abs();
    format!("{sign}{}.{}", abs / 10, abs % 10)
}

/// Rounds `value * 10^places` to an integer on the shortest decimal form of
/// the float (what the JSON said), so `0.6235` is a tie rather than the
/// binary expansion just above it.
fn scaled_round(value: f64, places: usize, tie: Tie) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let negative = value < 0.0;
    let shortest = format!("{}", value.abs());
    let (int_part, frac) = shortest.split_once('.').unwrap_or((shortest.as_str(), ""));
    let frac = frac.as_bytes();
    let kept: String = (0..places)
        .map(|i| frac.get(i).map(|d| *d as char).unwrap_or('0'))
        .collect();
    let rest = frac.get(places..).unwrap_or(&[]);

    let mut magnitude: i64 = format!("{int_part}{kept}").parse().ok()?;
    let round_up = match rest.split_first() {
        Some((&first, tail)) if first == b'5' => {
            let exact_half = tail.iter().all(|d| *d == b'0');
            !exact_half
                || match tie {
                    Tie::Down => negative,
                    Tie::AwayFromZero => true,
                }
        }
        Some((&first, _)) => first > b'5',
        None => false,
    };
    if round_up {
        magnitude = magnitude.checked_add(1)?;
    }
    if negative { Some(-magnitude) } else { Some(magnitude) }
}
