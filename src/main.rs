use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use picks_terminal::config::AppConfig;
use picks_terminal::loader::spawn_loader;
use picks_terminal::render::{PickView, UNKNOWN_PLACEHOLDER};
use picks_terminal::state::{self, AppState, LoadPhase, apply_delta};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(config: &AppConfig) -> Self {
        Self {
            state: AppState::new(config.initial_request()),
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay || self.state.notes_overlay {
            match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('?') | KeyCode::Char('n') | KeyCode::Esc => {
                    self.state.help_overlay = false;
                    self.state.notes_overlay = false;
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => self.state.input_char(c),
            KeyCode::Backspace => self.state.input_backspace(),
            KeyCode::Delete => self.state.clear_input(),
            KeyCode::Enter => self.state.submit_date_input(),
            KeyCode::Char('h') | KeyCode::Left => self.state.step(-1),
            KeyCode::Char('l') | KeyCode::Right => self.state.step(1),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('n') => {
                if self.state.notes().is_some() {
                    self.state.notes_overlay = true;
                } else {
                    self.state.push_log("[INFO] Snapshot has no model notes");
                }
            }
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let config = AppConfig::from_env();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    spawn_loader(config.source.clone(), tx);

    let mut app = App::new(&config);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_date_bar(frame, chunks[1], &app.state);

    match &app.state.phase {
        LoadPhase::Loading => {
            let loading = Paragraph::new("Loading picks…").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(loading, chunks[2]);
        }
        LoadPhase::Error(msg) => render_error_banner(frame, chunks[2], msg),
        LoadPhase::Ready => render_picks(frame, chunks[2], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[3]);

    let footer = Paragraph::new(footer_text())
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[4]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    } else if app.state.notes_overlay {
        render_notes_overlay(frame, frame.size(), &app.state);
    }
}

fn header_text(state: &AppState) -> String {
    let title = match &state.view {
        Some(view) => view.title.clone(),
        None => "Picks".to_string(),
    };
    let line1 = format!("  PICKS | {title}");
    let line2 = format!("  {}", state.status_line());
    format!("{line1}\n{line2}")
}

fn render_date_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let range = match &state.date_bounds {
        Some((min, max)) => format!("  range {min} .. {max}"),
        None => String::new(),
    };
    let mut spans = vec![
        Span::styled(" Date: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            format!("[{:<10}]", state.date_input),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(range, Style::default().fg(Color::DarkGray)),
    ];
    if let Some(note) = state.view.as_ref().and_then(|v| v.build_note.as_deref()) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(" {note} "),
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_error_banner(frame: &mut Frame, area: Rect, msg: &str) {
    let banner = Paragraph::new(msg.to_string())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Error").borders(Borders::ALL));
    frame.render_widget(banner, area);
}

fn render_picks(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(view) = &state.view else {
        return;
    };
    if view.empty {
        let empty = Paragraph::new("No picks for this date.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_pick_list(frame, columns[0], &view.picks, state.selected);

    let detail = match view.picks.get(state.selected) {
        Some(pick) => why_text(pick),
        None => "No pick selected".to_string(),
    };
    let why = Paragraph::new(detail)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Why this pick").borders(Borders::ALL));
    frame.render_widget(why, columns[1]);
}

fn render_pick_list(frame: &mut Frame, area: Rect, picks: &[PickView], selected: usize) {
    let block = Block::default().title("Picks").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    const ROW_HEIGHT: u16 = 4;
    if inner.height < ROW_HEIGHT {
        let small = Paragraph::new("Pick list needs more height")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(small, inner);
        return;
    }

    let visible = (inner.height / ROW_HEIGHT) as usize;
    let (start, end) = visible_range(selected, picks.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: inner.x,
            y: inner.y + (i as u16) * ROW_HEIGHT,
            width: inner.width,
            height: ROW_HEIGHT,
        };
        let is_selected = idx == selected;
        let row_style = if is_selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };

        let pick = &picks[idx];
        let mut top = vec![
            Span::styled(pick.matchup.clone(), row_style.add_modifier(Modifier::BOLD)),
            Span::styled("  ", row_style),
            Span::styled(pick.prob.clone(), row_style.fg(Color::Green)),
        ];
        if let Some(game) = &pick.game_label {
            top.push(Span::styled(format!("  {game}"), row_style.fg(Color::DarkGray)));
        }
        let lines = vec![
            Line::from(top),
            Line::from(vec![
                Span::styled("Pick: ", row_style),
                Span::styled(pick.winner.clone(), row_style.add_modifier(Modifier::BOLD)),
            ]),
            Line::styled(pick.meta.clone(), row_style),
            Line::styled(pick.factors.clone(), row_style.fg(Color::DarkGray)),
        ];
        let row = Paragraph::new(lines).style(row_style);
        frame.render_widget(row, row_area);
    }
}

fn why_text(pick: &PickView) -> String {
    let mut lines = vec![
        pick.matchup.clone(),
        format!("Pick: {} ({})", pick.winner, pick.prob),
        String::new(),
    ];
    for row in &pick.why {
        let marker = if row.total { "=" } else { " " };
        lines.push(format!("{marker} {:<22} {:>9}", row.label, row.value));
    }
    lines.push(String::new());
    lines.push(pick.note.clone());
    lines.join("\n")
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn footer_text() -> String {
    "0-9/- Type date | Enter Go | ←/→ Prev/Next day | j/k Move | n Notes | ? Help | q Quit"
        .to_string()
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Picks Terminal - Help",
        "",
        "Date:",
        "  0-9 / -      Type a date (YYYY-MM-DD), replacing the shown one",
        "  Backspace    Edit the shown date",
        "  Delete       Clear the input",
        "  Enter        Show the typed date",
        "  h/l or ←/→   Previous / next available date",
        "",
        "Picks:",
        "  j/k or ↑/↓   Move selection",
        "  n            Model notes",
        "  ?            Toggle help",
        "  q / Esc      Quit",
        "",
        "Dates without picks fall back to the earliest available date.",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn render_notes_overlay(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(notes) = state.notes() else {
        return;
    };
    let popup_area = centered_rect(70, 50, area);
    frame.render_widget(Clear, popup_area);

    let opt_num = |v: Option<f64>| {
        v.map(|n| n.to_string())
            .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string())
    };
    let bounds = notes
        .home_adv_bounds
        .map(|(lo, hi)| format!("{lo} .. {hi}"))
        .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string());
    let text = [
        format!("Probability shrink: {}", opt_num(notes.prob_shrink)),
        format!(
            "Max rebuild days: {}",
            notes
                .max_rebuild_days
                .map(|d| d.to_string())
                .unwrap_or_else(|| UNKNOWN_PLACEHOLDER.to_string())
        ),
        format!("Home advantage bounds: {bounds}"),
        String::new(),
        format!("Form: {}", notes.form.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER)),
        format!(
            "Home advantage: {}",
            notes.home_adv.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER)
        ),
    ]
    .join("\n");

    let panel = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Model notes").borders(Borders::ALL));
    frame.render_widget(panel, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
