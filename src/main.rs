mod app;
mod calendar;
mod components;
mod config;
mod logging;
mod theme;
mod tui;

use std::time::Duration;

use app::{App, InputMode};
use calendar::{remote, Storage, ViewMode};
use chrono::Local;
use color_eyre::Result;
use config::Config;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use tracing::info;

use components::event_form::FormField;

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::load()?;
    let data_dir = config.data_dir();
    let log_path = logging::init(&data_dir, config.log_level())?;
    theme::init(&config.theme);
    info!(data_dir = %data_dir.display(), log = %log_path.display(), "starting calgrid");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;

    let mut app = App::new(Storage::new(&data_dir), config.export_dir(), config.week_start)?;
    if let Some(source) = config.default_events_source() {
        app.watch_default_events(remote::spawn_fetch(&runtime, source.to_string()));
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    info!("calgrid exited");
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.set_today(Local::now().date_naive());
        app.poll_default_events();
        terminal.draw(|frame| render(frame, app))?;

        if let Some(key) = tui::next_key_press(Duration::from_millis(100))? {
            // Clear status message on any key
            app.status_message = None;

            if app.show_help {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                    app.show_help = false;
                }
                continue;
            }

            match app.input_mode() {
                InputMode::Form => handle_form_input(app, key.code),
                InputMode::ConfirmDelete => {
                    app.confirm_delete(matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')));
                }
                InputMode::Search => handle_search_input(app, key.code),
                InputMode::Grab => handle_grab_input(app, key.code),
                InputMode::Normal => handle_normal_input(app, key.code, key.modifiers),
            }
        }
    }

    Ok(())
}

/// Day and page movement shared by normal and grab mode.
fn handle_navigation(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Left | KeyCode::Char('h') => app.prev_day(),
        KeyCode::Right | KeyCode::Char('l') => app.next_day(),
        KeyCode::Up | KeyCode::Char('k') => app.prev_week(),
        KeyCode::Down | KeyCode::Char('j') => app.next_week(),
        KeyCode::Char('[') | KeyCode::Char('<') => app.prev_page(),
        KeyCode::Char(']') | KeyCode::Char('>') => app.next_page(),
        KeyCode::Char('t') => app.go_to_today(),
        KeyCode::Char('v') => app.toggle_view(),
        KeyCode::Char('1') => app.view_mode = ViewMode::Month,
        KeyCode::Char('2') => app.view_mode = ViewMode::Week,
        _ => return false,
    }
    true
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if handle_navigation(app, code) {
        return;
    }
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Tab, _) | (KeyCode::Char('J'), _) => app.cursor_down(),
        (KeyCode::BackTab, _) | (KeyCode::Char('K'), _) => app.cursor_up(),
        (KeyCode::Char('n'), _) => app.open_add_form(),
        (KeyCode::Enter, _) | (KeyCode::Char('e'), _) => app.open_edit_form(),
        (KeyCode::Char('d'), _) => app.request_delete(),
        (KeyCode::Char('m'), _) => app.grab_selected(),
        (KeyCode::Char('/'), _) => app.start_search(),
        (KeyCode::Esc, _) => app.clear_search(),
        (KeyCode::Char('x'), _) => app.export_csv(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn handle_grab_input(app: &mut App, code: KeyCode) {
    if handle_navigation(app, code) {
        return;
    }
    match code {
        KeyCode::Char('m') | KeyCode::Enter => app.drop_grabbed(),
        KeyCode::Esc => app.cancel_grab(),
        _ => {}
    }
}

fn handle_search_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.clear_search(),
        KeyCode::Enter => app.finish_search(),
        KeyCode::Backspace => app.search_backspace(),
        KeyCode::Char(c) => app.search_input(c),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    let on_category = app
        .form_state
        .as_ref()
        .is_some_and(|f| f.active_field == FormField::Category);

    match code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => app.form_tab(),
        KeyCode::BackTab | KeyCode::Up => app.form_backtab(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Left | KeyCode::Right if on_category => {
            if let Some(ref mut form) = app.form_state {
                if code == KeyCode::Left {
                    form.prev_category();
                } else {
                    form.next_category();
                }
            }
        }
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    // Main layout: content + status bar
    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    let content = layout[0];

    match app.view_mode {
        ViewMode::Month => render_month_layout(frame, content, app),
        ViewMode::Week => {
            let rows = Layout::vertical([Constraint::Min(6), Constraint::Length(8)]).split(content);
            components::WeekView::render(
                frame,
                rows[0],
                &app.grid(),
                app.selected_date,
                app.today,
                &app.store,
                &app.search,
                app.grabbed,
            );
            render_day_list(frame, rows[1], app);
        }
    }

    if let Some(ref form) = app.form_state {
        components::EventForm::render(frame, area, form);
    }

    if let Some(ev) = app.pending_delete.and_then(|id| app.store.get(id)) {
        components::ConfirmDelete::render(frame, area, ev);
    }

    if app.show_help {
        render_help(frame, area);
    }

    components::StatusBar::render(frame, layout[1], app);
}

fn render_month_layout(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    // 7 cells of 6 columns plus borders
    const MONTH_W: u16 = 44;

    let (grid_area, list_area) = if area.width >= 60 {
        let cols = Layout::horizontal([Constraint::Length(MONTH_W), Constraint::Min(16)]).split(area);
        (cols[0], cols[1])
    } else {
        let rows = Layout::vertical([Constraint::Length(9), Constraint::Min(3)]).split(area);
        (rows[0], rows[1])
    };

    components::MonthView::render(
        frame,
        grid_area,
        &app.grid(),
        app.selected_date,
        app.today,
        app.week_start,
        &app.store,
        &app.search,
    );
    render_day_list(frame, list_area, app);
}

fn render_day_list(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    components::DayView::render(
        frame,
        area,
        app.selected_date,
        &app.day_events(),
        |id| app.store.is_default(id),
        app.day_cursor,
        app.grabbed,
        &app.search,
    );
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let theme = theme::current();
    let dim = theme.dim;
    let popup_w = area.width.clamp(30, 54).min(area.width);
    let popup_h = area.height.clamp(12, 26).min(area.height);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" Keybindings ({}) ", theme.name))
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |key: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", key), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        entry("h/l", "Previous/next day"),
        entry("j/k", "Next/previous week"),
        entry("[/]", "Previous/next month (or week)"),
        entry("t", "Jump to today"),
        entry("v", "Toggle month / week view"),
        Line::from(""),
        Line::from(Span::styled("Events", section_style)),
        entry("Tab/S-Tab", "Select event in day list"),
        entry("n", "Add event"),
        entry("Enter", "Edit selected event"),
        entry("d", "Delete selected event"),
        entry("m", "Move: pick up, then drop on a day"),
        entry("/", "Search titles and dates"),
        entry("x", "Export events to CSV"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  q", key_style),
            Span::styled(" / ", dim),
            Span::styled("Esc       ", key_style),
            Span::raw("Quit / close popup"),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
