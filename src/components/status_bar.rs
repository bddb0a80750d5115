use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, InputMode};
use crate::calendar::ViewMode;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = theme::current();
        let w = area.width as usize;

        let mode_str = match app.view_mode {
            ViewMode::Month => "Month",
            ViewMode::Week => "Week",
        };

        let focus = match app.input_mode() {
            InputMode::Form => " [Form]",
            InputMode::ConfirmDelete => " [Delete?]",
            InputMode::Grab => " [Moving]",
            InputMode::Search | InputMode::Normal => "",
        };
        let loading = if app.loading_defaults() { " \u{21bb}" } else { "" };

        let left = if app.searching {
            format!(" /{}_ ", app.search)
        } else if !app.search.is_empty() {
            format!(" {}{} /{}{} ", mode_str, focus, app.search, loading)
        } else {
            format!(" {}{}{} ", mode_str, focus, loading)
        };

        let right = if let Some(ref msg) = app.status_message {
            format!(" {} ", msg)
        } else {
            hints(app, w).to_string()
        };

        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right.chars().count()));
        let line = Line::from(vec![
            Span::styled(left, theme.status),
            Span::styled(padding, theme.status),
            Span::styled(right, theme.status),
        ]);

        frame.render_widget(Paragraph::new(line).style(theme.status), area);
    }
}

fn hints(app: &App, w: usize) -> &'static str {
    match app.input_mode() {
        InputMode::Search => " Enter:Keep Esc:Clear ",
        InputMode::Grab if w >= 50 => " hjkl:Pick day m/Enter:Drop Esc:Cancel ",
        InputMode::Grab => " m:Drop Esc:Cancel ",
        InputMode::Form | InputMode::ConfirmDelete => "",
        InputMode::Normal if w >= 90 => {
            " hjkl:Nav [/]:Page v:View n:New Enter:Edit d:Del m:Move /:Search x:CSV ?:Help q:Quit "
        }
        InputMode::Normal if w >= 50 => " n:New Enter:Edit d:Del /:Search ?:Help q:Quit ",
        InputMode::Normal => " ?:Help q:Quit ",
    }
}
