use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};
use uuid::Uuid;

use crate::calendar::Event;
use crate::theme;

pub struct DayView;

impl DayView {
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        events: &[&Event],
        is_default: impl Fn(Uuid) -> bool,
        cursor: usize,
        grabbed: Option<Uuid>,
        search: &str,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let n = events.len();
        let mut footer = if n == 0 {
            String::new()
        } else {
            format!(" {} event{} ", n, if n == 1 { "" } else { "s" })
        };
        if !search.is_empty() {
            footer.push_str(&format!(" filter: {search} "));
        }

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(footer, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = if search.is_empty() {
                "No events. Press n to add one."
            } else {
                "No events match the search."
            };
            frame.render_widget(Paragraph::new(msg).style(theme.dim), inner);
            return;
        }

        let items: Vec<ListItem> = events
            .iter()
            .map(|ev| format_event(ev, is_default(ev.id), Some(ev.id) == grabbed))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme.highlight)
            .highlight_symbol("\u{25b8} ");
        let mut state = ListState::default().with_selected(Some(cursor.min(n - 1)));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn format_event(ev: &Event, is_default: bool, grabbed: bool) -> ListItem<'static> {
    let theme = theme::current();
    let color = theme.category(ev.category);

    let mut title_style = Style::default();
    if grabbed {
        title_style = title_style.add_modifier(Modifier::REVERSED);
    }

    let mut spans = vec![
        Span::styled("  ", Style::default().bg(color)),
        Span::styled(
            format!(" {} ", ev.time_range()),
            Style::default().add_modifier(Modifier::DIM),
        ),
        Span::styled(ev.title.clone(), title_style),
        Span::styled(format!(" ({})", ev.category), Style::default().fg(color)),
    ];
    if is_default {
        spans.push(Span::styled(" [read-only]", theme.dim));
    }

    ListItem::new(Line::from(spans))
}
