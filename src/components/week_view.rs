use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use uuid::Uuid;

use crate::calendar::{event::TIME_FORMAT, EventStore};
use crate::theme;

pub struct WeekView;

impl WeekView {
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        days: &[Option<NaiveDate>],
        selected_date: NaiveDate,
        today: NaiveDate,
        store: &EventStore,
        search: &str,
        grabbed: Option<Uuid>,
    ) {
        let theme = theme::current();
        let week_start = days.iter().flatten().next().copied().unwrap_or(selected_date);

        let block = Block::default()
            .title(format!(" Week of {} ", week_start.format("%b %-d, %Y")))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 14 || inner.height < 2 {
            return;
        }

        let cols = Layout::horizontal(vec![Constraint::Ratio(1, 7); 7]).split(inner);

        for (col, date) in cols.iter().zip(days.iter().flatten()) {
            let col_w = col.width.saturating_sub(1) as usize;

            let label = if col_w >= 10 {
                date.format("%a %d").to_string()
            } else if col_w >= 4 {
                date.format("%a").to_string()
            } else {
                date.format("%d").to_string()
            };
            let header_style = if *date == selected_date && *date == today {
                theme.today_selected()
            } else if *date == selected_date {
                theme.selected
            } else if *date == today {
                theme.today
            } else {
                theme.header
            };

            let mut lines = vec![Line::from(Span::styled(
                format!("{:^width$}", label, width = col_w),
                header_style,
            ))];

            if !store.has_events_on(*date, search) {
                lines.push(Line::from(Span::styled(
                    format!("{:^width$}", "\u{00b7}", width = col_w),
                    theme.dim,
                )));
            }

            for ev in store.events_for_day(*date, search) {
                let color = theme.category(ev.category);
                let mut title_style = Style::default();
                if Some(ev.id) == grabbed {
                    title_style = title_style.add_modifier(Modifier::REVERSED);
                }
                if store.is_default(ev.id) {
                    title_style = title_style.add_modifier(Modifier::ITALIC);
                }

                lines.push(Line::from(vec![
                    Span::styled("\u{258e}", Style::default().fg(color)),
                    Span::styled(ev.start.format(TIME_FORMAT).to_string(), theme.dim),
                ]));
                lines.push(Line::from(vec![
                    Span::styled("\u{258e}", Style::default().fg(color)),
                    Span::styled(truncate(&ev.title, col_w.saturating_sub(1)), title_style),
                ]));
            }

            frame.render_widget(Paragraph::new(lines), *col);
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    let count = s.chars().count();
    if count <= max {
        s.to_string()
    } else if max > 1 {
        let mut out: String = s.chars().take(max - 1).collect();
        out.push('\u{2026}');
        out
    } else {
        s.chars().take(max).collect()
    }
}
