use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::{grid, EventStore, WeekStart};
use crate::theme;

const CELL_W: usize = 6;

pub struct MonthView;

impl MonthView {
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        cells: &[Option<NaiveDate>],
        selected_date: NaiveDate,
        today: NaiveDate,
        week_start: WeekStart,
        store: &EventStore,
        search: &str,
    ) {
        let theme = theme::current();

        let title = format!(
            " {} {} ",
            grid::month_name(selected_date.month()),
            selected_date.year()
        );
        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Line::from(
            week_start
                .day_names()
                .iter()
                .map(|d| Span::styled(format!("{:^width$}", d, width = CELL_W), theme.header))
                .collect::<Vec<_>>(),
        );

        let weeks: Vec<Line> = cells
            .chunks(7)
            .map(|week| {
                let spans = week
                    .iter()
                    .flat_map(|cell| match cell {
                        None => vec![Span::raw(" ".repeat(CELL_W))],
                        Some(date) => day_cell(*date, selected_date, today, store, search),
                    })
                    .collect::<Vec<_>>();
                Line::from(spans)
            })
            .collect();

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(weeks.iter().map(|_| Constraint::Length(1)));
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(header), rows[0]);
        for (i, week) in weeks.into_iter().enumerate() {
            frame.render_widget(Paragraph::new(week), rows[i + 1]);
        }
    }
}

/// " 12" in the day style, then a dot coloured by the first matching event's category.
fn day_cell(
    date: NaiveDate,
    selected: NaiveDate,
    today: NaiveDate,
    store: &EventStore,
    search: &str,
) -> Vec<Span<'static>> {
    let theme = theme::current();

    let style = if date == today && date == selected {
        theme.today_selected()
    } else if date == selected {
        theme.selected
    } else if date == today {
        theme.today
    } else {
        Style::default()
    };

    let mut events = store.events_for_day(date, search);
    let marker = match events.next() {
        Some(first) => {
            let more = events.next().is_some();
            Span::styled(
                if more { "\u{2022}+" } else { "\u{2022} " },
                Style::default().fg(theme.category(first.category)),
            )
        }
        None => Span::raw("  "),
    };

    vec![
        Span::raw(" "),
        Span::styled(format!("{:>2}", date.day()), style),
        marker,
        Span::raw(" "),
    ]
}
