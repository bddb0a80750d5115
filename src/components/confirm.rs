use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::calendar::Event;
use crate::theme;

/// y/n prompt shown before an event is deleted.
pub struct ConfirmDelete;

impl ConfirmDelete {
    pub fn render(frame: &mut Frame, area: Rect, event: &Event) {
        let popup_w = area.width.clamp(30, 44).min(area.width);
        let popup_h = area.height.min(7);
        let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
        let popup_area = Rect::new(x, y, popup_w, popup_h);

        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Delete this event? ")
            .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let key = Style::default().add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(Span::styled(event.title.clone(), Style::default().add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(
                format!("{}  {}", event.date_string(), event.time_range()),
                theme::current().dim,
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("y", key),
                Span::styled(":Delete  ", theme::current().dim),
                Span::styled("any key", key),
                Span::styled(":Keep", theme::current().dim),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
    }
}
