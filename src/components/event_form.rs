use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use uuid::Uuid;

use crate::calendar::{Event, EventDraft};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Adding,
    Editing(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Date,
    Start,
    End,
    Category,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Date,
            FormField::Date => FormField::Start,
            FormField::Start => FormField::End,
            FormField::End => FormField::Category,
            FormField::Category => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Category,
            FormField::Date => FormField::Title,
            FormField::Start => FormField::Date,
            FormField::End => FormField::Start,
            FormField::Category => FormField::End,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventFormState {
    pub mode: FormMode,
    pub draft: EventDraft,
    pub active_field: FormField,
    pub error: Option<String>,
}

impl EventFormState {
    /// Blank form with the date pre-filled.
    pub fn adding(date: NaiveDate) -> Self {
        Self {
            mode: FormMode::Adding,
            draft: EventDraft::for_date(date),
            active_field: FormField::Title,
            error: None,
        }
    }

    pub fn editing(event: &Event) -> Self {
        Self {
            mode: FormMode::Editing(event.id),
            draft: EventDraft::from(event),
            active_field: FormField::Title,
            error: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Editing(_))
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::Title => self.draft.title.push(c),
            FormField::Date => self.draft.date.push(c),
            FormField::Start => self.draft.start.push(c),
            FormField::End => self.draft.end.push(c),
            FormField::Category => {
                if c == ' ' {
                    self.draft.category = self.draft.category.next();
                }
            }
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FormField::Title => {
                self.draft.title.pop();
            }
            FormField::Date => {
                self.draft.date.pop();
            }
            FormField::Start => {
                self.draft.start.pop();
            }
            FormField::End => {
                self.draft.end.pop();
            }
            FormField::Category => {}
        }
    }

    pub fn next_field(&mut self) {
        self.active_field = self.active_field.next();
    }

    pub fn prev_field(&mut self) {
        self.active_field = self.active_field.prev();
    }

    pub fn next_category(&mut self) {
        self.draft.category = self.draft.category.next();
    }

    pub fn prev_category(&mut self) {
        self.draft.category = self.draft.category.prev();
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState) {
        let theme = theme::current();

        let form_w = area.width.clamp(30, 50).min(area.width);
        let form_h = area.height.clamp(10, 12).min(area.height);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w, form_h);

        frame.render_widget(Clear, form_area);

        let title = if state.is_editing() { " Edit Event " } else { " Add Event " };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // date
            Constraint::Length(1), // start
            Constraint::Length(1), // end
            Constraint::Length(1), // category
            Constraint::Length(1), // spacer
            Constraint::Length(2), // error
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let draft = &state.draft;
        let active = state.active_field;
        render_field(frame, rows[0], "Title:", &draft.title, active == FormField::Title);
        render_field(frame, rows[1], "Date:", &draft.date, active == FormField::Date);
        render_field(frame, rows[2], "Start:", &draft.start, active == FormField::Start);
        render_field(frame, rows[3], "End:", &draft.end, active == FormField::End);

        let cat_active = active == FormField::Category;
        let cat_line = Line::from(vec![
            Span::styled(format!("{:<7}", "Cat:"), theme.dim),
            Span::styled("\u{25a0} ", Style::default().fg(theme.category(draft.category))),
            Span::styled(
                format!("< {} >", draft.category),
                if cat_active { Style::default().fg(Color::Cyan) } else { Style::default() },
            ),
        ]);
        frame.render_widget(Paragraph::new(cat_line), rows[4]);

        if let Some(ref err) = state.error {
            let msg = Paragraph::new(Span::styled(
                err.as_str(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .wrap(Wrap { trim: true });
            frame.render_widget(msg, rows[6]);
        }

        let submit = if state.is_editing() { ":Update " } else { ":Add " };
        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme.dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(submit, theme.dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme.dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[7]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };
    let style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let spans = vec![
        Span::styled(format!("{:<7}", label), theme::current().dim),
        Span::styled(format!("{}{}", value, cursor), style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::Category;

    #[test]
    fn adding_prefills_only_the_date() {
        let form = EventFormState::adding(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
        assert_eq!(form.mode, FormMode::Adding);
        assert_eq!(form.draft.date, "2025-07-04");
        assert!(form.draft.title.is_empty());
        assert!(form.draft.start.is_empty());
        assert!(form.draft.end.is_empty());
        assert_eq!(form.draft.category, Category::Default);
    }

    #[test]
    fn typing_goes_to_the_active_field() {
        let mut form = EventFormState::adding(NaiveDate::from_ymd_opt(2025, 7, 4).unwrap());
        "BBQ".chars().for_each(|c| form.input_char(c));
        form.next_field();
        form.backspace();
        form.next_field();
        "18:00".chars().for_each(|c| form.input_char(c));
        form.prev_field();
        form.prev_field();
        form.prev_field();
        form.input_char(' ');
        form.next_category();

        assert_eq!(form.draft.title, "BBQ");
        assert_eq!(form.draft.date, "2025-07-0");
        assert_eq!(form.draft.start, "18:00");
        assert_eq!(form.active_field, FormField::Category);
        assert_eq!(form.draft.category, Category::Personal);
    }
}
