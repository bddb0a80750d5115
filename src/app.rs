use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDate};
use color_eyre::Result;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::calendar::remote::DefaultEventsRx;
use crate::calendar::{export, grid, CalendarError, Event, EventStore, Storage, ViewMode, WeekStart};
use crate::components::event_form::{EventFormState, FormMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    ConfirmDelete,
    Grab,
}

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub week_start: WeekStart,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub search: String,
    pub searching: bool,
    pub form_state: Option<EventFormState>,
    pub pending_delete: Option<Uuid>,
    pub grabbed: Option<Uuid>,
    pub day_cursor: usize,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub store: EventStore,
    storage: Storage,
    export_dir: PathBuf,
    pending_defaults: Option<DefaultEventsRx>,
}

impl App {
    pub fn new(storage: Storage, export_dir: PathBuf, week_start: WeekStart) -> Result<Self> {
        let store = EventStore::new(storage.load_or_seed()?);
        let today = Local::now().date_naive();

        Ok(Self {
            running: true,
            view_mode: ViewMode::Month,
            week_start,
            selected_date: today,
            today,
            search: String::new(),
            searching: false,
            form_state: None,
            pending_delete: None,
            grabbed: None,
            day_cursor: 0,
            show_help: false,
            status_message: None,
            store,
            storage,
            export_dir,
            pending_defaults: None,
        })
    }

    pub fn input_mode(&self) -> InputMode {
        if self.form_state.is_some() {
            InputMode::Form
        } else if self.pending_delete.is_some() {
            InputMode::ConfirmDelete
        } else if self.searching {
            InputMode::Search
        } else if self.grabbed.is_some() {
            InputMode::Grab
        } else {
            InputMode::Normal
        }
    }

    // ── default events ──

    pub fn watch_default_events(&mut self, rx: DefaultEventsRx) {
        self.pending_defaults = Some(rx);
    }

    pub fn loading_defaults(&self) -> bool {
        self.pending_defaults.is_some()
    }

    /// Non-blocking check on the startup fetch. Failures were already logged
    /// by the fetch task and leave the default partition empty.
    pub fn poll_default_events(&mut self) {
        let Some(rx) = self.pending_defaults.as_mut() else {
            return;
        };
        match rx.try_recv() {
            Ok(Ok(events)) => {
                self.store.set_defaults(events);
                self.pending_defaults = None;
            }
            Ok(Err(_)) => self.pending_defaults = None,
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                warn!("default event fetch ended without a result");
                self.pending_defaults = None;
            }
        }
    }

    // ── derived views ──

    pub fn grid(&self) -> Vec<Option<NaiveDate>> {
        grid::build(self.selected_date, self.view_mode, self.week_start)
    }

    pub fn day_events(&self) -> Vec<&Event> {
        self.store
            .events_for_day(self.selected_date, &self.search)
            .collect()
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.day_events().get(self.day_cursor).copied()
    }

    // ── navigation ──

    pub fn go_to(&mut self, date: NaiveDate) {
        self.selected_date = date;
        self.day_cursor = 0;
    }

    pub fn next_day(&mut self) {
        self.go_to(self.selected_date + Duration::days(1));
    }

    pub fn prev_day(&mut self) {
        self.go_to(self.selected_date - Duration::days(1));
    }

    pub fn next_week(&mut self) {
        self.go_to(self.selected_date + Duration::weeks(1));
    }

    pub fn prev_week(&mut self) {
        self.go_to(self.selected_date - Duration::weeks(1));
    }

    /// Next month in month view, next week in week view.
    pub fn next_page(&mut self) {
        self.go_to(grid::shift(self.selected_date, self.view_mode, 1));
    }

    pub fn prev_page(&mut self) {
        self.go_to(grid::shift(self.selected_date, self.view_mode, -1));
    }

    pub fn go_to_today(&mut self) {
        self.set_today(Local::now().date_naive());
        self.go_to(self.today);
    }

    /// Called every tick so the highlight follows the clock past midnight.
    /// The selection stays where it is.
    pub fn set_today(&mut self, today: NaiveDate) {
        if self.today != today {
            debug!(%today, "date changed");
            self.today = today;
        }
    }

    pub fn toggle_view(&mut self) {
        self.view_mode = self.view_mode.toggle();
    }

    pub fn cursor_down(&mut self) {
        let len = self.day_events().len();
        if self.day_cursor + 1 < len {
            self.day_cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.day_cursor = self.day_cursor.saturating_sub(1);
    }

    // ── search ──

    pub fn start_search(&mut self) {
        self.searching = true;
    }

    pub fn search_input(&mut self, c: char) {
        self.search.extend(c.to_lowercase());
        self.day_cursor = 0;
    }

    pub fn search_backspace(&mut self) {
        self.search.pop();
        self.day_cursor = 0;
    }

    /// Leave the search box, keeping the term.
    pub fn finish_search(&mut self) {
        self.searching = false;
    }

    pub fn clear_search(&mut self) {
        self.searching = false;
        self.search.clear();
        self.day_cursor = 0;
    }

    // ── form ──

    pub fn open_add_form(&mut self) {
        self.form_state = Some(EventFormState::adding(self.selected_date));
    }

    pub fn open_edit_form(&mut self) {
        let Some(ev) = self.selected_event() else {
            return;
        };
        if self.store.is_default(ev.id) {
            self.status_message = Some(CalendarError::ReadOnly(ev.id).to_string());
            return;
        }
        self.form_state = Some(EventFormState::editing(ev));
    }

    pub fn close_form(&mut self) {
        self.form_state = None;
    }

    /// Apply the form. On a validation error the form stays open with the message.
    pub fn submit_form(&mut self) {
        let Some(form) = self.form_state.as_mut() else {
            return;
        };
        let draft = form.draft.clone();
        let mode = form.mode;

        let result = match mode {
            FormMode::Adding => self.store.add(draft).map(|e| (e.id, e.date)),
            FormMode::Editing(id) => self.store.update(id, draft).map(|e| (e.id, e.date)),
        };

        match result {
            Ok((id, date)) => {
                self.form_state = None;
                self.go_to(date);
                self.select(id);
                self.status_message = Some(match mode {
                    FormMode::Adding => "Event added".to_string(),
                    FormMode::Editing(_) => "Event updated".to_string(),
                });
                self.persist();
            }
            Err(err) => {
                if let Some(form) = self.form_state.as_mut() {
                    form.error = Some(err.to_string());
                }
            }
        }
    }

    pub fn form_input_char(&mut self, c: char) {
        if let Some(ref mut form) = self.form_state {
            form.input_char(c);
            form.error = None;
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.backspace();
            form.error = None;
        }
    }

    pub fn form_tab(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.next_field();
        }
    }

    pub fn form_backtab(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.prev_field();
        }
    }

    // ── delete ──

    pub fn request_delete(&mut self) {
        let Some(ev) = self.selected_event() else {
            return;
        };
        if self.store.is_default(ev.id) {
            self.status_message = Some(CalendarError::ReadOnly(ev.id).to_string());
            return;
        }
        self.pending_delete = Some(ev.id);
    }

    /// Answer the "Delete this event?" prompt.
    pub fn confirm_delete(&mut self, confirmed: bool) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        if !confirmed {
            return;
        }
        match self.store.remove(id) {
            Ok(ev) => {
                info!(id = %ev.id, title = %ev.title, "event deleted");
                let len = self.day_events().len();
                self.day_cursor = self.day_cursor.min(len.saturating_sub(1));
                self.status_message = Some(format!("Deleted \"{}\"", ev.title));
                self.persist();
            }
            Err(err) => self.status_message = Some(err.to_string()),
        }
    }

    // ── grab & drop ──

    pub fn grab_selected(&mut self) {
        let Some(ev) = self.selected_event() else {
            return;
        };
        let (id, title) = (ev.id, ev.title.clone());
        if self.store.is_default(id) {
            self.status_message = Some("Default events cannot be moved".to_string());
            return;
        }
        self.status_message = Some(format!("Moving \"{title}\": pick a day, m to drop"));
        self.grabbed = Some(id);
    }

    pub fn drop_grabbed(&mut self) {
        let Some(id) = self.grabbed.take() else {
            return;
        };
        let date = self.selected_date;
        match self.store.move_to(id, date) {
            Ok(ev) => {
                info!(%id, %date, "event moved");
                self.status_message = Some(format!("Moved \"{}\" to {}", ev.title, date));
                self.select(id);
                self.persist();
            }
            Err(err) => self.status_message = Some(err.to_string()),
        }
    }

    pub fn cancel_grab(&mut self) {
        self.grabbed = None;
    }

    // ── export ──

    pub fn export_csv(&mut self) {
        match export::write_csv(self.store.user_events(), &self.export_dir) {
            Ok(path) => {
                self.status_message = Some(format!("Exported to {}", path.display()));
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "CSV export failed");
                self.status_message = Some(format!("Export failed: {err}"));
            }
        }
    }

    fn select(&mut self, id: Uuid) {
        if let Some(pos) = self.day_events().iter().position(|e| e.id == id) {
            self.day_cursor = pos;
        }
    }

    /// Save after a mutation. The in-memory change stands even if the write fails.
    fn persist(&mut self) {
        if let Err(err) = self.storage.save(self.store.user_events()) {
            error!(error = %format!("{err:#}"), path = %self.storage.path().display(), "failed to save events");
            self.status_message = Some(format!("Save failed: {err}"));
        }
    }
}
