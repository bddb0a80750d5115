use chrono::NaiveDate;
use std::collections::HashSet;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::CalendarError;
use super::event::{Event, EventDraft};

/// Default events are read-only. Every mutation goes to `user`.
#[derive(Debug, Default)]
pub struct EventStore {
    defaults: Vec<Event>,
    user: Vec<Event>,
}

impl EventStore {
    pub fn new(mut user: Vec<Event>) -> Self {
        rekey_duplicates(&mut user, &mut HashSet::new());
        Self {
            defaults: Vec::new(),
            user,
        }
    }

    /// Replace the default partition. Defaults whose id is already taken by a
    /// user event (or an earlier default) get a fresh one.
    pub fn set_defaults(&mut self, mut defaults: Vec<Event>) {
        info!(count = defaults.len(), "default events loaded");
        let mut seen: HashSet<Uuid> = self.user.iter().map(|e| e.id).collect();
        rekey_duplicates(&mut defaults, &mut seen);
        self.defaults = defaults;
    }

    pub fn user_events(&self) -> &[Event] {
        &self.user
    }

    #[cfg(test)]
    pub fn default_events(&self) -> &[Event] {
        &self.defaults
    }

    pub fn is_default(&self, id: Uuid) -> bool {
        self.defaults.iter().any(|e| e.id == id)
    }

    pub fn get(&self, id: Uuid) -> Option<&Event> {
        self.defaults.iter().chain(&self.user).find(|e| e.id == id)
    }

    /// Defaults first, then user events in insertion order.
    pub fn events_for_day<'a>(&'a self, day: NaiveDate, search: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.defaults
            .iter()
            .chain(&self.user)
            .filter(move |e| e.date == day && e.matches_search(search))
    }

    pub fn has_events_on(&self, day: NaiveDate, search: &str) -> bool {
        self.events_for_day(day, search).next().is_some()
    }

    pub fn add(&mut self, draft: EventDraft) -> Result<&Event, CalendarError> {
        let event = draft.into_event(Uuid::new_v4())?;
        debug!(id = %event.id, date = %event.date, "adding event");
        self.user.push(event);
        Ok(&self.user[self.user.len() - 1])
    }

    pub fn update(&mut self, id: Uuid, draft: EventDraft) -> Result<&Event, CalendarError> {
        let idx = self.user_index(id)?;
        let event = draft.into_event(id)?;
        debug!(%id, "updating event");
        self.user[idx] = event;
        Ok(&self.user[idx])
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Event, CalendarError> {
        let idx = self.user_index(id)?;
        debug!(%id, "removing event");
        Ok(self.user.remove(idx))
    }

    /// Reschedule to another day. Only the date changes.
    pub fn move_to(&mut self, id: Uuid, date: NaiveDate) -> Result<&Event, CalendarError> {
        let idx = self.user_index(id)?;
        debug!(%id, %date, "moving event");
        self.user[idx].date = date;
        Ok(&self.user[idx])
    }

    fn user_index(&self, id: Uuid) -> Result<usize, CalendarError> {
        if self.is_default(id) {
            return Err(CalendarError::ReadOnly(id));
        }
        self.user
            .iter()
            .position(|e| e.id == id)
            .ok_or(CalendarError::NotFound(id))
    }
}

/// Ids must be unique across both partitions.
fn rekey_duplicates(events: &mut [Event], seen: &mut HashSet<Uuid>) {
    for event in events.iter_mut() {
        if !seen.insert(event.id) {
            let fresh = Uuid::new_v4();
            warn!(old = %event.id, new = %fresh, title = %event.title, "duplicate event id, assigning a new one");
            event.id = fresh;
            seen.insert(fresh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::Category;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft(title: &str, day: &str) -> EventDraft {
        EventDraft {
            title: title.to_string(),
            date: day.to_string(),
            start: "10:00".to_string(),
            end: "11:00".to_string(),
            category: Category::Personal,
        }
    }

    fn event(title: &str, day: &str) -> Event {
        draft(title, day).into_event(Uuid::new_v4()).unwrap()
    }

    fn store() -> EventStore {
        let mut store = EventStore::new(vec![
            event("Gym", "2025-05-01"),
            event("Dinner", "2025-05-01"),
            event("Dentist", "2025-05-02"),
        ]);
        store.set_defaults(vec![event("Labour Day", "2025-05-01")]);
        store
    }

    fn titles<'a>(it: impl Iterator<Item = &'a Event>) -> Vec<&'a str> {
        it.map(|e| e.title.as_str()).collect()
    }

    #[test]
    fn day_lookup_lists_defaults_before_user_events() {
        let store = store();
        assert_eq!(
            titles(store.events_for_day(date(2025, 5, 1), "")),
            ["Labour Day", "Gym", "Dinner"]
        );
        assert_eq!(titles(store.events_for_day(date(2025, 5, 3), "")), Vec::<&str>::new());
    }

    #[test]
    fn day_lookup_applies_search_to_title_and_date() {
        let store = store();
        assert_eq!(titles(store.events_for_day(date(2025, 5, 1), "din")), ["Dinner"]);
        assert_eq!(titles(store.events_for_day(date(2025, 5, 1), "LABOUR")), ["Labour Day"]);
        assert_eq!(store.events_for_day(date(2025, 5, 1), "2025-05").count(), 3);
        assert!(!store.has_events_on(date(2025, 5, 2), "gym"));
    }

    #[test]
    fn add_appends_and_is_visible_on_its_day() {
        let mut store = store();
        let id = store.add(draft("Movie", "2025-05-02")).unwrap().id;
        assert_eq!(store.user_events().len(), 4);
        assert_eq!(store.user_events()[3].id, id);
        assert_eq!(
            titles(store.events_for_day(date(2025, 5, 2), "")),
            ["Dentist", "Movie"]
        );
    }

    #[test]
    fn add_with_empty_title_changes_nothing() {
        let mut store = store();
        let err = store.add(draft("", "2025-05-02")).unwrap_err();
        assert_eq!(err, CalendarError::MissingField("title"));
        assert_eq!(store.user_events().len(), 3);
    }

    #[test]
    fn update_replaces_only_the_target() {
        let mut store = store();
        let before = store.user_events().to_vec();
        let target = before[1].id;

        store.update(target, draft("Late dinner", "2025-05-04")).unwrap();

        let after = store.user_events();
        assert_eq!(after[0], before[0]);
        assert_eq!(after[2], before[2]);
        assert_eq!(after[1].id, target);
        assert_eq!(after[1].title, "Late dinner");
        assert_eq!(after[1].date, date(2025, 5, 4));
    }

    #[test]
    fn remove_deletes_exactly_one() {
        let mut store = store();
        let target = store.user_events()[0].id;
        let removed = store.remove(target).unwrap();
        assert_eq!(removed.title, "Gym");
        assert_eq!(titles(store.user_events().iter()), ["Dinner", "Dentist"]);
        assert_eq!(store.remove(target), Err(CalendarError::NotFound(target)));
    }

    #[test]
    fn move_changes_only_the_date() {
        let mut store = store();
        let before = store.user_events()[2].clone();
        store.move_to(before.id, date(2025, 5, 9)).unwrap();

        let after = &store.user_events()[2];
        assert_eq!(after.date, date(2025, 5, 9));
        assert_eq!(after.title, before.title);
        assert_eq!(after.start, before.start);
        assert_eq!(after.end, before.end);
        assert_eq!(after.category, before.category);
    }

    #[test]
    fn default_events_reject_every_mutation() {
        let mut store = store();
        let id = store.default_events()[0].id;

        assert_eq!(store.move_to(id, date(2025, 5, 9)), Err(CalendarError::ReadOnly(id)));
        assert_eq!(store.remove(id), Err(CalendarError::ReadOnly(id)));
        assert_eq!(
            store.update(id, draft("Renamed", "2025-05-01")).map(|e| e.id),
            Err(CalendarError::ReadOnly(id))
        );
        assert_eq!(store.default_events()[0].title, "Labour Day");
        assert_eq!(store.default_events()[0].date, date(2025, 5, 1));
    }

    #[test]
    fn identical_events_stay_distinguishable() {
        let mut store = EventStore::new(vec![event("Yoga", "2025-05-05"), event("Yoga", "2025-05-05")]);
        let second = store.user_events()[1].id;
        store.move_to(second, date(2025, 5, 6)).unwrap();
        assert_eq!(store.user_events()[0].date, date(2025, 5, 5));
        assert_eq!(store.user_events()[1].date, date(2025, 5, 6));
    }

    #[test]
    fn duplicate_user_ids_are_rekeyed_on_load() {
        let a = event("A", "2025-05-05");
        let mut b = event("B", "2025-05-05");
        b.id = a.id;

        let mut store = EventStore::new(vec![a.clone(), b]);
        let second = store.user_events()[1].id;
        assert_ne!(second, a.id);

        let removed = store.remove(second).unwrap();
        assert_eq!(removed.title, "B");
        assert_eq!(titles(store.user_events().iter()), ["A"]);
        assert_eq!(store.user_events()[0].id, a.id);
    }

    #[test]
    fn default_sharing_a_user_id_does_not_lock_the_user_event() {
        let mine = event("Mine", "2025-05-05");
        let mut clash = event("Holiday", "2025-05-05");
        clash.id = mine.id;

        let mut store = EventStore::new(vec![mine.clone()]);
        store.set_defaults(vec![clash]);

        assert_ne!(store.default_events()[0].id, mine.id);
        assert!(!store.is_default(mine.id));
        store.move_to(mine.id, date(2025, 5, 6)).unwrap();
        assert_eq!(store.user_events()[0].date, date(2025, 5, 6));
    }
}
