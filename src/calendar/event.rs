use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::CalendarError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Work,
    Personal,
    Study,
    Urgent,
    Holiday,
    #[default]
    Default,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Personal,
        Category::Study,
        Category::Urgent,
        Category::Holiday,
        Category::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Study => "Study",
            Category::Urgent => "Urgent",
            Category::Holiday => "Holiday",
            Category::Default => "Default",
        }
    }

    /// Cycle to the next category, wrapping around.
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(&self) -> Self {
        let idx = Self::ALL.iter().position(|c| c == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Unknown names fall back to Default so a hand-edited or remote file still loads.
impl From<String> for Category {
    fn from(s: String) -> Self {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or_default()
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        c.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
    #[serde(default)]
    pub category: Category,
}

impl Event {
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            self.start.format(TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        )
    }

    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Case-insensitive match on the title, or a raw substring match on the date.
    pub fn matches_search(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term) || self.date_string().contains(&term)
    }
}

/// Raw form input. Nothing is parsed until the draft is turned into an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub start: String,
    pub end: String,
    pub category: Category,
}

impl EventDraft {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            ..Self::default()
        }
    }

    pub fn into_event(self, id: Uuid) -> Result<Event, CalendarError> {
        self.check_required()?;

        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).map_err(|_| {
            CalendarError::InvalidField {
                field: "date",
                value: self.date.clone(),
            }
        })?;
        let start = parse_time(&self.start).ok_or_else(|| CalendarError::InvalidField {
            field: "start",
            value: self.start.clone(),
        })?;
        let end = parse_time(&self.end).ok_or_else(|| CalendarError::InvalidField {
            field: "end",
            value: self.end.clone(),
        })?;

        Ok(Event {
            id,
            title: self.title.trim().to_string(),
            date,
            start,
            end,
            category: self.category,
        })
    }

    fn check_required(&self) -> Result<(), CalendarError> {
        let fields = [
            ("title", &self.title),
            ("date", &self.date),
            ("start", &self.start),
            ("end", &self.end),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CalendarError::MissingField(name));
            }
        }
        Ok(())
    }
}

impl From<&Event> for EventDraft {
    fn from(ev: &Event) -> Self {
        Self {
            title: ev.title.clone(),
            date: ev.date_string(),
            start: ev.start.format(TIME_FORMAT).to_string(),
            end: ev.end.format(TIME_FORMAT).to_string(),
            category: ev.category,
        }
    }
}

pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_str(&time.format(super::TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(de)?;
        super::parse_time(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid time {s:?}, expected HH:MM")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> EventDraft {
        EventDraft {
            title: "Standup".to_string(),
            date: "2025-03-14".to_string(),
            start: "09:00".to_string(),
            end: "09:15".to_string(),
            category: Category::Work,
        }
    }

    #[test]
    fn draft_with_all_fields_becomes_event() {
        let id = Uuid::new_v4();
        let ev = draft().into_event(id).unwrap();
        assert_eq!(ev.id, id);
        assert_eq!(ev.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(ev.time_range(), "09:00 - 09:15");
        assert_eq!(ev.category, Category::Work);
    }

    #[test]
    fn each_required_field_is_checked() {
        let mut d = draft();
        d.title.clear();
        assert_eq!(
            d.into_event(Uuid::new_v4()),
            Err(CalendarError::MissingField("title"))
        );

        let mut d = draft();
        d.end = "   ".to_string();
        assert_eq!(
            d.into_event(Uuid::new_v4()),
            Err(CalendarError::MissingField("end"))
        );
    }

    #[test]
    fn unparsable_date_is_rejected() {
        let mut d = draft();
        d.date = "14/03/2025".to_string();
        assert!(matches!(
            d.into_event(Uuid::new_v4()),
            Err(CalendarError::InvalidField { field: "date", .. })
        ));
    }

    #[test]
    fn json_without_id_or_category_loads() {
        let ev: Event = serde_json::from_str(
            r#"{"title":"Lunch","date":"2025-01-02","start":"12:00","end":"13:00:00"}"#,
        )
        .unwrap();
        assert_eq!(ev.category, Category::Default);
        assert_eq!(ev.end, NaiveTime::from_hms_opt(13, 0, 0).unwrap());

        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["end"], "13:00");
        assert_eq!(json["date"], "2025-01-02");
        assert_eq!(json["category"], "Default");
    }

    #[test]
    fn unknown_category_falls_back_to_default() {
        assert_eq!(Category::from("Errands".to_string()), Category::Default);
        assert_eq!(Category::from("holiday".to_string()), Category::Holiday);
    }

    #[test]
    fn search_matches_title_case_insensitively_or_date() {
        let ev = draft().into_event(Uuid::new_v4()).unwrap();
        assert!(ev.matches_search(""));
        assert!(ev.matches_search("STAND"));
        assert!(ev.matches_search("2025-03"));
        assert!(!ev.matches_search("retro"));
    }

    #[test]
    fn category_cycles() {
        assert_eq!(Category::Default.next(), Category::Work);
        assert_eq!(Category::Work.prev(), Category::Default);
    }
}
