use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result, WrapErr};
use tracing::info;

use super::event::{Event, DATE_FORMAT, TIME_FORMAT};

pub const EXPORT_FILE_NAME: &str = "calendar-events.csv";
const HEADER: [&str; 5] = ["Title", "Date", "Start", "End", "Category"];

/// Render events as CSV with every field quoted.
pub fn to_csv(events: &[Event]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for ev in events {
        writer.write_record([
            ev.title.clone(),
            ev.date.format(DATE_FORMAT).to_string(),
            ev.start.format(TIME_FORMAT).to_string(),
            ev.end.format(TIME_FORMAT).to_string(),
            ev.category.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| eyre!("Failed to flush CSV writer: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Write `calendar-events.csv` into `dir`, returning the full path.
pub fn write_csv(events: &[Event], dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).wrap_err_with(|| format!("Failed to create {}", dir.display()))?;
    let path = dir.join(EXPORT_FILE_NAME);
    fs::write(&path, to_csv(events)?)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    info!(count = events.len(), path = %path.display(), "exported events");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::{Category, EventDraft};
    use uuid::Uuid;

    fn event(title: &str, category: Category) -> Event {
        EventDraft {
            title: title.to_string(),
            date: "2025-02-10".to_string(),
            start: "14:00".to_string(),
            end: "15:30".to_string(),
            category,
        }
        .into_event(Uuid::new_v4())
        .unwrap()
    }

    #[test]
    fn empty_list_is_header_only() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv, "\"Title\",\"Date\",\"Start\",\"End\",\"Category\"\n");
    }

    #[test]
    fn one_line_per_event_plus_header() {
        let events = vec![
            event("Review", Category::Work),
            event("Call mum", Category::Personal),
            event("Exam", Category::Study),
        ];
        let csv = to_csv(&events).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), events.len() + 1);
        assert_eq!(lines[1], "\"Review\",\"2025-02-10\",\"14:00\",\"15:30\",\"Work\"");
        for line in &lines {
            assert_eq!(line.split(',').count(), 5);
            assert!(line.split(',').all(|f| f.starts_with('"') && f.ends_with('"')));
        }
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        let csv = to_csv(&[event("The \"big\" one", Category::Urgent)]).unwrap();
        assert!(csv.contains("\"The \"\"big\"\" one\""));
    }

    #[test]
    fn write_csv_uses_fixed_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&[event("Review", Category::Work)], dir.path()).unwrap();
        assert_eq!(path.file_name().unwrap(), EXPORT_FILE_NAME);
        assert_eq!(fs::read_to_string(path).unwrap().lines().count(), 2);
    }
}
