use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};

use super::event::Event;

const EVENTS_FILE: &str = "events.json";
const SEED_EVENTS: &str = include_str!("../../data/events.json");

/// JSON file holding the user events. Read once, rewritten after each mutation.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(EVENTS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted events, or the bundled seed when nothing was saved yet.
    pub fn load_or_seed(&self) -> Result<Vec<Event>> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no saved events, using seed data");
            return seed_events();
        }

        let content = fs::read_to_string(&self.path)
            .wrap_err_with(|| format!("Failed to read {}", self.path.display()))?;
        let events: Vec<Event> = serde_json::from_str(&content)
            .wrap_err_with(|| format!("Failed to parse {}", self.path.display()))?;
        info!(count = events.len(), path = %self.path.display(), "loaded events");
        Ok(events)
    }

    pub fn save(&self, events: &[Event]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .wrap_err_with(|| format!("Failed to create {}", dir.display()))?;
        }

        let json = serde_json::to_string_pretty(events)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).wrap_err_with(|| format!("Failed to write {}", tmp.display()))?;
        if let Err(err) = fs::rename(&tmp, &self.path) {
            warn!(error = %err, "rename failed, removing temp file");
            let _ = fs::remove_file(&tmp);
            return Err(err).wrap_err_with(|| format!("Failed to replace {}", self.path.display()));
        }
        Ok(())
    }
}

pub fn seed_events() -> Result<Vec<Event>> {
    serde_json::from_str(SEED_EVENTS).wrap_err("Bundled seed events are malformed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::{Category, EventDraft};
    use uuid::Uuid;

    #[test]
    fn missing_file_falls_back_to_seed() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        let events = storage.load_or_seed().unwrap();
        assert!(!events.is_empty());
        assert_eq!(events.len(), seed_events().unwrap().len());
    }

    #[test]
    fn save_then_load_reproduces_the_list() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(&dir.path().join("nested"));

        let events: Vec<Event> = ["Climbing", "Piano"]
            .iter()
            .map(|title| {
                EventDraft {
                    title: title.to_string(),
                    date: "2025-09-01".to_string(),
                    start: "07:30".to_string(),
                    end: "08:45".to_string(),
                    category: Category::Personal,
                }
                .into_event(Uuid::new_v4())
                .unwrap()
            })
            .collect();

        storage.save(&events).unwrap();
        assert_eq!(storage.load_or_seed().unwrap(), events);

        storage.save(&[]).unwrap();
        assert!(storage.load_or_seed().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = Storage::new(dir.path());
        fs::write(storage.path(), "{ not json").unwrap();
        let err = storage.load_or_seed().unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
