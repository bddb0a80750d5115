pub mod error;
pub mod event;
pub mod export;
pub mod grid;
pub mod remote;
pub mod storage;
pub mod store;

pub use error::CalendarError;
pub use event::{Category, Event, EventDraft};
pub use grid::{ViewMode, WeekStart};
pub use storage::Storage;
pub use store::EventStore;
