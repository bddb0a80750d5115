use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Please fill all fields ({0} is empty)")]
    MissingField(&'static str),

    #[error("Invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("No event with id {0}")]
    NotFound(Uuid),

    #[error("Default events are read-only")]
    ReadOnly(Uuid),
}
