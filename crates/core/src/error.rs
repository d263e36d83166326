use crate::booking::{BookingEvent, BookingStatus};
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid transition: {event} is not permitted from status '{from}'")]
    InvalidTransition {
        from: BookingStatus,
        event: BookingEvent,
    },
}

pub type CoreResult<T> = Result<T, CoreError>;
