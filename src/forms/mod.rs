//! Form definitions backing the tracker routes.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod dishes;
pub mod events;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("malformed form body: {0}")]
    Malformed(String),

    #[error("Please fill in event name and date")]
    MissingEventFields,

    #[error("Event date must be a valid date")]
    InvalidDate,

    #[error("invalid name")]
    InvalidName,
}

impl From<TypeConstraintError> for FormError {
    fn from(err: TypeConstraintError) -> Self {
        match err {
            TypeConstraintError::InvalidDate(_) => FormError::InvalidDate,
            _ => FormError::InvalidName,
        }
    }
}
