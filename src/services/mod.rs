//! Intent handlers combining remote calls with view-state transitions.

use thiserror::Error;

use crate::forms::FormError;
use crate::repository::errors::RepositoryError;

pub mod dishes;
pub mod events;
pub mod main;
#[cfg(test)]
pub(crate) mod fake;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Form(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("no event selected")]
    NoEventSelected,

    #[error("deletion was not confirmed")]
    Unconfirmed,

    #[error("an event is already being created")]
    Busy,

    #[error("not found")]
    NotFound,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<FormError> for ServiceError {
    fn from(err: FormError) -> Self {
        ServiceError::Form(err.to_string())
    }
}
