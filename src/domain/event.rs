use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{EventId, EventName};

/// A dinner occasion as stored by the remote service.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub event_date: NaiveDate,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewEvent {
    pub name: EventName,
    pub event_date: NaiveDate,
}

impl NewEvent {
    #[must_use]
    pub fn new(name: EventName, event_date: NaiveDate) -> Self {
        Self { name, event_date }
    }
}
