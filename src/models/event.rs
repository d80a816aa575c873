//! Wire rows of the remote `events` table.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::event::{Event as DomainEvent, NewEvent as DomainNewEvent};
use crate::domain::types::{EventId, TypeConstraintError};

pub const EVENTS_TABLE: &str = "events";

#[derive(Debug, Clone, Deserialize)]
/// Row returned by the remote service for [`crate::domain::event::Event`].
pub struct Event {
    pub id: String,
    pub name: String,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
/// Insertable form of [`Event`].
pub struct NewEvent<'a> {
    pub name: &'a str,
    pub event_date: NaiveDate,
}

impl TryFrom<Event> for DomainEvent {
    type Error = TypeConstraintError;

    fn try_from(row: Event) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EventId::new(row.id)?,
            name: row.name,
            event_date: row.event_date,
            created_at: row.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewEvent> for NewEvent<'a> {
    fn from(event: &'a DomainNewEvent) -> Self {
        Self {
            name: event.name.as_str(),
            event_date: event.event_date,
        }
    }
}
