use async_trait::async_trait;

use crate::domain::event::{Event, NewEvent};
use crate::domain::types::EventId;
use crate::models::event::{
    EVENTS_TABLE, Event as DbEvent, NewEvent as DbNewEvent,
};
use crate::remote::Order;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{EventReader, EventWriter, RemoteRepository};

#[async_trait]
impl EventReader for RemoteRepository {
    async fn list_events(&self) -> RepositoryResult<Vec<Event>> {
        let rows: Vec<DbEvent> = self
            .client()
            .table(EVENTS_TABLE)
            .order("event_date", Order::Descending)
            .select()
            .await?;

        rows.into_iter()
            .map(|row| Event::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

#[async_trait]
impl EventWriter for RemoteRepository {
    async fn create_event(&self, new_event: &NewEvent) -> RepositoryResult<Event> {
        let row = DbNewEvent::from(new_event);
        let mut created: Vec<DbEvent> = self
            .client()
            .table(EVENTS_TABLE)
            .insert_returning(&[row])
            .await?;

        if created.len() != 1 {
            return Err(RepositoryError::InvalidResponse(format!(
                "expected one created event, got {}",
                created.len()
            )));
        }

        created
            .pop()
            .ok_or(RepositoryError::NotFound)
            .and_then(|row| Event::try_from(row).map_err(RepositoryError::from))
    }

    async fn delete_event(&self, event_id: &EventId) -> RepositoryResult<()> {
        self.client()
            .table(EVENTS_TABLE)
            .eq("id", event_id.as_str())
            .delete()
            .await
    }
}
