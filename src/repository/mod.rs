//! Access to the remote `events` and `dishes` tables.
//!
//! Readers and writers are split per table so services can ask for exactly the
//! capabilities they need. [`RemoteRepository`] implements all of them over a
//! shared [`RemoteClient`].

use async_trait::async_trait;

use crate::domain::dish::{Dish, DishClaim, NewDish};
use crate::domain::event::{Event, NewEvent};
use crate::domain::types::{DishId, EventId};
use crate::remote::RemoteClient;
use crate::repository::errors::RepositoryResult;

pub mod dish;
pub mod errors;
pub mod event;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

/// Remote-backed implementation of every repository trait.
#[derive(Clone, Debug)]
pub struct RemoteRepository {
    client: RemoteClient,
}

impl RemoteRepository {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }

    pub(crate) fn client(&self) -> &RemoteClient {
        &self.client
    }
}

#[async_trait]
pub trait EventReader: Send + Sync {
    /// All events, newest date first.
    async fn list_events(&self) -> RepositoryResult<Vec<Event>>;
}

#[async_trait]
pub trait EventWriter: Send + Sync {
    async fn create_event(&self, new_event: &NewEvent) -> RepositoryResult<Event>;
    /// Removes the event; its dishes are removed by the service-side cascade.
    async fn delete_event(&self, event_id: &EventId) -> RepositoryResult<()>;
}

#[async_trait]
pub trait DishReader: Send + Sync {
    /// Dishes of one event in creation order.
    async fn list_dishes(&self, event_id: &EventId) -> RepositoryResult<Vec<Dish>>;
}

#[async_trait]
pub trait DishWriter: Send + Sync {
    async fn create_dishes(&self, new_dishes: &[NewDish]) -> RepositoryResult<usize>;
    async fn update_dish_claim(&self, dish_id: &DishId, claim: &DishClaim)
    -> RepositoryResult<()>;
    async fn delete_dish(&self, dish_id: &DishId) -> RepositoryResult<()>;
}
