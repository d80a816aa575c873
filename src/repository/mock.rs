//! Mock repository implementations for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::dish::{Dish, DishClaim, NewDish};
use crate::domain::event::{Event, NewEvent};
use crate::domain::types::{DishId, EventId};
use crate::repository::errors::RepositoryResult;
use crate::repository::{DishReader, DishWriter, EventReader, EventWriter};

mock! {
    pub Repository {}

    #[async_trait]
    impl EventReader for Repository {
        async fn list_events(&self) -> RepositoryResult<Vec<Event>>;
    }

    #[async_trait]
    impl EventWriter for Repository {
        async fn create_event(&self, new_event: &NewEvent) -> RepositoryResult<Event>;
        async fn delete_event(&self, event_id: &EventId) -> RepositoryResult<()>;
    }

    #[async_trait]
    impl DishReader for Repository {
        async fn list_dishes(&self, event_id: &EventId) -> RepositoryResult<Vec<Dish>>;
    }

    #[async_trait]
    impl DishWriter for Repository {
        async fn create_dishes(&self, new_dishes: &[NewDish]) -> RepositoryResult<usize>;
        async fn update_dish_claim(
            &self,
            dish_id: &DishId,
            claim: &DishClaim,
        ) -> RepositoryResult<()>;
        async fn delete_dish(&self, dish_id: &DishId) -> RepositoryResult<()>;
    }
}
