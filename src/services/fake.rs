//! In-memory stand-in for the remote tables used by service tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::dish::{Dish, DishClaim, NewDish};
use crate::domain::event::{Event, NewEvent};
use crate::domain::types::{DishId, EventId};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DishReader, DishWriter, EventReader, EventWriter};

#[derive(Default)]
struct Tables {
    next_id: u64,
    events: Vec<Event>,
    dishes: Vec<Dish>,
    claim_updates: Vec<(DishId, Option<String>)>,
}

impl Tables {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

/// Behaves like the remote service, including the event -> dishes cascade.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
}

impl InMemoryRepository {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    pub fn seed_event(&self, name: &str, event_date: NaiveDate) -> EventId {
        let mut tables = self.tables();
        let id = EventId::new(tables.next_id("event")).unwrap();
        tables.events.push(Event {
            id: id.clone(),
            name: name.to_string(),
            event_date,
            created_at: None,
        });
        id
    }

    pub fn seed_dish(&self, event_id: &EventId, name: &str) -> DishId {
        let mut tables = self.tables();
        let id = DishId::new(tables.next_id("dish")).unwrap();
        tables.dishes.push(Dish {
            id: id.clone(),
            event_id: event_id.clone(),
            name: name.to_string(),
            assigned_to: None,
            created_at: None,
        });
        id
    }

    pub fn event_count(&self) -> usize {
        self.tables().events.len()
    }

    pub fn dishes_of(&self, event_id: &EventId) -> Vec<Dish> {
        self.tables()
            .dishes
            .iter()
            .filter(|dish| &dish.event_id == event_id)
            .cloned()
            .collect()
    }

    pub fn claim_updates(&self) -> Vec<(DishId, Option<String>)> {
        self.tables().claim_updates.clone()
    }
}

#[async_trait]
impl EventReader for InMemoryRepository {
    async fn list_events(&self) -> RepositoryResult<Vec<Event>> {
        let mut events = self.tables().events.clone();
        events.sort_by(|a, b| b.event_date.cmp(&a.event_date));
        Ok(events)
    }
}

#[async_trait]
impl EventWriter for InMemoryRepository {
    async fn create_event(&self, new_event: &NewEvent) -> RepositoryResult<Event> {
        let mut tables = self.tables();
        let event = Event {
            id: EventId::new(tables.next_id("event"))?,
            name: new_event.name.to_string(),
            event_date: new_event.event_date,
            created_at: None,
        };
        tables.events.push(event.clone());
        Ok(event)
    }

    async fn delete_event(&self, event_id: &EventId) -> RepositoryResult<()> {
        let mut tables = self.tables();
        tables.events.retain(|event| &event.id != event_id);
        tables.dishes.retain(|dish| &dish.event_id != event_id);
        Ok(())
    }
}

#[async_trait]
impl DishReader for InMemoryRepository {
    async fn list_dishes(&self, event_id: &EventId) -> RepositoryResult<Vec<Dish>> {
        Ok(self.dishes_of(event_id))
    }
}

#[async_trait]
impl DishWriter for InMemoryRepository {
    async fn create_dishes(&self, new_dishes: &[NewDish]) -> RepositoryResult<usize> {
        let mut tables = self.tables();
        for new_dish in new_dishes {
            if !tables.events.iter().any(|event| event.id == new_dish.event_id) {
                return Err(RepositoryError::Remote {
                    status: 409,
                    message: "violates foreign key constraint".to_string(),
                });
            }
            let dish = Dish {
                id: DishId::new(tables.next_id("dish"))?,
                event_id: new_dish.event_id.clone(),
                name: new_dish.name.to_string(),
                assigned_to: new_dish.assigned_to.as_ref().map(|name| name.to_string()),
                created_at: None,
            };
            tables.dishes.push(dish);
        }
        Ok(new_dishes.len())
    }

    async fn update_dish_claim(
        &self,
        dish_id: &DishId,
        claim: &DishClaim,
    ) -> RepositoryResult<()> {
        let mut tables = self.tables();
        let assigned_to = claim.assigned_to.as_ref().map(|name| name.to_string());
        tables
            .claim_updates
            .push((dish_id.clone(), assigned_to.clone()));
        if let Some(dish) = tables.dishes.iter_mut().find(|dish| &dish.id == dish_id) {
            dish.assigned_to = assigned_to;
        }
        Ok(())
    }

    async fn delete_dish(&self, dish_id: &DishId) -> RepositoryResult<()> {
        self.tables().dishes.retain(|dish| &dish.id != dish_id);
        Ok(())
    }
}
