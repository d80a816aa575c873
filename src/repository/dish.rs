use async_trait::async_trait;

use crate::domain::dish::{Dish, DishClaim, NewDish};
use crate::domain::types::{DishId, EventId};
use crate::models::dish::{
    DISHES_TABLE, Dish as DbDish, NewDish as DbNewDish, UpdateDishClaim,
};
use crate::remote::Order;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DishReader, DishWriter, RemoteRepository};

#[async_trait]
impl DishReader for RemoteRepository {
    async fn list_dishes(&self, event_id: &EventId) -> RepositoryResult<Vec<Dish>> {
        let rows: Vec<DbDish> = self
            .client()
            .table(DISHES_TABLE)
            .eq("event_id", event_id.as_str())
            .order("created_at", Order::Ascending)
            .select()
            .await?;

        rows.into_iter()
            .map(|row| Dish::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

#[async_trait]
impl DishWriter for RemoteRepository {
    async fn create_dishes(&self, new_dishes: &[NewDish]) -> RepositoryResult<usize> {
        if new_dishes.is_empty() {
            return Ok(0);
        }

        let rows = new_dishes.iter().map(DbNewDish::from).collect::<Vec<_>>();
        self.client().table(DISHES_TABLE).insert(&rows).await?;

        Ok(rows.len())
    }

    async fn update_dish_claim(
        &self,
        dish_id: &DishId,
        claim: &DishClaim,
    ) -> RepositoryResult<()> {
        self.client()
            .table(DISHES_TABLE)
            .eq("id", dish_id.as_str())
            .update(&UpdateDishClaim::from(claim))
            .await
    }

    async fn delete_dish(&self, dish_id: &DishId) -> RepositoryResult<()> {
        self.client()
            .table(DISHES_TABLE)
            .eq("id", dish_id.as_str())
            .delete()
            .await
    }
}
