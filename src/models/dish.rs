//! Wire rows of the remote `dishes` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::dish::{Dish as DomainDish, DishClaim, NewDish as DomainNewDish};
use crate::domain::types::{DishId, EventId, TypeConstraintError};

pub const DISHES_TABLE: &str = "dishes";

#[derive(Debug, Clone, Deserialize)]
/// Row returned by the remote service for [`crate::domain::dish::Dish`].
pub struct Dish {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
/// Insertable form of [`Dish`].
pub struct NewDish<'a> {
    pub event_id: &'a str,
    pub name: &'a str,
    pub assigned_to: Option<&'a str>,
}

#[derive(Debug, Serialize)]
/// Patch body used when claiming or releasing a [`Dish`].
pub struct UpdateDishClaim<'a> {
    pub assigned_to: Option<&'a str>,
}

impl TryFrom<Dish> for DomainDish {
    type Error = TypeConstraintError;

    fn try_from(row: Dish) -> Result<Self, Self::Error> {
        Ok(Self {
            id: DishId::new(row.id)?,
            event_id: EventId::new(row.event_id)?,
            name: row.name,
            assigned_to: row.assigned_to.filter(|name| !name.is_empty()),
            created_at: row.created_at,
        })
    }
}

impl<'a> From<&'a DomainNewDish> for NewDish<'a> {
    fn from(dish: &'a DomainNewDish) -> Self {
        Self {
            event_id: dish.event_id.as_str(),
            name: dish.name.as_str(),
            assigned_to: dish.assigned_to.as_deref(),
        }
    }
}

impl<'a> From<&'a DishClaim> for UpdateDishClaim<'a> {
    fn from(claim: &'a DishClaim) -> Self {
        Self {
            assigned_to: claim.assigned_to.as_deref(),
        }
    }
}
