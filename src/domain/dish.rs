use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::types::{ClaimantName, DishId, DishName, EventId};

/// A food item belonging to one event, optionally claimed by someone.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Dish {
    pub id: DishId,
    pub event_id: EventId,
    pub name: String,
    /// `None` means nobody has claimed the dish yet.
    pub assigned_to: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Dish {
    /// Persisted claimant or an empty string, as shown in the claim input.
    pub fn claimant_or_empty(&self) -> &str {
        self.assigned_to.as_deref().unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewDish {
    pub event_id: EventId,
    pub name: DishName,
    pub assigned_to: Option<ClaimantName>,
}

impl NewDish {
    #[must_use]
    pub fn new(event_id: EventId, name: DishName, assigned_to: Option<ClaimantName>) -> Self {
        Self {
            event_id,
            name,
            assigned_to,
        }
    }
}

/// New claimant value for a dish; `None` releases the claim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DishClaim {
    pub assigned_to: Option<ClaimantName>,
}

impl DishClaim {
    /// Builds a claim from raw text input, treating blank input as unclaimed.
    ///
    /// The stored name is trimmed, so `" Sam "` is saved as `"Sam"` and
    /// whitespace-only input releases the dish.
    #[must_use]
    pub fn from_input(value: &str) -> Self {
        Self {
            assigned_to: ClaimantName::from_input(value),
        }
    }
}
