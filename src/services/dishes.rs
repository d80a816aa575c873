//! Services for the dish list of the selected event and debounced claims.

use std::sync::Arc;

use crate::domain::dish::{DishClaim, NewDish};
use crate::domain::types::{DishId, DishName};
use crate::forms::dishes::AddDishForm;
use crate::repository::{DishReader, DishWriter};
use crate::services::{ServiceError, ServiceResult};
use crate::store::{DishFetch, PendingAlert, TrackerStore};

/// Message shown when a debounced claim could not be saved.
pub const CLAIM_FAILED_ALERT: &str = "Error updating assignment";

/// Runs one dish fetch and applies it if it is still the newest one.
pub(crate) async fn fetch_dishes<R>(
    repo: &R,
    store: &TrackerStore,
    fetch: &DishFetch,
) -> ServiceResult<()>
where
    R: DishReader + ?Sized,
{
    let dishes = repo.list_dishes(&fetch.event_id).await.map_err(|err| {
        log::error!("Error fetching dishes: {err}");
        err
    })?;
    store.apply_dishes(fetch, dishes);
    Ok(())
}

/// Reloads the dish list of the selected event, if one is selected.
pub async fn refresh_dishes<R>(repo: &R, store: &TrackerStore) -> ServiceResult<()>
where
    R: DishReader + ?Sized,
{
    match store.begin_dishes_fetch() {
        Some(fetch) => fetch_dishes(repo, store, &fetch).await,
        None => Ok(()),
    }
}

/// Adds an unclaimed dish to the selected event.
pub async fn add_dish<R>(repo: &R, store: &TrackerStore, form: AddDishForm) -> ServiceResult<()>
where
    R: DishReader + DishWriter + ?Sized,
{
    let event_id = store
        .selected_event_id()
        .ok_or(ServiceError::NoEventSelected)?;
    let name = DishName::try_from(form)?;

    repo.create_dishes(&[NewDish::new(event_id, name, None)])
        .await
        .map_err(|err| {
            log::error!("Error adding dish: {err}");
            err
        })?;

    let _ = refresh_dishes(repo, store).await;
    Ok(())
}

/// Deletes a dish and drops any unsaved claim typed into it.
pub async fn delete_dish<R>(repo: &R, store: &TrackerStore, dish_id: &DishId) -> ServiceResult<()>
where
    R: DishReader + DishWriter + ?Sized,
{
    repo.delete_dish(dish_id).await.map_err(|err| {
        log::error!("Error deleting dish: {err}");
        err
    })?;

    store.claims().cancel(dish_id);
    store.discard_claim_draft(dish_id);
    let _ = refresh_dishes(repo, store).await;
    Ok(())
}

/// Saves a claimant immediately; blank input releases the dish.
pub async fn update_dish_claim<R>(
    repo: &R,
    store: &TrackerStore,
    dish_id: &DishId,
    value: &str,
) -> ServiceResult<()>
where
    R: DishReader + DishWriter + ?Sized,
{
    let claim = DishClaim::from_input(value);
    repo.update_dish_claim(dish_id, &claim)
        .await
        .map_err(|err| {
            log::error!("Error updating dish: {err}");
            err
        })?;

    store.settle_claim_draft(dish_id, value);
    let _ = refresh_dishes(repo, store).await;
    Ok(())
}

/// Records one keystroke of a claim field and (re)arms that dish's save timer.
///
/// The draft is updated synchronously so the field always shows what was
/// typed. The save runs once the field has been quiet for the store's claim
/// delay, with whatever the draft holds at that moment. Keystrokes carry the
/// browser's sequence number; one that arrives after a later keystroke of the
/// same dish is dropped and `false` is returned. Must be called from within a
/// tokio runtime.
pub fn record_claim_keystroke<R>(
    repo: Arc<R>,
    store: &Arc<TrackerStore>,
    dish_id: DishId,
    value: String,
    seq: Option<u64>,
) -> bool
where
    R: DishReader + DishWriter + ?Sized + 'static,
{
    if !store.accept_claim_keystroke(&dish_id, &value, seq) {
        log::debug!("Dropped out-of-order claim keystroke for dish {dish_id}");
        return false;
    }

    let weak = Arc::downgrade(store);
    let key = dish_id.clone();
    store.claims().schedule(dish_id, async move {
        let Some(store) = weak.upgrade() else {
            return;
        };
        let latest = store.claim_draft(&key).unwrap_or(value);
        if update_dish_claim(repo.as_ref(), &store, &key, &latest)
            .await
            .is_err()
        {
            store.push_alert(PendingAlert::error(CLAIM_FAILED_ALERT));
        }
    });
    true
}
