//! Services coordinating the event list and the create-event form.

use crate::domain::event::Event;
use crate::domain::types::EventId;
use crate::forms::events::{CreateEventForm, CreateEventPayload};
use crate::repository::{DishReader, DishWriter, EventReader, EventWriter};
use crate::services::dishes::fetch_dishes;
use crate::services::{ServiceError, ServiceResult};
use crate::store::TrackerStore;

/// Reloads the full event list, newest date first.
pub async fn refresh_events<R>(repo: &R, store: &TrackerStore) -> ServiceResult<()>
where
    R: EventReader + ?Sized,
{
    let ticket = store.begin_events_fetch();
    let events = repo.list_events().await.map_err(|err| {
        log::error!("Error fetching events: {err}");
        err
    })?;
    store.apply_events(ticket, events);
    Ok(())
}

/// Performs the first event-list load if it has not succeeded yet.
pub async fn ensure_initialized<R>(repo: &R, store: &TrackerStore) -> bool
where
    R: EventReader + ?Sized,
{
    if !store.is_initialized() {
        // Failures are logged; the page keeps showing its loading placeholder.
        let _ = refresh_events(repo, store).await;
    }
    store.is_initialized()
}

/// Selects an event and replaces the dish list with that event's dishes.
pub async fn select_event<R>(repo: &R, store: &TrackerStore, event_id: &EventId) -> ServiceResult<()>
where
    R: DishReader + ?Sized,
{
    let fetch = store.select_event(event_id).ok_or(ServiceError::NotFound)?;
    // A failed fetch is logged only; reselecting the event retries it.
    let _ = fetch_dishes(repo, store, &fetch).await;
    Ok(())
}

/// Creates an event together with the named rows of the draft dish list.
///
/// The submitted fields are kept as the form draft until creation succeeds.
pub async fn create_event<R>(
    repo: &R,
    store: &TrackerStore,
    form: CreateEventForm,
) -> ServiceResult<Event>
where
    R: EventReader + EventWriter + DishWriter + ?Sized,
{
    store.set_draft(form.to_draft());

    let payload = CreateEventPayload::try_from(&form)?;

    if !store.begin_loading() {
        return Err(ServiceError::Busy);
    }
    let result = insert_event_with_dishes(repo, &payload).await;
    store.finish_loading();

    let event = result.map_err(|err| {
        log::error!("Error creating event: {err}");
        err
    })?;

    store.reset_draft();
    let _ = refresh_events(repo, store).await;

    Ok(event)
}

async fn insert_event_with_dishes<R>(repo: &R, payload: &CreateEventPayload) -> ServiceResult<Event>
where
    R: EventWriter + DishWriter + ?Sized,
{
    let event = repo.create_event(&payload.new_event()).await?;

    let dishes = payload.new_dishes(&event.id);
    if !dishes.is_empty() {
        repo.create_dishes(&dishes).await?;
    }

    Ok(event)
}

/// Deletes an event; the remote service removes its dishes with it.
pub async fn delete_event<R>(
    repo: &R,
    store: &TrackerStore,
    event_id: &EventId,
    confirmed: bool,
) -> ServiceResult<()>
where
    R: EventReader + EventWriter + ?Sized,
{
    if !confirmed {
        return Err(ServiceError::Unconfirmed);
    }

    repo.delete_event(event_id).await.map_err(|err| {
        log::error!("Error deleting event: {err}");
        err
    })?;

    store.forget_event(event_id);
    let _ = refresh_events(repo, store).await;

    Ok(())
}

/// Opens or closes the create form, keeping its draft.
pub fn toggle_create_form(store: &TrackerStore) -> bool {
    store.toggle_create_form()
}

/// Keeps the submitted draft fields and appends an empty dish row.
pub fn add_draft_dish(store: &TrackerStore, form: &CreateEventForm) {
    let mut draft = form.to_draft();
    draft.dishes.push(Default::default());
    store.set_draft(draft);
}

/// Closes the create form and forgets its draft.
pub fn cancel_create_event(store: &TrackerStore) {
    store.reset_draft();
}
