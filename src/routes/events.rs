//! Routes for the event list and the create-event form.

use actix_session::Session;
use actix_web::{Responder, post, web};
use actix_web_flash_messages::FlashMessage;

use crate::domain::types::EventId;
use crate::forms::events::{CreateEventForm, DeleteEventForm};
use crate::repository::RemoteRepository;
use crate::routes::redirect;
use crate::services::{ServiceError, events as events_service};
use crate::store::TrackerSessions;

#[post("/events/form/toggle")]
pub async fn toggle_create_form(
    sessions: web::Data<TrackerSessions>,
    session: Session,
) -> impl Responder {
    let store = sessions.store_for(&session);
    events_service::toggle_create_form(&store);
    redirect("/")
}

#[post("/events/form/dish")]
/// Keep what was typed so far and add another dish row to the form.
pub async fn add_draft_dish(
    sessions: web::Data<TrackerSessions>,
    session: Session,
    body: web::Bytes,
) -> impl Responder {
    let store = sessions.store_for(&session);
    match CreateEventForm::parse(&body) {
        Ok(form) => events_service::add_draft_dish(&store, &form),
        Err(err) => log::error!("Failed to parse event form: {err}"),
    }
    redirect("/")
}

#[post("/events/form/cancel")]
pub async fn cancel_create_form(
    sessions: web::Data<TrackerSessions>,
    session: Session,
) -> impl Responder {
    let store = sessions.store_for(&session);
    events_service::cancel_create_event(&store);
    redirect("/")
}

#[post("/events")]
pub async fn create_event(
    repo: web::Data<RemoteRepository>,
    sessions: web::Data<TrackerSessions>,
    session: Session,
    body: web::Bytes,
) -> impl Responder {
    let form = match CreateEventForm::parse(&body) {
        Ok(form) => form,
        Err(err) => {
            log::error!("Failed to parse event form: {err}");
            FlashMessage::error("Error creating event. Check the server log for details.").send();
            return redirect("/");
        }
    };

    let store = sessions.store_for(&session);
    match events_service::create_event(repo.get_ref(), &store, form).await {
        Ok(_) => {
            FlashMessage::success("Event created successfully!").send();
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
        }
        Err(ServiceError::Busy) => {
            FlashMessage::warning("An event is already being created.").send();
        }
        Err(_) => {
            FlashMessage::error("Error creating event. Check the server log for details.").send();
        }
    }
    redirect("/")
}

#[post("/events/{event_id}/select")]
pub async fn select_event(
    event_id: web::Path<String>,
    repo: web::Data<RemoteRepository>,
    sessions: web::Data<TrackerSessions>,
    session: Session,
) -> impl Responder {
    let Ok(event_id) = EventId::new(event_id.into_inner()) else {
        FlashMessage::error("Event not found.").send();
        return redirect("/");
    };

    let store = sessions.store_for(&session);
    if let Err(err) = events_service::select_event(repo.get_ref(), &store, &event_id).await {
        log::warn!("Failed to select event {event_id}: {err}");
        FlashMessage::error("Event not found.").send();
    }
    redirect("/")
}

#[post("/events/{event_id}/delete")]
pub async fn delete_event(
    event_id: web::Path<String>,
    repo: web::Data<RemoteRepository>,
    sessions: web::Data<TrackerSessions>,
    session: Session,
    web::Form(form): web::Form<DeleteEventForm>,
) -> impl Responder {
    let Ok(event_id) = EventId::new(event_id.into_inner()) else {
        FlashMessage::error("Event not found.").send();
        return redirect("/");
    };

    let store = sessions.store_for(&session);
    match events_service::delete_event(repo.get_ref(), &store, &event_id, form.confirm).await {
        Ok(()) => {}
        Err(ServiceError::Unconfirmed) => {
            FlashMessage::warning("Deletion was not confirmed.").send();
        }
        Err(_) => {
            FlashMessage::error("Error deleting event").send();
        }
    }
    redirect("/")
}
