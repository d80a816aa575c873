//! Routes for the dishes of the selected event.

use actix_session::Session;
use actix_web::{HttpResponse, Responder, post, web};
use actix_web_flash_messages::FlashMessage;
use serde_json::json;

use crate::domain::types::DishId;
use crate::forms::dishes::{AddDishForm, ClaimDishForm};
use crate::repository::RemoteRepository;
use crate::routes::redirect;
use crate::services::{ServiceError, dishes as dishes_service};
use crate::store::TrackerSessions;

#[post("/dishes")]
pub async fn add_dish(
    repo: web::Data<RemoteRepository>,
    sessions: web::Data<TrackerSessions>,
    session: Session,
    web::Form(form): web::Form<AddDishForm>,
) -> impl Responder {
    let store = sessions.store_for(&session);
    match dishes_service::add_dish(repo.get_ref(), &store, form).await {
        Ok(()) | Err(ServiceError::Repository(_)) => {}
        Err(ServiceError::NoEventSelected) => {
            FlashMessage::warning("Select an event first.").send();
        }
        Err(err) => {
            log::warn!("Rejected dish: {err}");
            FlashMessage::warning("Please enter a dish name.").send();
        }
    }
    redirect("/")
}

#[post("/dishes/{dish_id}/delete")]
pub async fn delete_dish(
    dish_id: web::Path<String>,
    repo: web::Data<RemoteRepository>,
    sessions: web::Data<TrackerSessions>,
    session: Session,
) -> impl Responder {
    if let Ok(dish_id) = DishId::new(dish_id.into_inner()) {
        let store = sessions.store_for(&session);
        // Failures are logged by the service and otherwise silent.
        let _ = dishes_service::delete_dish(repo.get_ref(), &store, &dish_id).await;
    }
    redirect("/")
}

#[post("/dishes/{dish_id}/claim")]
/// One keystroke in a claim field. The value is saved after typing pauses.
pub async fn claim_dish(
    dish_id: web::Path<String>,
    repo: web::Data<RemoteRepository>,
    sessions: web::Data<TrackerSessions>,
    session: Session,
    web::Form(form): web::Form<ClaimDishForm>,
) -> impl Responder {
    let Ok(dish_id) = DishId::new(dish_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };

    let store = sessions.store_for(&session);
    let accepted = dishes_service::record_claim_keystroke(
        repo.into_inner(),
        &store,
        dish_id.clone(),
        form.value.clone(),
        form.seq,
    );

    HttpResponse::Accepted().json(json!({
        "dish_id": dish_id,
        "value": form.value,
        "accepted": accepted,
    }))
}
