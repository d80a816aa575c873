use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::repository::RemoteRepository;
use crate::routes::{base_context, render_template};
use crate::services::main as main_service;
use crate::store::TrackerSessions;

#[get("/")]
pub async fn show_index(
    repo: web::Data<RemoteRepository>,
    sessions: web::Data<TrackerSessions>,
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let store = sessions.store_for(&session);
    let data = main_service::load_index_page(repo.get_ref(), &store).await;

    let mut context = base_context(&flash_messages, store.take_alerts());
    context.insert("initialized", &data.initialized);
    context.insert("events", &data.events);
    context.insert("selected", &data.selected);
    context.insert("dishes", &data.dishes);
    context.insert("show_create_event", &data.show_create_event);
    context.insert("draft", &data.draft);
    context.insert("loading", &data.loading);

    render_template(&tera, "main/index.html", &context)
}
