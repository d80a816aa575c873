//! HTTP handlers and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header::LOCATION;
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::store::{AlertLevel, PendingAlert};

pub mod dishes;
pub mod events;
pub mod main;

/// Maps a flash message level to the CSS modifier used by the templates.
pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

fn pending_level_to_str(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Error => "danger",
        AlertLevel::Success => "success",
    }
}

/// Template context with request alerts followed by background alerts.
pub fn base_context(flash_messages: &IncomingFlashMessages, pending: Vec<PendingAlert>) -> Context {
    let mut alerts = flash_messages
        .iter()
        .map(|f| (f.content().to_string(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    alerts.extend(
        pending
            .into_iter()
            .map(|alert| (alert.message, pending_level_to_str(alert.level))),
    );

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .finish()
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok().content_type("text/html").body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
