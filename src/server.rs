//! HTTP server wiring.

use std::sync::Arc;
use std::time::Duration;

use actix_files::Files;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use tera::Tera;

use crate::models::config::ServerConfig;
use crate::remote::establish_remote_client;
use crate::repository::{EventReader, RemoteRepository};
use crate::routes::dishes::{add_dish, claim_dish, delete_dish};
use crate::routes::events::{
    add_draft_dish, cancel_create_form, create_event, delete_event, select_event,
    toggle_create_form,
};
use crate::routes::main::show_index;
use crate::store::TrackerSessions;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let client = establish_remote_client(
        &server_config.remote.url,
        &server_config.remote.api_key,
        Duration::from_millis(server_config.remote.timeout_ms),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to set up remote client: {e}")))?;

    let repo = RemoteRepository::new(client);

    // Visitors load the list on their first page view; this only reports an
    // unreachable service early.
    if let Err(err) = repo.list_events().await {
        log::warn!("Remote table service is not reachable yet: {err}");
    }

    let sessions = Arc::new(TrackerSessions::new(
        server_config.draft_policy,
        Duration::from_millis(server_config.debounce_ms),
        Duration::from_secs(server_config.session_idle_secs),
    ));

    let secret_key = Key::try_from(server_config.secret.as_bytes())
        .map_err(|e| std::io::Error::other(format!("Invalid secret key: {e}")))?;

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    let app_sessions = web::Data::from(Arc::clone(&sessions));

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true behind TLS
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", &server_config.assets_dir))
            .service(show_index)
            .service(toggle_create_form)
            .service(add_draft_dish)
            .service(cancel_create_form)
            .service(create_event)
            .service(select_event)
            .service(delete_event)
            .service(add_dish)
            .service(delete_dish)
            .service(claim_dish)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(app_sessions.clone())
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await?;

    let abandoned = sessions.shutdown();
    if abandoned > 0 {
        log::info!("Cancelled {abandoned} pending claim writes on shutdown");
    }
    Ok(())
}
