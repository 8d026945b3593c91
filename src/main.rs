use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use civic_meetings::config::AppConfig;
use civic_meetings::{db, handlers};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {e}");
        std::io::Error::other(e.to_string())
    })?;

    let pool = db::init_pool(&config.database_url).await.map_err(|e| {
        log::error!("Failed to connect to database: {e}");
        std::io::Error::other(e.to_string())
    })?;
    db::run_migrations(&pool).await.map_err(|e| {
        log::error!("Failed to run migrations: {e}");
        std::io::Error::other(e.to_string())
    })?;

    // Session encryption key; a generated key does not survive restarts
    let secret_key = match config.session_key.as_deref() {
        Some(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Some(val) => {
            log::warn!("SESSION_KEY too short ({} bytes, need 64+), generating random key", val.len());
            Key::generate()
        }
        None => {
            log::warn!("No SESSION_KEY set, generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let locales = web::Data::new(config.locales.clone());
    let geocoding = web::Data::new(config.geocoding.clone());
    if config.geocoding.endpoint.is_none() {
        log::info!("No GEOCODING_URL set, meeting coordinates stay empty");
    }
    log::info!(
        "Starting server at http://{} (locales: {})",
        config.bind_addr,
        config.locales.available.join(", ")
    );

    HttpServer::new(move || {
        let session_mw = SessionMiddleware::builder(
            CookieSessionStore::default(),
            secret_key.clone(),
        )
        .cookie_secure(false)
        .cookie_http_only(true)
        .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(locales.clone())
            .app_data(geocoding.clone())
            .configure(handlers::meeting_handlers::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                actix_web::HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
