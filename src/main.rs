use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{App, HttpServer, cookie::Key, middleware, web};

use propdeck::db;
use propdeck::handlers::{
    auth_handlers, block_handlers, content_handlers, proposal_handlers, public_handlers,
    publish_handlers,
};
use propdeck::revalidate::Revalidator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    std::fs::create_dir_all("data").expect("Failed to create data directory");

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:data/app.db".to_string());
    let pool = db::init_pool(&database_url)
        .await
        .expect("Failed to open database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // Session encryption key — load from SESSION_KEY for sessions that
    // survive restarts.
    let secret_key = match std::env::var("SESSION_KEY") {
        Ok(val) if val.len() >= 64 => {
            log::info!("Using SESSION_KEY from environment");
            Key::from(val.as_bytes())
        }
        Ok(val) => {
            log::warn!(
                "SESSION_KEY too short ({} bytes, need 64+) — generating random key",
                val.len()
            );
            Key::generate()
        }
        Err(_) => {
            log::warn!("No SESSION_KEY set — generating random key (sessions lost on restart)");
            Key::generate()
        }
    };

    let revalidator = Revalidator::new();
    // Stale-path consumer. A frontend deployment would call its
    // revalidation webhook here; standalone we just log the paths.
    let mut stale_rx = revalidator.subscribe();
    actix_web::rt::spawn(async move {
        while let Ok(path) = stale_rx.recv().await {
            log::info!("Cache revalidation requested for {path}");
        }
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    log::info!("Starting server at http://{bind_addr}");

    HttpServer::new(move || {
        let session_mw =
            SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                .cookie_secure(false)
                .cookie_http_only(true)
                .build();

        App::new()
            .wrap(session_mw)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(revalidator.clone()))
            // Public viewer — reads snapshots only, no session required
            .route("/p/{slug}", web::get().to(public_handlers::view))
            .service(
                web::scope("/api/v1")
                    // Auth
                    .route("/auth/login", web::post().to(auth_handlers::login))
                    .route("/auth/signup", web::post().to(auth_handlers::signup))
                    .route("/auth/logout", web::post().to(auth_handlers::logout))
                    // Block type picker
                    .route("/block-types", web::get().to(block_handlers::list_block_types))
                    // Content library
                    .route(
                        "/workspaces/{id}/cases",
                        web::get().to(content_handlers::list_cases),
                    )
                    .route(
                        "/workspaces/{id}/cases",
                        web::post().to(content_handlers::create_case),
                    )
                    .route("/cases/{id}", web::patch().to(content_handlers::update_case))
                    .route(
                        "/cases/{id}",
                        web::delete().to(content_handlers::delete_case),
                    )
                    .route(
                        "/workspaces/{id}/faq-items",
                        web::get().to(content_handlers::list_faq_items),
                    )
                    .route(
                        "/workspaces/{id}/faq-items",
                        web::post().to(content_handlers::create_faq_item),
                    )
                    .route(
                        "/faq-items/{id}",
                        web::patch().to(content_handlers::update_faq_item),
                    )
                    .route(
                        "/faq-items/{id}",
                        web::delete().to(content_handlers::delete_faq_item),
                    )
                    .route(
                        "/workspaces/{id}/brand",
                        web::get().to(content_handlers::get_brand),
                    )
                    .route(
                        "/workspaces/{id}/brand",
                        web::put().to(content_handlers::put_brand),
                    )
                    // Proposals
                    .route(
                        "/workspaces/{id}/proposals",
                        web::post().to(proposal_handlers::create),
                    )
                    .route(
                        "/workspaces/{id}/proposals",
                        web::get().to(proposal_handlers::list),
                    )
                    .route("/proposals/{id}", web::get().to(proposal_handlers::detail))
                    .route("/proposals/{id}", web::patch().to(proposal_handlers::rename))
                    .route(
                        "/proposals/{id}",
                        web::delete().to(proposal_handlers::delete),
                    )
                    .route(
                        "/proposals/{id}/status",
                        web::post().to(proposal_handlers::update_status),
                    )
                    // Blocks — reorder BEFORE the catch-all block routes
                    .route(
                        "/proposals/{id}/blocks/reorder",
                        web::post().to(block_handlers::reorder),
                    )
                    .route(
                        "/proposals/{id}/blocks",
                        web::post().to(block_handlers::create),
                    )
                    .route(
                        "/proposals/{id}/blocks",
                        web::get().to(block_handlers::list),
                    )
                    .route("/blocks/{id}", web::get().to(block_handlers::get))
                    .route("/blocks/{id}", web::patch().to(block_handlers::update))
                    .route("/blocks/{id}", web::delete().to(block_handlers::delete))
                    .route(
                        "/blocks/{id}/duplicate",
                        web::post().to(block_handlers::duplicate),
                    )
                    // Publish
                    .route(
                        "/proposals/{id}/publish",
                        web::post().to(publish_handlers::publish),
                    ),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
