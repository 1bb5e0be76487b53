//! Handler-level tests for the JSON envelope contract: success bodies are
//! `{"success": true, "data": ...}`, failures are
//! `{"success": false, "error": {"type", "message", "field_errors"?}}` with
//! the matching HTTP status per error kind.

mod common;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use propdeck::db::DbPool;
use propdeck::handlers::{auth_handlers, block_handlers, proposal_handlers};
use propdeck::revalidate::Revalidator;

macro_rules! test_app {
    ($pool:expr) => {
        test::init_service(
            App::new()
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_secure(false)
                        .build(),
                )
                .app_data(web::Data::new($pool.clone()))
                .app_data(web::Data::new(Revalidator::new()))
                .route("/api/v1/auth/signup", web::post().to(auth_handlers::signup))
                .route(
                    "/api/v1/workspaces/{id}/proposals",
                    web::post().to(proposal_handlers::create),
                )
                .route(
                    "/api/v1/proposals/{id}/blocks",
                    web::post().to(block_handlers::create),
                )
                .route("/api/v1/blocks/{id}", web::get().to(block_handlers::get)),
        )
        .await
    };
}

/// Sign up a fresh user and hand back their session cookie plus the new
/// workspace id, exercising the success envelope along the way.
macro_rules! signed_up {
    ($app:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({
                "email": "api@example.com",
                "password": "correct horse",
                "display_name": "Api Tester",
                "workspace_name": "Api Workspace",
            }))
            .to_request();
        let res = test::call_service(&$app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let cookie: Cookie<'static> = res
            .response()
            .cookies()
            .next()
            .map(|c| c.into_owned())
            .expect("signup should set a session cookie");

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], json!(true));
        let workspace_id = body["data"]["workspace_id"]
            .as_i64()
            .expect("workspace id in signup data");
        (cookie, workspace_id)
    }};
}

#[actix_rt::test]
async fn missing_session_yields_authentication_envelope() {
    let pool: DbPool = common::setup_test_db().await;
    let app = test_app!(pool);

    let req = test::TestRequest::post()
        .uri("/api/v1/proposals/1/blocks")
        .set_json(json!({"block_type": "hero"}))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["type"], "authentication");
    assert!(body["error"]["message"].is_string());
    // Empty field_errors are omitted entirely.
    assert!(body["error"].get("field_errors").is_none());
}

#[actix_rt::test]
async fn invalid_props_yield_validation_envelope_with_field_errors() {
    let pool: DbPool = common::setup_test_db().await;
    let app = test_app!(pool);
    let (cookie, workspace_id) = signed_up!(app);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/workspaces/{workspace_id}/proposals"))
        .cookie(cookie.clone())
        .set_json(json!({"title": "Acme Corp"}))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let proposal_id = body["data"]["id"].as_i64().expect("proposal id");

    // Hero props without the required title.
    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/proposals/{proposal_id}/blocks"))
        .cookie(cookie)
        .set_json(json!({"block_type": "hero", "props": {"subtitle": "no title"}}))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["type"], "validation");
    assert_eq!(body["error"]["field_errors"][0]["field"], "props");
}

#[actix_rt::test]
async fn unknown_block_yields_not_found_envelope() {
    let pool: DbPool = common::setup_test_db().await;
    let app = test_app!(pool);
    let (cookie, _) = signed_up!(app);

    let req = test::TestRequest::get()
        .uri("/api/v1/blocks/4242")
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["type"], "not_found");
    assert!(body["error"].get("field_errors").is_none());
}
