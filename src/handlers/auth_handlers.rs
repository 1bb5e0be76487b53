use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;

use crate::api;
use crate::auth::{password, session};
use crate::db::DbPool;
use crate::errors::AppError;
use crate::models::{user, workspace};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
    pub workspace_name: String,
}

/// POST /api/v1/auth/login
pub async fn login(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let email = body.email.trim();
    if email.is_empty() || body.password.is_empty() {
        return Err(AppError::validation("Email and password are required"));
    }

    let found = user::find_by_email(&pool, email).await?;
    match found {
        Some(u) if password::verify_password(&body.password, &u.password_hash) => {
            session::log_in(&session, u.id, &u.email);
            Ok(api::ok(json!({ "user_id": u.id, "email": u.email })))
        }
        // Same response for unknown email and wrong password.
        _ => Err(AppError::validation("Invalid email or password")),
    }
}

/// POST /api/v1/auth/signup — creates the user plus their first workspace
/// with an owner membership.
pub async fn signup(
    pool: web::Data<DbPool>,
    session: Session,
    body: web::Json<SignupRequest>,
) -> Result<HttpResponse, AppError> {
    let email = body.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::invalid_field("email", "A valid email is required"));
    }
    if body.password.len() < 8 {
        return Err(AppError::invalid_field(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    let workspace_name = body.workspace_name.trim();
    if workspace_name.is_empty() {
        return Err(AppError::invalid_field(
            "workspace_name",
            "Workspace name is required",
        ));
    }

    if user::find_by_email(&pool, email).await?.is_some() {
        return Err(AppError::invalid_field("email", "Email is already in use"));
    }

    let hash = password::hash_password(&body.password)?;
    let user_id = user::create(&pool, email, &hash, body.display_name.trim()).await?;
    let workspace_id = workspace::create(&pool, workspace_name).await?;
    workspace::add_member(&pool, workspace_id, user_id, "owner").await?;

    session::log_in(&session, user_id, email);
    Ok(api::ok(json!({
        "user_id": user_id,
        "workspace_id": workspace_id,
    })))
}

/// POST /api/v1/auth/logout
pub async fn logout(session: Session) -> Result<HttpResponse, AppError> {
    session::log_out(&session);
    Ok(api::ok(json!({})))
}
