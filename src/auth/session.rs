use actix_session::Session;

use crate::errors::AppError;

pub fn get_user_id(session: &Session) -> Option<i64> {
    session.get::<i64>("user_id").unwrap_or(None)
}

/// Every mutating operation requires an identity; a missing one maps to
/// the `authentication` error kind.
pub fn require_user(session: &Session) -> Result<i64, AppError> {
    get_user_id(session).ok_or(AppError::Authentication)
}

pub fn log_in(session: &Session, user_id: i64, email: &str) {
    let _ = session.insert("user_id", user_id);
    let _ = session.insert("email", email);
}

pub fn log_out(session: &Session) {
    session.purge();
}
