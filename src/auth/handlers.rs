use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::error::{AppError, DatabaseError};
use crate::AppState;

/// Default landing spot after login when no `redirectTo` was carried.
const DEFAULT_REDIRECT: &str = "/jokes";

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

fn validate_username(username: &str) -> Option<String> {
    if username.chars().count() < 3 {
        return Some("Usernames must be at least 3 characters long".to_string());
    }
    None
}

fn validate_password(password: &str) -> Option<String> {
    if password.chars().count() < 6 {
        return Some("Passwords must be at least 6 characters long".to_string());
    }
    None
}

/// Field checks shared by login and register, as one form serves both
/// actions. Returns the error response to send, if any.
fn check_credential_fields(username: &str, password: &str) -> Option<HttpResponse> {
    let username_error = validate_username(username);
    let password_error = validate_password(password);
    if username_error.is_none() && password_error.is_none() {
        return None;
    }

    Some(HttpResponse::BadRequest().json(json!({
        "fieldErrors": {
            "username": username_error,
            "password": password_error,
        },
        "fields": { "username": username },
    })))
}

/// Minimal login prompt. Rendering is the client's business; this keeps the
/// redirect target resolvable and echoes where login should return to.
pub async fn login_page(query: web::Query<LoginQuery>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Log in to continue",
        "redirectTo": query.redirect_to.as_deref().unwrap_or(DEFAULT_REDIRECT),
    }))
}

pub async fn login(
    form: web::Form<CredentialsForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let (Some(username), Some(password)) = (form.username, form.password) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "formError": "Form not submitted correctly."
        })));
    };
    let redirect_to = form
        .redirect_to
        .unwrap_or_else(|| DEFAULT_REDIRECT.to_string());

    if let Some(response) = check_credential_fields(&username, &password) {
        return Ok(response);
    }

    match state.auth.login(&username, &password).await? {
        Some(user) => {
            info!("Login successful for username: {}", username);
            state.auth.create_user_session(user.id, &redirect_to)
        }
        None => {
            // One message for both failed factors; do not reveal which.
            warn!("Login failed for username: {}", username);
            Ok(HttpResponse::BadRequest().json(json!({
                "formError": "Username/Password combination is incorrect",
                "fields": { "username": username },
            })))
        }
    }
}

pub async fn register(
    form: web::Form<CredentialsForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let (Some(username), Some(password)) = (form.username, form.password) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "formError": "Form not submitted correctly."
        })));
    };
    let redirect_to = form
        .redirect_to
        .unwrap_or_else(|| DEFAULT_REDIRECT.to_string());

    if let Some(response) = check_credential_fields(&username, &password) {
        return Ok(response);
    }

    match state.auth.register(&username, &password).await {
        Ok(user) => {
            info!("Registration successful for username: {}", username);
            state.auth.create_user_session(user.id, &redirect_to)
        }
        Err(AppError::DatabaseError(DatabaseError::Duplicate)) => {
            warn!("Registration rejected, username taken: {}", username);
            Ok(HttpResponse::Conflict().json(json!({
                "formError": format!("User with username {} already exists", username),
                "fields": { "username": username },
            })))
        }
        Err(e) => {
            error!("Registration failed for username: {}: {}", username, e);
            Err(e)
        }
    }
}

pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    state.auth.logout()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("ab").is_some());
        assert!(validate_username("kody").is_none());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("12345").is_some());
        assert!(validate_password("twixrox").is_none());
    }
}
