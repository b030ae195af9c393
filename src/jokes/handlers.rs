use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::AuthCheck;
use crate::db::operations::NewJoke;
use crate::error::{AppError, AuthError, DatabaseError};
use crate::jokes::validation::{validate_joke_content, validate_joke_name};
use crate::AppState;

/// How many jokes the index lists.
const LIST_LIMIT: i64 = 5;

#[derive(Debug, Deserialize)]
pub struct NewJokeForm {
    pub name: Option<String>,
    pub content: Option<String>,
}

/// Newest jokes plus the current user, if any. A session that no longer
/// resolves to a user gets a forced logout instead of an error page.
pub async fn list_jokes(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = match state.auth.get_user(&req).await {
        Ok(user) => user,
        Err(AppError::AuthError(AuthError::SessionInvalid)) => {
            warn!("Session referenced an unknown user, forcing logout");
            return Ok(state.auth.logout());
        }
        Err(e) => return Err(e),
    };

    let joke_list_items = state.jokes.list_jokes(LIST_LIMIT).await?;

    Ok(HttpResponse::Ok().json(json!({
        "jokeListItems": joke_list_items,
        "user": user,
    })))
}

pub async fn get_joke(
    joke_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let joke = state
        .jokes
        .get_joke_by_id(*joke_id)
        .await?
        .ok_or(AppError::DatabaseError(DatabaseError::NotFound))?;

    Ok(HttpResponse::Ok().json(json!({ "joke": joke })))
}

/// Page view behind the auth guard: anonymous visitors are sent to login
/// with this path as the return target.
pub async fn new_joke_page(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    match state.auth.require_user_id(&req, None) {
        AuthCheck::Authorized(_) => HttpResponse::Ok().json(json!({
            "message": "Add your own hilarious joke"
        })),
        AuthCheck::RedirectRequired(location) => HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish(),
    }
}

/// Data-mutation action: anonymous callers get a 401 status, not the login
/// redirect a page view would get.
pub async fn create_joke(
    req: HttpRequest,
    form: web::Form<NewJokeForm>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let Some(user_id) = state.auth.get_user_id(&req) else {
        warn!("Unauthenticated joke submission rejected");
        return Err(AuthError::Unauthorized.into());
    };

    // Should be unreachable under normal form submission.
    let form = form.into_inner();
    let (Some(name), Some(content)) = (form.name, form.content) else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "formError": "Form not submitted correctly."
        })));
    };

    let name_error = validate_joke_name(&name);
    let content_error = validate_joke_content(&content);
    if name_error.is_some() || content_error.is_some() {
        // Echo the submitted values so the form can be redisplayed prefilled.
        return Ok(HttpResponse::BadRequest().json(json!({
            "fieldErrors": {
                "name": name_error,
                "content": content_error,
            },
            "fields": {
                "name": name,
                "content": content,
            },
        })));
    }

    let joke = state
        .jokes
        .create_joke(NewJoke {
            name,
            content,
            jokester_id: user_id,
        })
        .await?;

    info!("Joke {} created by user {}", joke.id, user_id);

    // Create-then-redirect so a refresh cannot resubmit.
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, format!("/jokes/{}", joke.id)))
        .finish())
}
