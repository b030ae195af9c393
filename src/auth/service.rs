use crate::db::operations::UserStore;
use crate::db::models::User;
use crate::error::{AppError, AuthError};
use crate::session::{SessionStore, USER_ID_KEY};
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;
use url::form_urlencoded;
use uuid::Uuid;

/// Outcome of the require-auth guard. Callers must match: either they have
/// a user id, or they short-circuit with the redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCheck {
    Authorized(Uuid),
    RedirectRequired(String),
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    sessions: SessionStore,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, sessions: SessionStore, bcrypt_cost: u32) -> Self {
        Self {
            users,
            sessions,
            bcrypt_cost,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Creates a user with a bcrypt-hashed password. A duplicate username
    /// propagates as `DatabaseError::Duplicate` from the storage layer's
    /// uniqueness constraint.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        let password_hash = bcrypt::hash(password, self.bcrypt_cost)?;
        let user = User::new(username.to_string(), password_hash);
        self.users.create_user(&user).await
    }

    /// Checks credentials. Returns `None` for an unknown username and for a
    /// wrong password alike; callers cannot tell which factor failed.
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<User>, AppError> {
        let Some(user) = self.users.get_user_by_username(username).await? else {
            return Ok(None);
        };

        if !bcrypt::verify(password, &user.password_hash)? {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Reads the session's user id; `None` if absent or not a valid id.
    pub fn get_user_id(&self, req: &HttpRequest) -> Option<Uuid> {
        let session = self.sessions.session_from_request(req);
        session
            .get(USER_ID_KEY)
            .and_then(|raw| Uuid::parse_str(raw).ok())
    }

    /// Require-auth-or-redirect guard for page views. The redirect carries
    /// the original path (or `redirect_to` when given) so login can return
    /// the user to it.
    pub fn require_user_id(&self, req: &HttpRequest, redirect_to: Option<&str>) -> AuthCheck {
        match self.get_user_id(req) {
            Some(user_id) => AuthCheck::Authorized(user_id),
            None => {
                let target = redirect_to.unwrap_or_else(|| req.path());
                AuthCheck::RedirectRequired(login_redirect(target))
            }
        }
    }

    /// Resolves the session's user id to a stored user. A session that no
    /// longer resolves (user deleted after issuance, or a storage failure)
    /// comes back as `SessionInvalid`; handlers answer with a forced logout.
    pub async fn get_user(&self, req: &HttpRequest) -> Result<Option<User>, AppError> {
        let Some(user_id) = self.get_user_id(req) else {
            return Ok(None);
        };

        match self.users.get_user_by_id(user_id).await {
            Ok(Some(user)) => Ok(Some(user)),
            Ok(None) | Err(_) => Err(AuthError::SessionInvalid.into()),
        }
    }

    /// Issues a fresh session for `user_id` and redirects to `redirect_to`
    /// with the signed cookie attached.
    pub fn create_user_session(
        &self,
        user_id: Uuid,
        redirect_to: &str,
    ) -> Result<HttpResponse, AppError> {
        let mut session = self.sessions.new_session();
        session.set(USER_ID_KEY, user_id.to_string());
        let cookie = self.sessions.commit_session(&session)?;

        Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, redirect_to.to_string()))
            .cookie(cookie)
            .finish())
    }

    /// Clears the session cookie and redirects to the login page.
    pub fn logout(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, "/login"))
            .cookie(self.sessions.destroy_session())
            .finish()
    }
}

/// Login-page location carrying the original path as `redirectTo`.
fn login_redirect(path: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirectTo", path)
        .finish();
    format!("/login?{}", query)
}
