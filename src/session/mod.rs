//! Cookie-backed session store.
//!
//! All session state round-trips through the client as a signed token; the
//! server keeps nothing. The token is an HS256-signed serialization of the
//! session's key/value map plus an expiry stamp. Reads fail closed: a
//! missing, tampered, or expired cookie yields an empty session, never an
//! error, so an invalid session is indistinguishable from being logged out.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::Settings;
use crate::error::AppError;

/// The one key the application stores in a session.
pub const USER_ID_KEY: &str = "userId";

/// Opaque per-request key/value state carried by the client.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    data: HashMap<String, String>,
}

impl Session {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn unset(&mut self, key: &str) -> Option<String> {
        self.data.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    data: HashMap<String, String>,
    exp: i64,
    iat: i64,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub cookie_name: String,
    pub secret: String,
    /// Time-to-live from creation, in seconds.
    pub max_age_seconds: i64,
    /// Transmit only over encrypted transport. Enabled in production.
    pub secure: bool,
}

#[derive(Clone)]
pub struct SessionStore {
    options: SessionOptions,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SessionStore {
    pub fn new(options: SessionOptions) -> Self {
        let encoding_key = EncodingKey::from_secret(options.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(options.secret.as_bytes());
        Self {
            options,
            encoding_key,
            decoding_key,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(SessionOptions {
            cookie_name: settings.session.cookie_name.clone(),
            secret: settings.session.secret.clone(),
            max_age_seconds: settings.session.max_age_seconds,
            secure: settings.is_production(),
        })
    }

    pub fn cookie_name(&self) -> &str {
        &self.options.cookie_name
    }

    pub fn new_session(&self) -> Session {
        Session::default()
    }

    /// Verifies and deserializes a raw cookie value. Fails closed to an
    /// empty session on anything missing, unverifiable, or expired.
    pub fn read_session(&self, raw_value: Option<&str>) -> Session {
        let Some(raw) = raw_value else {
            return Session::default();
        };

        match decode::<SessionClaims>(
            raw,
            &self.decoding_key,
            &Validation::new(Algorithm::HS256),
        ) {
            Ok(token) => Session {
                data: token.claims.data,
            },
            Err(_) => Session::default(),
        }
    }

    /// Extracts the session cookie from a request and reads it.
    pub fn session_from_request(&self, req: &HttpRequest) -> Session {
        let cookie = req.cookie(&self.options.cookie_name);
        self.read_session(cookie.as_ref().map(|c| c.value()))
    }

    /// Signs and serializes a session into a `Set-Cookie`-ready cookie.
    pub fn commit_session(&self, session: &Session) -> Result<Cookie<'static>, AppError> {
        let now = Utc::now();
        let claims = SessionClaims {
            data: session.data.clone(),
            exp: (now + Duration::seconds(self.options.max_age_seconds)).timestamp(),
            iat: now.timestamp(),
        };

        let value = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalError(format!("Failed to sign session: {}", e)))?;

        Ok(self.build_cookie(value, CookieDuration::seconds(self.options.max_age_seconds)))
    }

    /// Produces a cookie that clears the client's session immediately.
    pub fn destroy_session(&self) -> Cookie<'static> {
        self.build_cookie(String::new(), CookieDuration::ZERO)
    }

    fn build_cookie(&self, value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build(self.options.cookie_name.clone(), value)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.options.secure)
            .max_age(max_age)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> SessionStore {
        SessionStore::new(SessionOptions {
            cookie_name: "RJ_session".to_string(),
            secret: "test_secret".to_string(),
            max_age_seconds: 60 * 60 * 24 * 30,
            secure: false,
        })
    }

    #[test]
    fn test_round_trip() {
        let store = test_store();
        let mut session = store.new_session();
        session.set(USER_ID_KEY, "u1");

        let cookie = store.commit_session(&session).unwrap();
        let restored = store.read_session(Some(cookie.value()));

        assert_eq!(restored.get(USER_ID_KEY), Some("u1"));
    }

    #[test]
    fn test_new_session_is_empty() {
        let store = test_store();
        assert!(store.new_session().is_empty());
    }

    #[test]
    fn test_missing_cookie_reads_empty() {
        let store = test_store();
        assert!(store.read_session(None).is_empty());
    }

    #[test]
    fn test_tampered_value_reads_empty() {
        let store = test_store();
        let mut session = store.new_session();
        session.set(USER_ID_KEY, "u1");

        let cookie = store.commit_session(&session).unwrap();
        let mut tampered = cookie.value().to_string();
        tampered.push('x');

        assert!(store.read_session(Some(&tampered)).is_empty());
    }

    #[test]
    fn test_wrong_secret_reads_empty() {
        let store = test_store();
        let mut session = store.new_session();
        session.set(USER_ID_KEY, "u1");
        let cookie = store.commit_session(&session).unwrap();

        let other = SessionStore::new(SessionOptions {
            cookie_name: "RJ_session".to_string(),
            secret: "another_secret".to_string(),
            max_age_seconds: 60,
            secure: false,
        });

        assert!(other.read_session(Some(cookie.value())).is_empty());
    }

    #[test]
    fn test_expired_session_reads_empty() {
        let store = test_store();

        // Sign claims that expired an hour ago, bypassing commit_session.
        let now = Utc::now();
        let mut data = HashMap::new();
        data.insert(USER_ID_KEY.to_string(), "u1".to_string());
        let claims = SessionClaims {
            data,
            exp: (now - Duration::hours(1)).timestamp(),
            iat: (now - Duration::hours(2)).timestamp(),
        };
        let value = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test_secret"),
        )
        .unwrap();

        assert!(store.read_session(Some(&value)).is_empty());
    }

    #[test]
    fn test_destroy_session_clears_cookie() {
        let store = test_store();
        let cookie = store.destroy_session();

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
        assert!(store.read_session(Some(cookie.value())).is_empty());
    }

    #[test]
    fn test_cookie_attributes() {
        let store = test_store();
        let session = store.new_session();
        let cookie = store.commit_session(&session).unwrap();

        assert_eq!(cookie.name(), "RJ_session");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(
            cookie.max_age(),
            Some(CookieDuration::seconds(2_592_000))
        );
    }

    #[test]
    fn test_secure_flag_in_production() {
        let store = SessionStore::new(SessionOptions {
            cookie_name: "RJ_session".to_string(),
            secret: "test_secret".to_string(),
            max_age_seconds: 60,
            secure: true,
        });
        let cookie = store.commit_session(&store.new_session()).unwrap();
        assert_eq!(cookie.secure(), Some(true));
    }
}
