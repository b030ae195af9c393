mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test::TestRequest;
use common::{session_cookie_for, test_state};
use jokes_server::error::{AppError, DatabaseError};
use jokes_server::session::USER_ID_KEY;
use jokes_server::AuthCheck;
use uuid::Uuid;

#[actix_web::test]
async fn test_password_hash_round_trip() {
    let hash = bcrypt::hash("twixrox", 4).unwrap();
    assert!(bcrypt::verify("twixrox", &hash).unwrap());
    assert!(!bcrypt::verify("twixroxx", &hash).unwrap());
    // The stored value is a derived hash, never the password itself
    assert_ne!(hash, "twixrox");
}

#[actix_web::test]
async fn test_register_then_login() {
    let (state, _store) = test_state();

    let user = state.auth.register("kody", "twixrox").await.unwrap();
    assert_eq!(user.username, "kody");
    assert_ne!(user.password_hash, "twixrox");

    let logged_in = state.auth.login("kody", "twixrox").await.unwrap();
    assert_eq!(logged_in.map(|u| u.id), Some(user.id));
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
    let (state, _store) = test_state();
    state.auth.register("kody", "twixrox").await.unwrap();

    // Unknown username and wrong password both come back as a plain None
    let unknown = state.auth.login("nobody", "twixrox").await.unwrap();
    let wrong_password = state.auth.login("kody", "hunter2").await.unwrap();
    assert!(unknown.is_none());
    assert!(wrong_password.is_none());
}

#[actix_web::test]
async fn test_duplicate_username_is_a_conflict() {
    let (state, _store) = test_state();
    state.auth.register("kody", "twixrox").await.unwrap();

    match state.auth.register("kody", "different").await {
        Err(AppError::DatabaseError(DatabaseError::Duplicate)) => (),
        other => panic!(
            "Expected duplicate conflict, got {:?}",
            other.map(|u| u.username)
        ),
    }
}

#[actix_web::test]
async fn test_create_user_session_sets_cookie_and_redirects() {
    let (state, _store) = test_state();
    let user_id = Uuid::new_v4();

    let resp = state
        .auth
        .create_user_session(user_id, "/jokes/new")
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/jokes/new"
    );

    let cookie = resp
        .cookies()
        .find(|c| c.name() == "RJ_session")
        .expect("session cookie missing");
    let session = state.auth.sessions().read_session(Some(cookie.value()));
    assert_eq!(session.get(USER_ID_KEY), Some(user_id.to_string().as_str()));
}

#[actix_web::test]
async fn test_logout_clears_cookie_and_redirects_to_login() {
    let (state, _store) = test_state();

    let resp = state.auth.logout();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");

    let cookie = resp
        .cookies()
        .find(|c| c.name() == "RJ_session")
        .expect("clearing cookie missing");
    assert_eq!(cookie.value(), "");
    assert!(state
        .auth
        .sessions()
        .read_session(Some(cookie.value()))
        .is_empty());
}

#[actix_web::test]
async fn test_require_user_id_round_trip() {
    let (state, _store) = test_state();
    let user = state.auth.register("kody", "twixrox").await.unwrap();

    let anonymous = TestRequest::get().uri("/jokes/new").to_http_request();
    assert_eq!(
        state.auth.require_user_id(&anonymous, None),
        AuthCheck::RedirectRequired("/login?redirectTo=%2Fjokes%2Fnew".to_string())
    );

    let cookie = session_cookie_for(&state, user.id);
    let authed = TestRequest::get()
        .uri("/jokes/new")
        .cookie(cookie)
        .to_http_request();
    assert_eq!(
        state.auth.require_user_id(&authed, None),
        AuthCheck::Authorized(user.id)
    );
}

#[actix_web::test]
async fn test_get_user_resolves_session() {
    let (state, store) = test_state();
    let user = state.auth.register("kody", "twixrox").await.unwrap();
    let cookie = session_cookie_for(&state, user.id);

    let req = TestRequest::get().cookie(cookie.clone()).to_http_request();
    let found = state.auth.get_user(&req).await.unwrap();
    assert_eq!(found.map(|u| u.username), Some("kody".to_string()));

    // Same session after the user is gone: the session is invalid, the
    // caller is expected to force a logout
    store.remove_user(user.id);
    let req = TestRequest::get().cookie(cookie).to_http_request();
    match state.auth.get_user(&req).await {
        Err(AppError::AuthError(jokes_server::error::AuthError::SessionInvalid)) => (),
        other => panic!(
            "Expected SessionInvalid, got {:?}",
            other.map(|u| u.map(|u| u.username))
        ),
    }
}
