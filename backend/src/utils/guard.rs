// src/utils/guard.rs

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::config::TOKEN_COOKIE_NAME;

pub const LOGIN_PATH: &str = "/";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Page paths that require a session cookie. Sub-paths are covered too.
const PROTECTED_PATHS: [&str; 3] = ["/dashboard", "/exam", "/results"];

fn is_api(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

fn is_protected(path: &str) -> bool {
    PROTECTED_PATHS.iter().any(|prefix| {
        path == *prefix
            || path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Axum Middleware: page route guard.
///
/// Only checks that a non-empty session cookie is present; the token itself is
/// verified by the API endpoints. API paths are never redirected.
pub async fn route_guard(jar: CookieJar, req: Request<Body>, next: Next) -> Response {
    let path = req.uri().path().to_owned();

    if is_api(&path) {
        return next.run(req).await;
    }

    let has_session = jar
        .get(TOKEN_COOKIE_NAME)
        .is_some_and(|cookie| !cookie.value().is_empty());

    if is_protected(&path) && !has_session {
        tracing::debug!("No session cookie for {}, redirecting to login", path);
        // Clears a stale (e.g. empty) cookie if the browser sent one.
        let jar = jar.remove(Cookie::build(TOKEN_COOKIE_NAME).path("/"));
        return (jar, Redirect::temporary(LOGIN_PATH)).into_response();
    }

    if path == LOGIN_PATH && has_session {
        return Redirect::temporary(DASHBOARD_PATH).into_response();
    }

    next.run(req).await
}
