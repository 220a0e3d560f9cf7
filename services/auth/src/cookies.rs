//! Session cookies carried alongside the JSON token pair

use axum_extra::extract::cookie::{Cookie, CookieJar};

use crate::session::TokenPair;

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .path("/")
        .build()
}

/// Set both token cookies from a freshly issued pair
pub fn set_session_cookies(jar: CookieJar, pair: &TokenPair) -> CookieJar {
    jar.add(session_cookie(ACCESS_TOKEN_COOKIE, pair.access_token.clone()))
        .add(session_cookie(REFRESH_TOKEN_COOKIE, pair.refresh_token.clone()))
}

/// Expire both token cookies on the client
pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    let mut access = session_cookie(ACCESS_TOKEN_COOKIE, String::new());
    access.make_removal();
    let mut refresh = session_cookie(REFRESH_TOKEN_COOKIE, String::new());
    refresh.make_removal();

    jar.add(access).add(refresh)
}
