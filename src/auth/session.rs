//! Session cookie transport.
//!
//! Production serves the client from another origin, so the cookie is
//! `Secure; SameSite=None` there and `SameSite=Strict` over plain HTTP in
//! development. Clearing is client-side only; the token stays valid until
//! expiry.

use cookie::{Cookie, SameSite};

/// Name of the session cookie.
pub const TOKEN_COOKIE: &str = "token";

/// Build the `Set-Cookie` value carrying a freshly issued token.
pub fn issue_cookie(token: &str, production: bool) -> Cookie<'static> {
    let same_site = if production {
        SameSite::None
    } else {
        SameSite::Strict
    };

    Cookie::build((TOKEN_COOKIE, token.to_owned()))
        .path("/")
        .http_only(true)
        .secure(production)
        .same_site(same_site)
        .build()
}

/// Build the `Set-Cookie` value that expires the session cookie now.
/// Attributes must match [`issue_cookie`] or browsers keep the original.
pub fn clear_cookie(production: bool) -> Cookie<'static> {
    let mut cookie = issue_cookie("", production);
    cookie.set_max_age(cookie::time::Duration::ZERO);
    cookie
}
