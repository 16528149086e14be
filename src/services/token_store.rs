use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::config::AuthConfig;
use crate::models::TokenPair;

pub const ACCESS_COOKIE: &str = "google_access_token";
pub const REFRESH_COOKIE: &str = "google_refresh_token";

/// Cookie-backed bearer token storage.
///
/// Jar in, jar out: callers thread the request's `CookieJar` through and
/// return the result with the response, so there is no ambient token
/// state to reason about in tests.
pub struct TokenStore;

impl TokenStore {
    /// Persist the access token, and the refresh token when the pair
    /// carries one (refresh-grant responses usually do not)
    pub fn save(jar: CookieJar, tokens: &TokenPair, auth: &AuthConfig) -> CookieJar {
        let access = Cookie::build((ACCESS_COOKIE, tokens.access_token.clone()))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(auth.cookie_secure)
            .path("/")
            .max_age(time::Duration::seconds(auth.access_token_ttl_secs as i64))
            .build();
        let mut jar = jar.add(access);

        if let Some(refresh_token) = tokens.refresh_token.as_ref() {
            let refresh = Cookie::build((REFRESH_COOKIE, refresh_token.clone()))
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(auth.cookie_secure)
                .path("/")
                .max_age(time::Duration::days(auth.refresh_token_ttl_days as i64))
                .build();
            jar = jar.add(refresh);
        }

        jar
    }

    /// Current access token, or `None` when the session is
    /// unauthenticated
    pub fn read(jar: &CookieJar) -> Option<String> {
        jar.get(ACCESS_COOKIE).map(|c| c.value().to_string())
    }

    pub fn read_refresh(jar: &CookieJar) -> Option<String> {
        jar.get(REFRESH_COOKIE).map(|c| c.value().to_string())
    }

    /// Remove both tokens. Idempotent: clearing an empty jar is fine.
    pub fn clear(jar: CookieJar, auth: &AuthConfig) -> CookieJar {
        jar.remove(Self::removal_cookie(ACCESS_COOKIE, auth))
            .remove(Self::removal_cookie(REFRESH_COOKIE, auth))
    }

    // Removal must carry the same attributes the cookie was set with
    fn removal_cookie(name: &'static str, auth: &AuthConfig) -> Cookie<'static> {
        Cookie::build((name, ""))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(auth.cookie_secure)
            .path("/")
            .build()
    }
}
