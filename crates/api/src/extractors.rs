//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts, response::Response};
use classifieds_db::entities::user;

use crate::response::found;

/// Login entry point unauthenticated requests are sent to.
pub const LOGIN_PATH: &str = "/accounts/login/";

/// How the current request was authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credentials {
    /// `Authorization: Bearer` header.
    Bearer,
    /// Session cookie, sent by the browser on its own.
    Session,
}

/// Authenticated user extractor.
///
/// Rejects with a redirect to the login page that brings the user back to
/// the requested path.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by auth middleware
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                let next = parts
                    .uri
                    .path_and_query()
                    .map_or_else(|| parts.uri.path(), |pq| pq.as_str());
                found(&login_redirect(next))
            })
    }
}

/// Optional authenticated user extractor.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}

/// Login URL returning to `next` afterwards. `next` is percent-encoded
/// except for its slashes.
#[must_use]
pub fn login_redirect(next: &str) -> String {
    let next = urlencoding::encode(next).replace("%2F", "/");
    format!("{LOGIN_PATH}?next={next}")
}

/// `next` if it is a path on this site, `fallback` otherwise.
#[must_use]
pub fn local_redirect<'a>(next: Option<&'a str>, fallback: &'a str) -> &'a str {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') => {
            next
        }
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_keeps_path() {
        assert_eq!(
            login_redirect("/ads/ad/create"),
            "/accounts/login/?next=/ads/ad/create"
        );
    }

    #[test]
    fn test_login_redirect_encodes_query() {
        assert_eq!(
            login_redirect("/ads/?search=red bike&x=1"),
            "/accounts/login/?next=/ads/%3Fsearch%3Dred%20bike%26x%3D1"
        );
    }

    #[test]
    fn test_local_redirect_rejects_other_hosts() {
        assert_eq!(local_redirect(Some("/ads/ad/1"), "/ads/"), "/ads/ad/1");
        assert_eq!(local_redirect(Some("//evil.example"), "/ads/"), "/ads/");
        assert_eq!(local_redirect(Some("https://evil.example"), "/ads/"), "/ads/");
        assert_eq!(local_redirect(None, "/ads/"), "/ads/");
    }
}
