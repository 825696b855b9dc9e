//! Application state and request middleware.

#![allow(missing_docs)]

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use classifieds_common::{AppError, Config, IdGenerator};
use classifieds_core::{AdService, CatService, CommentService, FavoriteService, UserService};
use classifieds_db::repositories::{
    AdRepository, BreedRepository, CatRepository, CommentRepository, FavRepository,
    TagRepository, UserRepository,
};
use sea_orm::DatabaseConnection;
use tracing::warn;

use crate::extractors::Credentials;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Cookie carrying the CSRF token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header that must echo the CSRF cookie on unsafe requests.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub user_service: UserService,
    pub ad_service: AdService,
    pub comment_service: CommentService,
    pub favorite_service: FavoriteService,
    pub cat_service: CatService,
}

impl AppState {
    /// Wire repositories and services over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: Config) -> Self {
        let user_repo = UserRepository::new(Arc::clone(&db));
        let ad_repo = AdRepository::new(Arc::clone(&db));
        let comment_repo = CommentRepository::new(Arc::clone(&db));
        let fav_repo = FavRepository::new(Arc::clone(&db));
        let tag_repo = TagRepository::new(Arc::clone(&db));
        let cat_repo = CatRepository::new(Arc::clone(&db));
        let breed_repo = BreedRepository::new(db);

        Self {
            config: Arc::new(config),
            user_service: UserService::new(user_repo.clone()),
            ad_service: AdService::new(
                ad_repo.clone(),
                comment_repo.clone(),
                fav_repo.clone(),
                tag_repo,
                user_repo,
            ),
            comment_service: CommentService::new(comment_repo, ad_repo.clone()),
            favorite_service: FavoriteService::new(fav_repo, ad_repo),
            cat_service: CatService::new(cat_repo, breed_repo),
        }
    }

    /// Session cookie for `token`.
    #[must_use]
    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.security.secure_cookies)
            .build()
    }
}

/// Authentication middleware.
///
/// Resolves the user from an `Authorization: Bearer` header or, failing
/// that, from the session cookie. Unknown tokens leave the request anonymous.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);

    let (token, credentials) = match bearer {
        Some(token) => (Some(token), Credentials::Bearer),
        None => (
            jar.get(SESSION_COOKIE).map(|c| c.value().to_string()),
            Credentials::Session,
        ),
    };

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        match state.user_service.authenticate_by_token(&token).await {
            Ok(Some(user)) => {
                req.extensions_mut().insert(user);
                req.extensions_mut().insert(credentials);
            }
            Ok(None) => {}
            Err(e) => return e.into_response(),
        }
    }

    next.run(req).await
}

/// CSRF middleware.
///
/// Double-submit check: unsafe requests must repeat the `csrftoken` cookie
/// in the `X-CSRF-Token` header. Bearer-authenticated requests carry no
/// ambient credentials and skip the check. Responses to requests without
/// the cookie set one.
pub async fn csrf_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    req: Request<Body>,
    next: Next,
) -> Response {
    let cookie_token = jar
        .get(CSRF_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty());

    let bearer = req.extensions().get::<Credentials>() == Some(&Credentials::Bearer);
    if is_unsafe(req.method()) && !bearer {
        let header_token = req
            .headers()
            .get(CSRF_HEADER)
            .and_then(|value| value.to_str().ok());

        let verified = matches!(
            (cookie_token.as_deref(), header_token),
            (Some(cookie), Some(header)) if cookie == header
        );
        if !verified {
            warn!(
                method = %req.method(),
                path = %req.uri().path(),
                cookie_present = cookie_token.is_some(),
                "CSRF verification failed"
            );
            return AppError::Forbidden("CSRF verification failed".to_string()).into_response();
        }
    }

    let response = next.run(req).await;
    if cookie_token.is_some() {
        return response;
    }

    let cookie = Cookie::build((CSRF_COOKIE, IdGenerator::new().generate_token()))
        .path("/")
        .same_site(SameSite::Lax)
        .secure(state.config.security.secure_cookies)
        .build();
    (jar.add(cookie), response).into_response()
}

fn is_unsafe(method: &Method) -> bool {
    !matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}
