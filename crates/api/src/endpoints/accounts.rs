//! Login, signup and logout.

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use classifieds_common::{AppError, AppResult};
use classifieds_core::forms::{FormErrors, LoginForm, SignupForm};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    extractors::{AuthUser, local_redirect},
    middleware::{AppState, SESSION_COOKIE},
    response::{FormView, found},
};

const LOGIN_FAILED: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

/// Where to go after logging in.
#[derive(Debug, Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

/// Login or signup page.
#[derive(Serialize)]
pub struct AccountFormView<T: Serialize> {
    form: FormView<T>,
}

async fn login_page(Query(query): Query<NextQuery>) -> Json<AccountFormView<LoginForm>> {
    Json(AccountFormView {
        form: FormView::new(LoginForm {
            next: query.next,
            ..LoginForm::default()
        }),
    })
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let Some(user) = state
        .user_service
        .authenticate(&form.username, &form.password)
        .await?
    else {
        info!(username = %form.username, "Login failed");
        let errors = FormErrors::non_field(LOGIN_FAILED);
        return Ok(Json(AccountFormView {
            form: FormView::invalid(form, errors),
        })
        .into_response());
    };

    let token = user
        .token
        .clone()
        .ok_or_else(|| AppError::Internal("authenticated user has no token".to_string()))?;
    let target = local_redirect(form.next.as_deref(), "/ads/");

    info!(user_id = %user.id, "User logged in");
    Ok((jar.add(state.session_cookie(token)), found(target)).into_response())
}

async fn signup_page() -> Json<AccountFormView<SignupForm>> {
    Json(AccountFormView {
        form: FormView::new(SignupForm::default()),
    })
}

async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> AppResult<Response> {
    if let Err(errors) = form.clean() {
        return Ok(Json(AccountFormView {
            form: FormView::invalid(form, errors),
        })
        .into_response());
    }

    let user = match state.user_service.signup(&form).await {
        Ok(user) => user,
        Err(AppError::Conflict(message)) => {
            let mut errors = FormErrors::new();
            errors.add("username", message);
            return Ok(Json(AccountFormView {
                form: FormView::invalid(form, errors),
            })
            .into_response());
        }
        Err(e) => return Err(e),
    };

    let token = user
        .token
        .ok_or_else(|| AppError::Internal("new user has no token".to_string()))?;
    Ok((jar.add(state.session_cookie(token)), found("/ads/")).into_response())
}

async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    jar: CookieJar,
) -> AppResult<Response> {
    state.user_service.logout(&user).await?;

    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, found("/")).into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts/login/", get(login_page).post(login))
        .route("/accounts/signup/", get(signup_page).post(signup))
        .route("/accounts/logout/", post(logout))
}
