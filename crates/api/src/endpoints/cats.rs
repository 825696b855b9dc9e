//! Cats and breeds catalog.
//!
//! Any logged-in user may change any row here; nothing is owner-scoped.

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
};
use classifieds_common::AppResult;
use classifieds_core::forms::{BreedForm, CatForm};
use classifieds_db::entities::breed;
use serde::Serialize;

use crate::{
    extractors::AuthUser,
    middleware::AppState,
    response::{FormView, found},
};

const CATS_PATH: &str = "/cats/";

// === Cats ===

/// A cat in the listing.
#[derive(Serialize)]
pub struct CatItem {
    id: String,
    nickname: String,
    weight: i32,
    foods: String,
    breed_id: String,
    breed: Option<String>,
}

/// Cat listing.
#[derive(Serialize)]
pub struct CatListView {
    cats: Vec<CatItem>,
    breed_count: u64,
}

async fn list_cats(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> AppResult<Json<CatListView>> {
    let (cats, breed_count) = state.cat_service.list_cats().await?;

    Ok(Json(CatListView {
        cats: cats
            .into_iter()
            .map(|(cat, breed)| CatItem {
                id: cat.id,
                nickname: cat.nickname,
                weight: cat.weight,
                foods: cat.foods,
                breed_id: cat.breed_id,
                breed: breed.map(|b| b.name),
            })
            .collect(),
        breed_count,
    }))
}

/// A selectable breed.
#[derive(Serialize)]
pub struct BreedChoice {
    id: String,
    name: String,
}

impl From<breed::Model> for BreedChoice {
    fn from(breed: breed::Model) -> Self {
        Self {
            id: breed.id,
            name: breed.name,
        }
    }
}

/// Cat create/update form.
#[derive(Serialize)]
pub struct CatFormView {
    form: FormView<CatForm>,
    breeds: Vec<BreedChoice>,
}

fn cat_form_view(form: FormView<CatForm>, breeds: Vec<breed::Model>) -> Response {
    Json(CatFormView {
        form,
        breeds: breeds.into_iter().map(BreedChoice::from).collect(),
    })
    .into_response()
}

async fn create_cat_page(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> AppResult<Response> {
    let breeds = state.cat_service.list_breeds().await?;
    Ok(cat_form_view(FormView::new(CatForm::default()), breeds))
}

async fn create_cat(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Form(form): Form<CatForm>,
) -> AppResult<Response> {
    let breeds = state.cat_service.list_breeds().await?;
    match form.clean(&breeds) {
        Ok(draft) => {
            state.cat_service.create_cat(draft).await?;
            Ok(found(CATS_PATH))
        }
        Err(errors) => Ok(cat_form_view(FormView::invalid(form, errors), breeds)),
    }
}

async fn update_cat_page(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let cat = state.cat_service.get_cat(&id).await?;
    let breeds = state.cat_service.list_breeds().await?;
    Ok(cat_form_view(FormView::new(CatForm::from_model(&cat)), breeds))
}

async fn update_cat(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
    Form(form): Form<CatForm>,
) -> AppResult<Response> {
    state.cat_service.get_cat(&id).await?;
    let breeds = state.cat_service.list_breeds().await?;
    match form.clean(&breeds) {
        Ok(draft) => {
            state.cat_service.update_cat(&id, draft).await?;
            Ok(found(CATS_PATH))
        }
        Err(errors) => Ok(cat_form_view(FormView::invalid(form, errors), breeds)),
    }
}

/// Delete confirmation for a catalog row.
#[derive(Serialize)]
pub struct DeleteView {
    id: String,
    name: String,
}

async fn delete_cat_page(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteView>> {
    let cat = state.cat_service.get_cat(&id).await?;
    Ok(Json(DeleteView {
        id: cat.id,
        name: cat.nickname,
    }))
}

async fn delete_cat(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    state.cat_service.delete_cat(&id).await?;
    Ok(found(CATS_PATH))
}

// === Breeds ===

/// Breed listing.
#[derive(Serialize)]
pub struct BreedListView {
    breeds: Vec<BreedChoice>,
}

async fn list_breeds(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> AppResult<Json<BreedListView>> {
    let breeds = state.cat_service.list_breeds().await?;
    Ok(Json(BreedListView {
        breeds: breeds.into_iter().map(BreedChoice::from).collect(),
    }))
}

/// Breed create/update form.
#[derive(Serialize)]
pub struct BreedFormView {
    form: FormView<BreedForm>,
}

fn breed_form_view(form: FormView<BreedForm>) -> Response {
    Json(BreedFormView { form }).into_response()
}

async fn create_breed_page(AuthUser(_user): AuthUser) -> Response {
    breed_form_view(FormView::new(BreedForm::default()))
}

async fn create_breed(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Form(form): Form<BreedForm>,
) -> AppResult<Response> {
    match form.clean() {
        Ok(name) => {
            state.cat_service.create_breed(name).await?;
            Ok(found(CATS_PATH))
        }
        Err(errors) => Ok(breed_form_view(FormView::invalid(form, errors))),
    }
}

async fn update_breed_page(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let breed = state.cat_service.get_breed(&id).await?;
    Ok(breed_form_view(FormView::new(BreedForm::from_model(&breed))))
}

async fn update_breed(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
    Form(form): Form<BreedForm>,
) -> AppResult<Response> {
    state.cat_service.get_breed(&id).await?;
    match form.clean() {
        Ok(name) => {
            state.cat_service.update_breed(&id, name).await?;
            Ok(found(CATS_PATH))
        }
        Err(errors) => Ok(breed_form_view(FormView::invalid(form, errors))),
    }
}

async fn delete_breed_page(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteView>> {
    let breed = state.cat_service.get_breed(&id).await?;
    Ok(Json(DeleteView {
        id: breed.id,
        name: breed.name,
    }))
}

async fn delete_breed(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    state.cat_service.delete_breed(&id).await?;
    Ok(found(CATS_PATH))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cats/", get(list_cats))
        .route("/cats/lookup/", get(list_breeds))
        .route("/cats/main/create", get(create_cat_page).post(create_cat))
        .route(
            "/cats/main/{id}/update",
            get(update_cat_page).post(update_cat),
        )
        .route(
            "/cats/main/{id}/delete",
            get(delete_cat_page).post(delete_cat),
        )
        .route(
            "/cats/lookup/create",
            get(create_breed_page).post(create_breed),
        )
        .route(
            "/cats/lookup/{id}/update",
            get(update_breed_page).post(update_breed),
        )
        .route(
            "/cats/lookup/{id}/delete",
            get(delete_breed_page).post(delete_breed),
        )
}
