//! Ad endpoints.

use axum::{
    Json, Router,
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::{DateTime, Utc};
use classifieds_common::{AppError, AppResult, naturaltime};
use classifieds_core::{
    AdDetail, AdListing,
    forms::{AdForm, CommentForm, PictureUpload, picture_label},
};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::{FormView, found},
};

const LIST_PATH: &str = "/ads/";

/// An ad as shown in the listing.
#[derive(Serialize)]
pub struct AdItem {
    pub id: String,
    pub title: String,
    pub price: Option<String>,
    pub text: String,
    pub owner: String,
    pub tags: Vec<String>,
    pub updated_at: String,
    pub natural_updated: String,
}

impl AdItem {
    fn from_listing(listing: AdListing, now: DateTime<Utc>) -> Self {
        let ad = listing.ad;
        Self {
            natural_updated: naturaltime(&ad.updated_at, now),
            updated_at: ad.updated_at.to_rfc3339(),
            id: ad.id,
            title: ad.title,
            price: ad.price.map(|p| p.to_string()),
            text: ad.text,
            owner: listing.owner,
            tags: listing.tags,
        }
    }
}

/// Listing query.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    search: Option<String>,
}

/// Ad listing.
#[derive(Serialize)]
pub struct AdListView {
    ads: Vec<AdItem>,
    /// IDs of every ad the viewer has favorited; empty when anonymous.
    favorites: Vec<String>,
    search: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<AdListView>> {
    let listings = state.ad_service.list(query.search.as_deref()).await?;
    let favorites = match &user {
        Some(user) => state.ad_service.favorites(&user.id).await?,
        None => Vec::new(),
    };

    let now = Utc::now();
    Ok(Json(AdListView {
        ads: listings
            .into_iter()
            .map(|listing| AdItem::from_listing(listing, now))
            .collect(),
        favorites,
        search: query.search,
    }))
}

/// A comment under an ad.
#[derive(Serialize)]
pub struct CommentItem {
    id: String,
    text: String,
    owner: String,
    natural_updated: String,
}

/// Field constraints advertised with an empty comment form.
#[derive(Serialize)]
pub struct CommentFormSpec {
    fields: CommentForm,
    required: bool,
    min_length: usize,
    max_length: usize,
}

/// Ad detail page.
#[derive(Serialize)]
pub struct AdDetailView {
    id: String,
    title: String,
    price: Option<String>,
    text: String,
    owner: String,
    tags: Vec<String>,
    has_picture: bool,
    picture_url: Option<String>,
    updated_at: String,
    natural_updated: String,
    comments: Vec<CommentItem>,
    comment_form: CommentFormSpec,
    is_owner: bool,
    is_favorite: bool,
}

impl AdDetailView {
    fn new(detail: AdDetail, now: DateTime<Utc>) -> Self {
        let AdDetail {
            ad,
            owner,
            tags,
            comments,
            is_owner,
            is_favorite,
        } = detail;

        Self {
            has_picture: ad.has_picture(),
            picture_url: ad
                .has_picture()
                .then(|| format!("/ads/ad/{}/picture", ad.id)),
            natural_updated: naturaltime(&ad.updated_at, now),
            updated_at: ad.updated_at.to_rfc3339(),
            price: ad.price.map(|p| p.to_string()),
            id: ad.id,
            title: ad.title,
            text: ad.text,
            owner,
            tags,
            comments: comments
                .into_iter()
                .map(|entry| CommentItem {
                    natural_updated: naturaltime(&entry.comment.updated_at, now),
                    id: entry.comment.id,
                    text: entry.comment.text,
                    owner: entry.author,
                })
                .collect(),
            comment_form: CommentFormSpec {
                fields: CommentForm::default(),
                required: true,
                min_length: CommentForm::MIN_LENGTH,
                max_length: CommentForm::MAX_LENGTH,
            },
            is_owner,
            is_favorite,
        }
    }
}

async fn detail(
    State(state): State<AppState>,
    MaybeAuthUser(user): MaybeAuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<AdDetailView>> {
    let detail = state.ad_service.detail(&id, user.as_ref()).await?;
    Ok(Json(AdDetailView::new(detail, Utc::now())))
}

/// Ad create/update form.
#[derive(Serialize)]
pub struct AdFormView {
    form: FormView<AdForm>,
    picture_label: String,
    /// Set when editing an ad that already has a picture.
    has_picture: bool,
}

impl AdFormView {
    fn render(form: FormView<AdForm>, has_picture: bool) -> Response {
        Json(Self {
            form,
            picture_label: picture_label(),
            has_picture,
        })
        .into_response()
    }
}

/// Read an ad form from a multipart body. A missing picture part and an
/// empty one both leave the picture unchanged.
async fn read_ad_form(mut multipart: Multipart) -> AppResult<(AdForm, PictureUpload)> {
    let mut form = AdForm::default();
    let mut picture = PictureUpload::Unchanged;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "picture" {
            let file_name = field.file_name().map(ToString::to_string);
            let content_type = field.content_type().map(ToString::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            picture = PictureUpload::from_part(
                bytes.to_vec(),
                file_name.as_deref(),
                content_type.as_deref(),
            );
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        match name.as_str() {
            "title" => form.title = value,
            "text" => form.text = value,
            "price" => form.price = value,
            "tags" => form.tags = value,
            _ => {}
        }
    }

    Ok((form, picture))
}

async fn create_page(AuthUser(_user): AuthUser) -> Response {
    AdFormView::render(FormView::new(AdForm::default()), false)
}

async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> AppResult<Response> {
    let (form, picture) = read_ad_form(multipart).await?;

    match form.clean(picture) {
        Ok(draft) => {
            state.ad_service.create(&user, draft).await?;
            Ok(found(LIST_PATH))
        }
        Err(errors) => Ok(AdFormView::render(FormView::invalid(form, errors), false)),
    }
}

async fn update_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let (ad, tags) = state.ad_service.get_owned(&id, &user.id).await?;
    Ok(AdFormView::render(
        FormView::new(AdForm::from_model(&ad, &tags)),
        ad.has_picture(),
    ))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    // Ownership first: another user's ad is missing even for invalid input
    let (ad, _) = state.ad_service.get_owned(&id, &user.id).await?;
    let (form, picture) = read_ad_form(multipart).await?;

    match form.clean(picture) {
        Ok(draft) => {
            state.ad_service.update(&id, &user.id, draft).await?;
            Ok(found(LIST_PATH))
        }
        Err(errors) => Ok(AdFormView::render(
            FormView::invalid(form, errors),
            ad.has_picture(),
        )),
    }
}

/// Delete confirmation.
#[derive(Serialize)]
pub struct AdDeleteView {
    id: String,
    title: String,
    updated_at: String,
}

async fn delete_page(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<AdDeleteView>> {
    let (ad, _) = state.ad_service.get_owned(&id, &user.id).await?;
    Ok(Json(AdDeleteView {
        id: ad.id,
        title: ad.title,
        updated_at: ad.updated_at.to_rfc3339(),
    }))
}

async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    state.ad_service.delete(&id, &user.id).await?;
    Ok(found(LIST_PATH))
}

async fn picture(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Response> {
    let picture = state.ad_service.picture(&id).await?;
    let length = picture.bytes.len();

    Ok((
        [
            (header::CONTENT_TYPE, picture.content_type),
            (header::CONTENT_LENGTH, length.to_string()),
        ],
        Body::from(picture.bytes),
    )
        .into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ads/", get(list))
        .route("/ads/ad/create", get(create_page).post(create))
        .route("/ads/ad/{id}", get(detail))
        .route("/ads/ad/{id}/update", get(update_page).post(update))
        .route("/ads/ad/{id}/delete", get(delete_page).post(delete))
        .route("/ads/ad/{id}/picture", get(picture))
}
