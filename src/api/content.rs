//! Site content handlers: posts, services, inquiries, settings, hero
//! slides. Reads are public; writes are admin-only except the contact
//! form.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::domain::{
    HeroSlide, HeroSlidePatch, Inquiry, NewHeroSlide, NewInquiry, NewPost, NewService, Post,
    Service, SiteSettings, SiteSettingsPatch,
};
use crate::store::SlideDirection;

use super::{require_admin, require_auth, ApiError, AppState};

// Posts

pub async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<Post>>, ApiError> {
    Ok(Json(state.store.list_posts().await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, ApiError> {
    state
        .store
        .find_post_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
}

pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewPost>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    require_admin(&state, &headers).await?;
    new.validate().map_err(ApiError::BadRequest)?;
    let post = state.store.create_post(new).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// The path parameter is the numeric id here, not the slug.
pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::BadRequest("invalid post id".to_string()))?;
    state.store.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Services

pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<Service>>, ApiError> {
    Ok(Json(state.store.list_services().await?))
}

pub async fn create_service(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewService>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    require_admin(&state, &headers).await?;
    let service = state.store.create_service(new).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn delete_service(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    state.store.delete_service(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Inquiries

/// Public contact form.
pub async fn create_inquiry(
    State(state): State<AppState>,
    Json(new): Json<NewInquiry>,
) -> Result<(StatusCode, Json<Inquiry>), ApiError> {
    new.validate().map_err(ApiError::BadRequest)?;
    let inquiry = state.store.create_inquiry(new).await?;
    Ok((StatusCode::CREATED, Json(inquiry)))
}

pub async fn list_inquiries(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Inquiry>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.list_inquiries().await?))
}

// Site settings

pub async fn get_site_settings(
    State(state): State<AppState>,
) -> Result<Json<SiteSettings>, ApiError> {
    Ok(Json(state.store.site_settings().await?))
}

pub async fn update_site_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(patch): Json<SiteSettingsPatch>,
) -> Result<Json<SiteSettings>, ApiError> {
    require_admin(&state, &headers).await?;
    Ok(Json(state.store.update_site_settings(patch).await?))
}

// Hero slides

pub async fn list_hero_slides(
    State(state): State<AppState>,
) -> Result<Json<Vec<HeroSlide>>, ApiError> {
    Ok(Json(state.store.list_hero_slides().await?))
}

pub async fn create_hero_slide(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewHeroSlide>,
) -> Result<(StatusCode, Json<HeroSlide>), ApiError> {
    require_admin(&state, &headers).await?;
    let slide = state.store.create_hero_slide(new).await?;
    Ok((StatusCode::CREATED, Json(slide)))
}

pub async fn update_hero_slide(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<HeroSlidePatch>,
) -> Result<Json<HeroSlide>, ApiError> {
    require_admin(&state, &headers).await?;
    state
        .store
        .update_hero_slide(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Slide not found".to_string()))
}

pub async fn delete_hero_slide(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    state.store.delete_hero_slide(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct MoveSlideRequest {
    pub direction: MoveDirection,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Swap a slide with its neighbor. Moving past either end is a no-op.
pub async fn move_hero_slide(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<MoveSlideRequest>,
) -> Result<Json<HeroSlide>, ApiError> {
    require_admin(&state, &headers).await?;
    let direction = match body.direction {
        MoveDirection::Up => SlideDirection::Up,
        MoveDirection::Down => SlideDirection::Down,
    };
    state
        .store
        .move_hero_slide(id, direction)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Slide not found".to_string()))
}
