//! CRM handlers: contacts, leads, interactions, campaigns, users, tasks.
//!
//! Status changes go through the pipeline engine, which owns the
//! validation order and authorization policy; everything else is plain
//! resource CRUD.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;

use crate::core::{Board, LeadBoardFilter, LeadCard, TaskBoardFilter};
use crate::domain::{
    Campaign, Contact, Interaction, Lead, LeadStage, NewCampaign, NewContact, NewInteraction,
    NewLead, NewTask, Role, Task, TaskStage, UserView,
};
use crate::store::InteractionFilter;

use super::{principal, require_admin, require_auth, ApiError, AppState};

/// Body of the status PATCH routes. The stage arrives as a plain string
/// so the engine can report vocabulary violations itself.
#[derive(Debug, Deserialize)]
pub struct StatusPatch {
    pub status: String,
}

// Contacts

pub async fn list_contacts(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Contact>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.list_contacts().await?))
}

pub async fn get_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Contact>, ApiError> {
    require_auth(&state, &headers).await?;
    state
        .store
        .find_contact(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Contact not found".to_string()))
}

pub async fn create_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewContact>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    require_auth(&state, &headers).await?;
    if new.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }
    let contact = state.store.create_contact(new).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

// Leads

pub async fn list_leads(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Lead>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.list_leads().await?))
}

pub async fn create_lead(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewLead>,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    require_auth(&state, &headers).await?;
    let lead = state.store.create_lead(new).await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

pub async fn move_lead(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<StatusPatch>,
) -> Result<Json<Lead>, ApiError> {
    let actor = principal(&state, &headers).await?;
    let lead = state
        .engine
        .move_lead(id, &patch.status, actor.as_ref())
        .await?;
    Ok(Json(lead))
}

pub async fn delete_lead(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_auth(&state, &headers).await?;
    state.store.delete_lead(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
pub struct LeadBoardQuery {
    pub search: Option<String>,
}

pub async fn lead_board(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<LeadBoardQuery>,
) -> Result<Json<Board<LeadStage, LeadCard>>, ApiError> {
    let actor = principal(&state, &headers).await?;
    let board = state
        .engine
        .lead_board(
            LeadBoardFilter {
                search: query.search,
            },
            actor.as_ref(),
        )
        .await?;
    Ok(Json(board))
}

// Interactions

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionQuery {
    pub lead_id: Option<i64>,
    pub contact_id: Option<i64>,
}

pub async fn list_interactions(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<InteractionQuery>,
) -> Result<Json<Vec<Interaction>>, ApiError> {
    require_auth(&state, &headers).await?;
    let interactions = state
        .store
        .list_interactions(InteractionFilter {
            lead_id: query.lead_id,
            contact_id: query.contact_id,
        })
        .await?;
    Ok(Json(interactions))
}

/// The acting user is recorded from the session, never from the body.
pub async fn create_interaction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewInteraction>,
) -> Result<(StatusCode, Json<Interaction>), ApiError> {
    let actor = require_auth(&state, &headers).await?;
    let interaction = state.store.create_interaction(actor.user_id, new).await?;
    Ok((StatusCode::CREATED, Json(interaction)))
}

// Campaigns

pub async fn list_campaigns(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Campaign>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.list_campaigns().await?))
}

pub async fn create_campaign(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewCampaign>,
) -> Result<(StatusCode, Json<Campaign>), ApiError> {
    require_admin(&state, &headers).await?;
    let campaign = state.store.create_campaign(new).await?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn move_campaign(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<StatusPatch>,
) -> Result<Json<Campaign>, ApiError> {
    let actor = principal(&state, &headers).await?;
    let campaign = state
        .engine
        .move_campaign(id, &patch.status, actor.as_ref())
        .await?;
    Ok(Json(campaign))
}

pub async fn delete_campaign(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_admin(&state, &headers).await?;
    state.store.delete_campaign(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Users

pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserView>>, ApiError> {
    require_auth(&state, &headers).await?;
    let users = state.store.list_users().await?;
    Ok(Json(users.iter().map(|u| u.view()).collect()))
}

#[derive(Debug, Deserialize)]
pub struct RolePatch {
    pub role: Role,
}

pub async fn update_user_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<RolePatch>,
) -> Result<Json<UserView>, ApiError> {
    require_admin(&state, &headers).await?;
    state
        .store
        .update_user_role(id, patch.role)
        .await?
        .map(|u| Json(u.view()))
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

// Tasks

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    pub assigned_to: Option<i64>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    require_auth(&state, &headers).await?;
    Ok(Json(state.store.list_tasks(query.assigned_to).await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(new): Json<NewTask>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let actor = require_auth(&state, &headers).await?;
    if new.title.trim().is_empty() {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }
    let task = state.store.create_task(actor.user_id, new).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn move_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<StatusPatch>,
) -> Result<Json<Task>, ApiError> {
    let actor = principal(&state, &headers).await?;
    let task = state
        .engine
        .move_task(id, &patch.status, actor.as_ref())
        .await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_auth(&state, &headers).await?;
    state.store.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn task_board(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Board<TaskStage, Task>>, ApiError> {
    let actor = principal(&state, &headers).await?;
    let board = state
        .engine
        .task_board(
            TaskBoardFilter {
                assigned_to: query.assigned_to,
            },
            actor.as_ref(),
        )
        .await?;
    Ok(Json(board))
}
