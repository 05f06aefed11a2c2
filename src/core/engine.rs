//! The status pipeline engine.
//!
//! Decides whether a requested stage transition is valid and applies it
//! through the resource store. Stateless per call: every operation
//! receives the item id, the target stage, and the acting principal, and
//! either approves the transition or reports exactly why not.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::stage::{Stage, UnknownStage};
use crate::domain::{Campaign, CampaignStage, Lead, LeadStage, Principal, Task, TaskStage};
use crate::store::{ResourceStore, StoreError};

use super::board::Board;

/// Why authorization was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No authenticated principal on the request
    Unauthenticated,

    /// Authenticated, but the entity type is admin-managed
    AdminRequired,
}

impl std::fmt::Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Denial::Unauthenticated => write!(f, "authentication required"),
            Denial::AdminRequired => write!(f, "admin role required"),
        }
    }
}

/// Why a pipeline operation was refused.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The referenced item does not exist
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: i64 },

    /// The target stage is not in this entity's vocabulary
    #[error(transparent)]
    InvalidStage(#[from] UnknownStage),

    /// Missing or insufficient authorization
    #[error("forbidden: {0}")]
    Forbidden(Denial),

    /// Malformed input payload
    #[error("validation failed: {0}")]
    Validation(String),

    /// The store itself failed; the only class worth retrying
    #[error("store unavailable: {0}")]
    Store(#[source] StoreError),
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate { .. } => PipelineError::Validation(err.to_string()),
            other => PipelineError::Store(other),
        }
    }
}

/// Require an authenticated actor; require the admin role when the entity
/// type is admin-managed.
fn authorize(actor: Option<&Principal>, admin_only: bool) -> Result<&Principal, PipelineError> {
    let principal = actor.ok_or(PipelineError::Forbidden(Denial::Unauthenticated))?;
    if admin_only && !principal.is_admin() {
        return Err(PipelineError::Forbidden(Denial::AdminRequired));
    }
    Ok(principal)
}

/// A lead as shown on the pipeline board, with the parent contact's name
/// joined in for display and search.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadCard {
    #[serde(flatten)]
    pub lead: Lead,

    pub contact_name: String,
}

/// Filters for the lead pipeline board.
#[derive(Debug, Clone, Default)]
pub struct LeadBoardFilter {
    /// Case-insensitive substring match on the contact name
    pub search: Option<String>,
}

/// Filters for the task board.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskBoardFilter {
    pub assigned_to: Option<i64>,
}

/// Validates and applies stage transitions for all pipeline item types.
pub struct PipelineEngine {
    store: Arc<dyn ResourceStore>,
}

impl PipelineEngine {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    /// Move a lead to `target`.
    ///
    /// Validation order: item exists, target is a vocabulary member,
    /// actor is authorized. No adjacency restriction: `new` may jump
    /// straight to `closed`. Repeating the same target is an idempotent
    /// success.
    #[instrument(skip(self, actor), fields(lead_id = id, stage = target))]
    pub async fn move_lead(
        &self,
        id: i64,
        target: &str,
        actor: Option<&Principal>,
    ) -> Result<Lead, PipelineError> {
        let current = self
            .store
            .find_lead(id)
            .await?
            .ok_or(PipelineError::NotFound { kind: "lead", id })?;
        let stage = LeadStage::parse(target)?;
        authorize(actor, false)?;

        let updated = self
            .store
            .update_lead_status(id, stage)
            .await?
            .ok_or(PipelineError::NotFound { kind: "lead", id })?;

        info!(from = %current.status, to = %stage, "lead moved");
        Ok(updated)
    }

    /// Move a task to `target`. Any authenticated user may move any task.
    #[instrument(skip(self, actor), fields(task_id = id, stage = target))]
    pub async fn move_task(
        &self,
        id: i64,
        target: &str,
        actor: Option<&Principal>,
    ) -> Result<Task, PipelineError> {
        let current = self
            .store
            .find_task(id)
            .await?
            .ok_or(PipelineError::NotFound { kind: "task", id })?;
        let stage = TaskStage::parse(target)?;
        authorize(actor, false)?;

        let updated = self
            .store
            .update_task_status(id, stage)
            .await?
            .ok_or(PipelineError::NotFound { kind: "task", id })?;

        info!(from = %current.status, to = %stage, "task moved");
        Ok(updated)
    }

    /// Move a campaign to `target`. Campaigns are admin-managed.
    #[instrument(skip(self, actor), fields(campaign_id = id, stage = target))]
    pub async fn move_campaign(
        &self,
        id: i64,
        target: &str,
        actor: Option<&Principal>,
    ) -> Result<Campaign, PipelineError> {
        let current = self
            .store
            .find_campaign(id)
            .await?
            .ok_or(PipelineError::NotFound {
                kind: "campaign",
                id,
            })?;
        let stage = CampaignStage::parse(target)?;
        authorize(actor, true)?;

        let updated = self
            .store
            .update_campaign_status(id, stage)
            .await?
            .ok_or(PipelineError::NotFound {
                kind: "campaign",
                id,
            })?;

        info!(from = %current.status, to = %stage, "campaign moved");
        Ok(updated)
    }

    /// The lead pipeline grouped into stage columns, newest-first within
    /// each column, with contact names joined in.
    pub async fn lead_board(
        &self,
        filter: LeadBoardFilter,
        actor: Option<&Principal>,
    ) -> Result<Board<LeadStage, LeadCard>, PipelineError> {
        authorize(actor, false)?;

        let leads = self.store.list_leads().await?;
        let contacts = self.store.list_contacts().await?;

        let name_of = |contact_id: i64| -> String {
            contacts
                .iter()
                .find(|c| c.id == contact_id)
                .map(|c| c.name.clone())
                .unwrap_or_default()
        };

        let needle = filter.search.as_deref().map(str::to_lowercase);
        let cards: Vec<LeadCard> = leads
            .into_iter()
            .map(|lead| {
                let contact_name = name_of(lead.contact_id);
                LeadCard { lead, contact_name }
            })
            .filter(|card| match &needle {
                Some(needle) => card.contact_name.to_lowercase().contains(needle),
                None => true,
            })
            .collect();

        Ok(Board::group(cards, |card| card.lead.status))
    }

    /// The task board grouped into its three columns, newest-first within
    /// each column, optionally restricted to one assignee.
    pub async fn task_board(
        &self,
        filter: TaskBoardFilter,
        actor: Option<&Principal>,
    ) -> Result<Board<TaskStage, Task>, PipelineError> {
        authorize(actor, false)?;

        let tasks = self.store.list_tasks(filter.assigned_to).await?;
        Ok(Board::group(tasks, |task| task.status))
    }
}
