//! CRM entities: contacts, leads, interactions, tasks, campaigns.
//!
//! Leads, tasks, and campaigns are pipeline items: their `status` field is
//! validated against a stage vocabulary and mutated only through the
//! pipeline engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stage::{CampaignStage, LeadStage, TaskStage};

/// Whether a contact is a person or a company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactKind {
    Individual,
    Company,
}

/// A CRM contact (the parent record leads hang off of).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,

    #[serde(rename = "type")]
    pub kind: ContactKind,

    pub name: String,

    pub email: Option<String>,

    pub phone: Option<String>,

    /// CPF or CNPJ
    pub document: Option<String>,

    pub address: Option<String>,

    /// Owning user, if assigned
    pub assigned_to: Option<i64>,

    pub created_at: DateTime<Utc>,
}

/// Payload for creating a contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    #[serde(rename = "type")]
    pub kind: ContactKind,

    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub document: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub assigned_to: Option<i64>,
}

impl Contact {
    pub fn create(id: i64, new: NewContact) -> Self {
        Self {
            id,
            kind: new.kind,
            name: new.name,
            email: new.email,
            phone: new.phone,
            document: new.document,
            address: new.address,
            assigned_to: new.assigned_to,
            created_at: Utc::now(),
        }
    }
}

/// A sales opportunity attached to a contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: i64,

    pub contact_id: i64,

    /// Current pipeline stage, always a vocabulary member
    pub status: LeadStage,

    /// Where the lead came from (referral, website, ...)
    pub source: Option<String>,

    /// Estimated value, free-form to allow currency formatting
    pub value: Option<String>,

    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Payload for creating a lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub contact_id: i64,

    /// Starting stage; defaults to the first vocabulary entry
    #[serde(default)]
    pub status: LeadStage,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub value: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl Lead {
    pub fn create(id: i64, new: NewLead) -> Self {
        Self {
            id,
            contact_id: new.contact_id,
            status: new.status,
            source: new.source,
            value: new.value,
            notes: new.notes,
            created_at: Utc::now(),
        }
    }
}

/// Kind of logged touchpoint with a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Call,
    Email,
    Meeting,
    Note,
}

/// A logged touchpoint (call, email, meeting, note).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: i64,

    pub lead_id: Option<i64>,

    pub contact_id: i64,

    /// The user who logged it
    pub user_id: i64,

    #[serde(rename = "type")]
    pub kind: InteractionKind,

    pub description: String,

    /// When the interaction happened (may predate its creation)
    pub date: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

/// Payload for logging an interaction. The acting user is recorded from
/// the request principal, not the body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInteraction {
    #[serde(default)]
    pub lead_id: Option<i64>,

    pub contact_id: i64,

    #[serde(rename = "type")]
    pub kind: InteractionKind,

    pub description: String,

    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

impl Interaction {
    pub fn create(id: i64, user_id: i64, new: NewInteraction) -> Self {
        Self {
            id,
            lead_id: new.lead_id,
            contact_id: new.contact_id,
            user_id,
            kind: new.kind,
            description: new.description,
            date: new.date.unwrap_or_else(Utc::now),
            created_at: Utc::now(),
        }
    }
}

/// Advertising platform a campaign runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignPlatform {
    Google,
    Facebook,
    Instagram,
    Email,
}

/// A marketing campaign (admin-managed pipeline item).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: i64,

    pub name: String,

    pub platform: CampaignPlatform,

    pub status: CampaignStage,

    pub budget: Option<String>,

    pub start_date: Option<DateTime<Utc>>,

    pub end_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

/// Payload for creating a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCampaign {
    pub name: String,

    pub platform: CampaignPlatform,

    #[serde(default)]
    pub status: CampaignStage,

    #[serde(default)]
    pub budget: Option<String>,

    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
}

impl Campaign {
    pub fn create(id: i64, new: NewCampaign) -> Self {
        Self {
            id,
            name: new.name,
            platform: new.platform,
            status: new.status,
            budget: new.budget,
            start_date: new.start_date,
            end_date: new.end_date,
            created_at: Utc::now(),
        }
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// A daily board task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,

    pub title: String,

    pub description: Option<String>,

    pub status: TaskStage,

    pub priority: TaskPriority,

    pub assigned_to: i64,

    /// The user who created it (recorded from the request principal)
    pub created_by: i64,

    pub due_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

/// Payload for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub status: TaskStage,

    #[serde(default)]
    pub priority: TaskPriority,

    pub assigned_to: i64,

    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    pub fn create(id: i64, created_by: i64, new: NewTask) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            status: new.status,
            priority: new.priority,
            assigned_to: new.assigned_to,
            created_by,
            due_date: new.due_date,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::Stage;

    #[test]
    fn test_lead_defaults_to_first_stage() {
        let json = r#"{"contactId": 3}"#;
        let new: NewLead = serde_json::from_str(json).unwrap();
        assert_eq!(new.status, LeadStage::first());

        let lead = Lead::create(1, new);
        assert_eq!(lead.status, LeadStage::New);
        assert_eq!(lead.contact_id, 3);
    }

    #[test]
    fn test_task_wire_format() {
        let json = r#"{
            "title": "Call back Mr. Costa",
            "assignedTo": 7,
            "priority": "high",
            "status": "in_progress"
        }"#;
        let new: NewTask = serde_json::from_str(json).unwrap();
        let task = Task::create(10, 2, new);

        assert_eq!(task.assigned_to, 7);
        assert_eq!(task.created_by, 2);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.status, TaskStage::InProgress);

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["assignedTo"], 7);
        assert_eq!(value["createdBy"], 2);
        assert_eq!(value["status"], "in_progress");
    }

    #[test]
    fn test_unknown_status_rejected_at_deserialization() {
        let json = r#"{"contactId": 3, "status": "archived"}"#;
        assert!(serde_json::from_str::<NewLead>(json).is_err());
    }

    #[test]
    fn test_interaction_kind_wire_name() {
        let json = r#"{"contactId": 1, "type": "meeting", "description": "quarterly review"}"#;
        let new: NewInteraction = serde_json::from_str(json).unwrap();
        assert_eq!(new.kind, InteractionKind::Meeting);

        let interaction = Interaction::create(1, 9, new);
        assert_eq!(interaction.user_id, 9);
        let value = serde_json::to_value(&interaction).unwrap();
        assert_eq!(value["type"], "meeting");
    }
}
