//! The resource store: generic persistence behind all entity types.
//!
//! The store owns durability and nothing else. Business rules (stage
//! validation, authorization) live in the pipeline engine; handlers and
//! the engine talk to the store through the [`ResourceStore`] seam.

pub mod json;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    Campaign, CampaignStage, Contact, HeroSlide, HeroSlidePatch, Inquiry, Interaction, Lead,
    LeadStage, NewCampaign, NewContact, NewHeroSlide, NewInquiry, NewInteraction, NewLead,
    NewPost, NewService, NewTask, Post, Role, Service, SiteSettings, SiteSettingsPatch, Task,
    TaskStage, User,
};

pub use json::JsonStore;

/// Errors surfaced by store operations.
///
/// Missing records are not errors here: lookups return `Option` and the
/// engine decides what absence means.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique field already holds this value
    #[error("duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    /// Underlying persistence failed (infrastructure, not business logic)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Filters for interaction listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractionFilter {
    pub lead_id: Option<i64>,
    pub contact_id: Option<i64>,
}

/// Direction for the hero-slide swap reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    Up,
    Down,
}

/// Generic persistence for every entity type.
///
/// Listing order contracts: posts newest-first by `published_at`;
/// contacts, leads, campaigns, tasks, users and inquiries newest-first by
/// `created_at`; interactions newest-first by `date`; hero slides
/// ascending by `order`. Deletes are idempotent: removing an absent id is
/// not an error.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    // Posts
    async fn list_posts(&self) -> Result<Vec<Post>, StoreError>;
    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError>;
    async fn create_post(&self, new: NewPost) -> Result<Post, StoreError>;
    async fn delete_post(&self, id: i64) -> Result<(), StoreError>;

    // Services
    async fn list_services(&self) -> Result<Vec<Service>, StoreError>;
    async fn create_service(&self, new: NewService) -> Result<Service, StoreError>;
    async fn delete_service(&self, id: i64) -> Result<(), StoreError>;

    // Inquiries
    async fn list_inquiries(&self) -> Result<Vec<Inquiry>, StoreError>;
    async fn create_inquiry(&self, new: NewInquiry) -> Result<Inquiry, StoreError>;

    // Users
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
    async fn create_user(&self, user: User) -> Result<User, StoreError>;
    async fn update_user_role(&self, id: i64, role: Role) -> Result<Option<User>, StoreError>;

    // Contacts
    async fn list_contacts(&self) -> Result<Vec<Contact>, StoreError>;
    async fn find_contact(&self, id: i64) -> Result<Option<Contact>, StoreError>;
    async fn create_contact(&self, new: NewContact) -> Result<Contact, StoreError>;

    // Leads
    async fn list_leads(&self) -> Result<Vec<Lead>, StoreError>;
    async fn find_lead(&self, id: i64) -> Result<Option<Lead>, StoreError>;
    async fn create_lead(&self, new: NewLead) -> Result<Lead, StoreError>;
    async fn update_lead_status(
        &self,
        id: i64,
        status: LeadStage,
    ) -> Result<Option<Lead>, StoreError>;
    async fn delete_lead(&self, id: i64) -> Result<(), StoreError>;

    // Interactions
    async fn list_interactions(
        &self,
        filter: InteractionFilter,
    ) -> Result<Vec<Interaction>, StoreError>;
    async fn create_interaction(
        &self,
        user_id: i64,
        new: NewInteraction,
    ) -> Result<Interaction, StoreError>;

    // Campaigns
    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError>;
    async fn find_campaign(&self, id: i64) -> Result<Option<Campaign>, StoreError>;
    async fn create_campaign(&self, new: NewCampaign) -> Result<Campaign, StoreError>;
    async fn update_campaign_status(
        &self,
        id: i64,
        status: CampaignStage,
    ) -> Result<Option<Campaign>, StoreError>;
    async fn delete_campaign(&self, id: i64) -> Result<(), StoreError>;

    // Tasks
    async fn list_tasks(&self, assigned_to: Option<i64>) -> Result<Vec<Task>, StoreError>;
    async fn find_task(&self, id: i64) -> Result<Option<Task>, StoreError>;
    async fn create_task(&self, created_by: i64, new: NewTask) -> Result<Task, StoreError>;
    async fn update_task_status(
        &self,
        id: i64,
        status: TaskStage,
    ) -> Result<Option<Task>, StoreError>;
    async fn delete_task(&self, id: i64) -> Result<(), StoreError>;

    // Site settings (singleton; read creates defaults)
    async fn site_settings(&self) -> Result<SiteSettings, StoreError>;
    async fn update_site_settings(
        &self,
        patch: SiteSettingsPatch,
    ) -> Result<SiteSettings, StoreError>;

    // Hero slides
    async fn list_hero_slides(&self) -> Result<Vec<HeroSlide>, StoreError>;
    async fn create_hero_slide(&self, new: NewHeroSlide) -> Result<HeroSlide, StoreError>;
    async fn update_hero_slide(
        &self,
        id: i64,
        patch: HeroSlidePatch,
    ) -> Result<Option<HeroSlide>, StoreError>;
    async fn delete_hero_slide(&self, id: i64) -> Result<(), StoreError>;

    /// Swap a slide's `order` with its neighbor in the given direction.
    /// Moving the first slide up (or the last down) is a no-op.
    async fn move_hero_slide(
        &self,
        id: i64,
        direction: SlideDirection,
    ) -> Result<Option<HeroSlide>, StoreError>;
}
