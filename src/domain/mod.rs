//! Domain types for the back-office.
//!
//! This module contains the core data structures:
//! - Stage vocabularies: the valid `status` values per entity type
//! - CRM entities: contacts, leads, interactions, tasks, campaigns
//! - Site content: posts, services, inquiries, hero slides, settings
//! - Users and the request-scoped principal

pub mod content;
pub mod crm;
pub mod stage;
pub mod user;

// Re-export commonly used types
pub use content::{
    HeroSlide, HeroSlidePatch, Inquiry, NewHeroSlide, NewInquiry, NewPost, NewService, Post,
    Service, ServiceIcon, SiteSettings, SiteSettingsPatch,
};
pub use crm::{
    Campaign, CampaignPlatform, Contact, ContactKind, Interaction, InteractionKind, Lead,
    NewCampaign, NewContact, NewInteraction, NewLead, NewTask, Task, TaskPriority,
};
pub use stage::{CampaignStage, LeadStage, Stage, TaskStage, UnknownStage};
pub use user::{Principal, Role, User, UserView};
