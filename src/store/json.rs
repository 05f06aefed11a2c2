//! JSON-snapshot implementation of the resource store.
//!
//! The whole database is one serde-friendly struct, written to disk as
//! pretty-printed JSON after every mutation. With no path configured the
//! store is purely in-memory, which is what the tests use.

use std::path::PathBuf;

use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use async_trait::async_trait;

use crate::domain::{
    Campaign, CampaignStage, Contact, HeroSlide, HeroSlidePatch, Inquiry, Interaction, Lead,
    LeadStage, NewCampaign, NewContact, NewHeroSlide, NewInquiry, NewInteraction, NewLead,
    NewPost, NewService, NewTask, Post, Role, Service, SiteSettings, SiteSettingsPatch, Task,
    TaskStage, User,
};

use super::{InteractionFilter, ResourceStore, SlideDirection, StoreError};

use serde::{Deserialize, Serialize};

/// Next-id counters, one per collection. Ids are never reused, even after
/// deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct Counters {
    posts: i64,
    services: i64,
    inquiries: i64,
    users: i64,
    contacts: i64,
    leads: i64,
    interactions: i64,
    campaigns: i64,
    tasks: i64,
    hero_slides: i64,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            posts: 1,
            services: 1,
            inquiries: 1,
            users: 1,
            contacts: 1,
            leads: 1,
            interactions: 1,
            campaigns: 1,
            tasks: 1,
            hero_slides: 1,
        }
    }
}

fn next_id(counter: &mut i64) -> i64 {
    let id = *counter;
    *counter += 1;
    id
}

/// The serialized database: every collection plus the settings singleton.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Database {
    posts: Vec<Post>,
    services: Vec<Service>,
    inquiries: Vec<Inquiry>,
    users: Vec<User>,
    contacts: Vec<Contact>,
    leads: Vec<Lead>,
    interactions: Vec<Interaction>,
    campaigns: Vec<Campaign>,
    tasks: Vec<Task>,
    hero_slides: Vec<HeroSlide>,
    site_settings: Option<SiteSettings>,
    counters: Counters,
}

/// File-backed (or in-memory) resource store.
pub struct JsonStore {
    /// Snapshot location; `None` keeps everything in memory
    path: Option<PathBuf>,

    state: RwLock<Database>,
}

impl JsonStore {
    /// Create a store with no backing file. State is lost on drop.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(Database::default()),
        }
    }

    /// Open a store backed by the given snapshot file, loading existing
    /// state if the file is present.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        let state = if path.exists() {
            let content = fs::read_to_string(&path).await?;
            serde_json::from_str(&content)?
        } else {
            Database::default()
        };

        Ok(Self {
            path: Some(path),
            state: RwLock::new(state),
        })
    }

    /// Write the current snapshot to disk (no-op for in-memory stores).
    ///
    /// Called with the write guard still held so a snapshot is never a
    /// torn view of two mutations.
    async fn persist(&self, db: &Database) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(db)?;
        fs::write(path, content).await?;
        debug!(path = %path.display(), "snapshot written");

        Ok(())
    }
}

/// Newest-first by the given timestamp key.
fn sorted_desc<T: Clone, K: Ord>(items: &[T], key: impl Fn(&T) -> K) -> Vec<T> {
    let mut out: Vec<T> = items.to_vec();
    out.sort_by(|a, b| key(b).cmp(&key(a)));
    out
}

#[async_trait]
impl ResourceStore for JsonStore {
    // Posts

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let db = self.state.read().await;
        Ok(sorted_desc(&db.posts, |p| p.published_at))
    }

    async fn find_post_by_slug(&self, slug: &str) -> Result<Option<Post>, StoreError> {
        let db = self.state.read().await;
        Ok(db.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn create_post(&self, new: NewPost) -> Result<Post, StoreError> {
        let mut db = self.state.write().await;
        if db.posts.iter().any(|p| p.slug == new.slug) {
            return Err(StoreError::Duplicate {
                field: "slug",
                value: new.slug,
            });
        }

        let post = Post::create(next_id(&mut db.counters.posts), new);
        db.posts.push(post.clone());
        self.persist(&db).await?;
        Ok(post)
    }

    async fn delete_post(&self, id: i64) -> Result<(), StoreError> {
        let mut db = self.state.write().await;
        db.posts.retain(|p| p.id != id);
        self.persist(&db).await
    }

    // Services

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        let db = self.state.read().await;
        Ok(db.services.clone())
    }

    async fn create_service(&self, new: NewService) -> Result<Service, StoreError> {
        let mut db = self.state.write().await;
        let service = Service::create(next_id(&mut db.counters.services), new);
        db.services.push(service.clone());
        self.persist(&db).await?;
        Ok(service)
    }

    async fn delete_service(&self, id: i64) -> Result<(), StoreError> {
        let mut db = self.state.write().await;
        db.services.retain(|s| s.id != id);
        self.persist(&db).await
    }

    // Inquiries

    async fn list_inquiries(&self) -> Result<Vec<Inquiry>, StoreError> {
        let db = self.state.read().await;
        Ok(sorted_desc(&db.inquiries, |i| i.created_at))
    }

    async fn create_inquiry(&self, new: NewInquiry) -> Result<Inquiry, StoreError> {
        let mut db = self.state.write().await;
        let inquiry = Inquiry::create(next_id(&mut db.counters.inquiries), new);
        db.inquiries.push(inquiry.clone());
        self.persist(&db).await?;
        Ok(inquiry)
    }

    // Users

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let db = self.state.read().await;
        Ok(sorted_desc(&db.users, |u| u.created_at))
    }

    async fn find_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let db = self.state.read().await;
        Ok(db.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let db = self.state.read().await;
        Ok(db.users.iter().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, mut user: User) -> Result<User, StoreError> {
        let mut db = self.state.write().await;
        if db.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate {
                field: "username",
                value: user.username,
            });
        }

        user.id = next_id(&mut db.counters.users);
        db.users.push(user.clone());
        self.persist(&db).await?;
        Ok(user)
    }

    async fn update_user_role(&self, id: i64, role: Role) -> Result<Option<User>, StoreError> {
        let mut db = self.state.write().await;
        let Some(user) = db.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.role = role;
        let updated = user.clone();
        self.persist(&db).await?;
        Ok(Some(updated))
    }

    // Contacts

    async fn list_contacts(&self) -> Result<Vec<Contact>, StoreError> {
        let db = self.state.read().await;
        Ok(sorted_desc(&db.contacts, |c| c.created_at))
    }

    async fn find_contact(&self, id: i64) -> Result<Option<Contact>, StoreError> {
        let db = self.state.read().await;
        Ok(db.contacts.iter().find(|c| c.id == id).cloned())
    }

    async fn create_contact(&self, new: NewContact) -> Result<Contact, StoreError> {
        let mut db = self.state.write().await;
        let contact = Contact::create(next_id(&mut db.counters.contacts), new);
        db.contacts.push(contact.clone());
        self.persist(&db).await?;
        Ok(contact)
    }

    // Leads

    async fn list_leads(&self) -> Result<Vec<Lead>, StoreError> {
        let db = self.state.read().await;
        Ok(sorted_desc(&db.leads, |l| l.created_at))
    }

    async fn find_lead(&self, id: i64) -> Result<Option<Lead>, StoreError> {
        let db = self.state.read().await;
        Ok(db.leads.iter().find(|l| l.id == id).cloned())
    }

    async fn create_lead(&self, new: NewLead) -> Result<Lead, StoreError> {
        let mut db = self.state.write().await;
        let lead = Lead::create(next_id(&mut db.counters.leads), new);
        db.leads.push(lead.clone());
        self.persist(&db).await?;
        Ok(lead)
    }

    async fn update_lead_status(
        &self,
        id: i64,
        status: LeadStage,
    ) -> Result<Option<Lead>, StoreError> {
        let mut db = self.state.write().await;
        let Some(lead) = db.leads.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        lead.status = status;
        let updated = lead.clone();
        self.persist(&db).await?;
        Ok(Some(updated))
    }

    async fn delete_lead(&self, id: i64) -> Result<(), StoreError> {
        let mut db = self.state.write().await;
        db.leads.retain(|l| l.id != id);
        self.persist(&db).await
    }

    // Interactions

    async fn list_interactions(
        &self,
        filter: InteractionFilter,
    ) -> Result<Vec<Interaction>, StoreError> {
        let db = self.state.read().await;
        let matching: Vec<Interaction> = db
            .interactions
            .iter()
            .filter(|i| {
                if let Some(lead_id) = filter.lead_id {
                    if i.lead_id != Some(lead_id) {
                        return false;
                    }
                }
                if let Some(contact_id) = filter.contact_id {
                    if i.contact_id != contact_id {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        Ok(sorted_desc(&matching, |i| i.date))
    }

    async fn create_interaction(
        &self,
        user_id: i64,
        new: NewInteraction,
    ) -> Result<Interaction, StoreError> {
        let mut db = self.state.write().await;
        let interaction =
            Interaction::create(next_id(&mut db.counters.interactions), user_id, new);
        db.interactions.push(interaction.clone());
        self.persist(&db).await?;
        Ok(interaction)
    }

    // Campaigns

    async fn list_campaigns(&self) -> Result<Vec<Campaign>, StoreError> {
        let db = self.state.read().await;
        Ok(sorted_desc(&db.campaigns, |c| c.created_at))
    }

    async fn find_campaign(&self, id: i64) -> Result<Option<Campaign>, StoreError> {
        let db = self.state.read().await;
        Ok(db.campaigns.iter().find(|c| c.id == id).cloned())
    }

    async fn create_campaign(&self, new: NewCampaign) -> Result<Campaign, StoreError> {
        let mut db = self.state.write().await;
        let campaign = Campaign::create(next_id(&mut db.counters.campaigns), new);
        db.campaigns.push(campaign.clone());
        self.persist(&db).await?;
        Ok(campaign)
    }

    async fn update_campaign_status(
        &self,
        id: i64,
        status: CampaignStage,
    ) -> Result<Option<Campaign>, StoreError> {
        let mut db = self.state.write().await;
        let Some(campaign) = db.campaigns.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        campaign.status = status;
        let updated = campaign.clone();
        self.persist(&db).await?;
        Ok(Some(updated))
    }

    async fn delete_campaign(&self, id: i64) -> Result<(), StoreError> {
        let mut db = self.state.write().await;
        db.campaigns.retain(|c| c.id != id);
        self.persist(&db).await
    }

    // Tasks

    async fn list_tasks(&self, assigned_to: Option<i64>) -> Result<Vec<Task>, StoreError> {
        let db = self.state.read().await;
        let matching: Vec<Task> = db
            .tasks
            .iter()
            .filter(|t| assigned_to.map_or(true, |user| t.assigned_to == user))
            .cloned()
            .collect();
        Ok(sorted_desc(&matching, |t| t.created_at))
    }

    async fn find_task(&self, id: i64) -> Result<Option<Task>, StoreError> {
        let db = self.state.read().await;
        Ok(db.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn create_task(&self, created_by: i64, new: NewTask) -> Result<Task, StoreError> {
        let mut db = self.state.write().await;
        let task = Task::create(next_id(&mut db.counters.tasks), created_by, new);
        db.tasks.push(task.clone());
        self.persist(&db).await?;
        Ok(task)
    }

    async fn update_task_status(
        &self,
        id: i64,
        status: TaskStage,
    ) -> Result<Option<Task>, StoreError> {
        let mut db = self.state.write().await;
        let Some(task) = db.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        task.status = status;
        let updated = task.clone();
        self.persist(&db).await?;
        Ok(Some(updated))
    }

    async fn delete_task(&self, id: i64) -> Result<(), StoreError> {
        let mut db = self.state.write().await;
        db.tasks.retain(|t| t.id != id);
        self.persist(&db).await
    }

    // Site settings

    async fn site_settings(&self) -> Result<SiteSettings, StoreError> {
        {
            let db = self.state.read().await;
            if let Some(settings) = &db.site_settings {
                return Ok(settings.clone());
            }
        }

        // First read seeds the defaults
        let mut db = self.state.write().await;
        let settings = db
            .site_settings
            .get_or_insert_with(SiteSettings::default)
            .clone();
        self.persist(&db).await?;
        Ok(settings)
    }

    async fn update_site_settings(
        &self,
        patch: SiteSettingsPatch,
    ) -> Result<SiteSettings, StoreError> {
        let mut db = self.state.write().await;
        let settings = db.site_settings.get_or_insert_with(SiteSettings::default);
        settings.apply(patch);
        let updated = settings.clone();
        self.persist(&db).await?;
        Ok(updated)
    }

    // Hero slides

    async fn list_hero_slides(&self) -> Result<Vec<HeroSlide>, StoreError> {
        let db = self.state.read().await;
        let mut slides = db.hero_slides.clone();
        slides.sort_by_key(|s| (s.order, s.id));
        Ok(slides)
    }

    async fn create_hero_slide(&self, new: NewHeroSlide) -> Result<HeroSlide, StoreError> {
        let mut db = self.state.write().await;
        let slide = HeroSlide::create(next_id(&mut db.counters.hero_slides), new);
        db.hero_slides.push(slide.clone());
        self.persist(&db).await?;
        Ok(slide)
    }

    async fn update_hero_slide(
        &self,
        id: i64,
        patch: HeroSlidePatch,
    ) -> Result<Option<HeroSlide>, StoreError> {
        let mut db = self.state.write().await;
        let Some(slide) = db.hero_slides.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        slide.apply(patch);
        let updated = slide.clone();
        self.persist(&db).await?;
        Ok(Some(updated))
    }

    async fn delete_hero_slide(&self, id: i64) -> Result<(), StoreError> {
        let mut db = self.state.write().await;
        db.hero_slides.retain(|s| s.id != id);
        self.persist(&db).await
    }

    async fn move_hero_slide(
        &self,
        id: i64,
        direction: SlideDirection,
    ) -> Result<Option<HeroSlide>, StoreError> {
        let mut db = self.state.write().await;

        // Normalize order values to positions first so ties (e.g. several
        // slides created with the default order 0) stay deterministic.
        db.hero_slides.sort_by_key(|s| (s.order, s.id));
        for (position, slide) in db.hero_slides.iter_mut().enumerate() {
            slide.order = position as i32;
        }

        let Some(position) = db.hero_slides.iter().position(|s| s.id == id) else {
            return Ok(None);
        };

        let neighbor = match direction {
            SlideDirection::Up => position.checked_sub(1),
            SlideDirection::Down => {
                let next = position + 1;
                (next < db.hero_slides.len()).then_some(next)
            }
        };

        if let Some(neighbor) = neighbor {
            let other_order = db.hero_slides[neighbor].order;
            db.hero_slides[neighbor].order = db.hero_slides[position].order;
            db.hero_slides[position].order = other_order;
        }

        let moved = db.hero_slides[position].clone();
        self.persist(&db).await?;
        Ok(Some(moved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ContactKind;

    fn new_contact(name: &str) -> NewContact {
        NewContact {
            kind: ContactKind::Individual,
            name: name.to_string(),
            email: None,
            phone: None,
            document: None,
            address: None,
            assigned_to: None,
        }
    }

    fn new_slide(title: &str) -> NewHeroSlide {
        serde_json::from_value(serde_json::json!({
            "title": title,
            "image": format!("{}.jpg", title),
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_never_reused() {
        let store = JsonStore::in_memory();

        let a = store.create_contact(new_contact("a")).await.unwrap();
        let b = store.create_contact(new_contact("b")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);

        store
            .create_lead(NewLead {
                contact_id: b.id,
                status: Default::default(),
                source: None,
                value: None,
                notes: None,
            })
            .await
            .unwrap();
        let lead2 = store
            .create_lead(NewLead {
                contact_id: b.id,
                status: Default::default(),
                source: None,
                value: None,
                notes: None,
            })
            .await
            .unwrap();
        assert_eq!(lead2.id, 2);

        store.delete_lead(2).await.unwrap();
        let lead3 = store
            .create_lead(NewLead {
                contact_id: b.id,
                status: Default::default(),
                source: None,
                value: None,
                notes: None,
            })
            .await
            .unwrap();
        assert_eq!(lead3.id, 3);
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let store = JsonStore::in_memory();
        let new = NewPost {
            title: "Primeiro".to_string(),
            slug: "primeiro".to_string(),
            content: "c".to_string(),
            summary: "s".to_string(),
            cover_image: "img".to_string(),
        };

        store.create_post(new.clone()).await.unwrap();
        let err = store.create_post(new).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { field: "slug", .. }));
    }

    #[tokio::test]
    async fn test_site_settings_seeded_on_first_read() {
        let store = JsonStore::in_memory();
        let settings = store.site_settings().await.unwrap();
        assert_eq!(settings.site_name, "Monteiro Corretora");

        let updated = store
            .update_site_settings(SiteSettingsPatch {
                site_name: Some("Outra".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.site_name, "Outra");
        assert_eq!(store.site_settings().await.unwrap().site_name, "Outra");
    }

    #[tokio::test]
    async fn test_slide_swap_with_neighbor() {
        let store = JsonStore::in_memory();
        let a = store.create_hero_slide(new_slide("a")).await.unwrap();
        let _b = store.create_hero_slide(new_slide("b")).await.unwrap();
        let c = store.create_hero_slide(new_slide("c")).await.unwrap();

        // All created with order 0; listing falls back to id order.
        let titles = |slides: Vec<HeroSlide>| {
            slides.into_iter().map(|s| s.title).collect::<Vec<_>>()
        };
        assert_eq!(
            titles(store.list_hero_slides().await.unwrap()),
            vec!["a", "b", "c"]
        );

        store
            .move_hero_slide(c.id, SlideDirection::Up)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            titles(store.list_hero_slides().await.unwrap()),
            vec!["a", "c", "b"]
        );

        // Moving the first slide up is a no-op.
        store
            .move_hero_slide(a.id, SlideDirection::Up)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            titles(store.list_hero_slides().await.unwrap()),
            vec!["a", "c", "b"]
        );

        assert!(store
            .move_hero_slide(999, SlideDirection::Down)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_interaction_filters() {
        let store = JsonStore::in_memory();
        let contact = store.create_contact(new_contact("x")).await.unwrap();

        for lead_id in [Some(1), Some(2), None] {
            store
                .create_interaction(
                    1,
                    NewInteraction {
                        lead_id,
                        contact_id: contact.id,
                        kind: crate::domain::InteractionKind::Call,
                        description: "ligação".to_string(),
                        date: None,
                    },
                )
                .await
                .unwrap();
        }

        let by_lead = store
            .list_interactions(InteractionFilter {
                lead_id: Some(1),
                contact_id: None,
            })
            .await
            .unwrap();
        assert_eq!(by_lead.len(), 1);

        let by_contact = store
            .list_interactions(InteractionFilter {
                lead_id: None,
                contact_id: Some(contact.id),
            })
            .await
            .unwrap();
        assert_eq!(by_contact.len(), 3);
    }
}
