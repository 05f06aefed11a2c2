//! Resource Store Integration Tests
//!
//! CRUD listing order, snapshot persistence across reopen, and the
//! hero-slide manual reorder.

use std::time::Duration;

use tempfile::TempDir;

use covera::domain::content::{NewHeroSlide, NewPost};
use covera::domain::crm::{NewContact, NewLead};
use covera::domain::{ContactKind, LeadStage};
use covera::store::{JsonStore, ResourceStore, SlideDirection};

fn contact(name: &str) -> NewContact {
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

fn post(title: &str, slug: &str) -> NewPost {
    NewPost {
        title: title.to_string(),
        slug: slug.to_string(),
        content: "conteúdo".to_string(),
        summary: "resumo".to_string(),
        cover_image: "capa.jpg".to_string(),
    }
}

fn slide(title: &str, order: i32) -> NewHeroSlide {
    serde_json::from_value(serde_json::json!({
        "title": title,
        "image": format!("{}.jpg", title),
        "order": order,
    }))
    .unwrap()
}

#[tokio::test]
async fn test_listings_are_newest_first() {
    let store = JsonStore::in_memory();

    for name in ["antiga", "média", "recente"] {
        store.create_contact(contact(name)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let names: Vec<String> = store
        .list_contacts()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["recente", "média", "antiga"]);
}

#[tokio::test]
async fn test_posts_listed_by_publish_date_and_found_by_slug() {
    let store = JsonStore::in_memory();

    store.create_post(post("Primeiro", "primeiro")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(2)).await;
    store.create_post(post("Segundo", "segundo")).await.unwrap();

    let posts = store.list_posts().await.unwrap();
    assert_eq!(posts[0].title, "Segundo");

    let found = store.find_post_by_slug("primeiro").await.unwrap().unwrap();
    assert_eq!(found.title, "Primeiro");
    assert!(store.find_post_by_slug("nada").await.unwrap().is_none());
}

#[tokio::test]
async fn test_snapshot_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("covera.json");

    let lead_id;
    {
        let store = JsonStore::open(path.clone()).await.unwrap();
        let contact = store.create_contact(contact("Dona Clara")).await.unwrap();
        let lead = store
            .create_lead(NewLead {
                contact_id: contact.id,
                status: LeadStage::Negotiation,
                source: Some("indicação".to_string()),
                value: Some("R$ 1.200".to_string()),
                notes: None,
            })
            .await
            .unwrap();
        lead_id = lead.id;
    }

    // Reopen from the same file: everything written is still there.
    let reopened = JsonStore::open(path).await.unwrap();
    let lead = reopened.find_lead(lead_id).await.unwrap().unwrap();
    assert_eq!(lead.status, LeadStage::Negotiation);
    assert_eq!(lead.value.as_deref(), Some("R$ 1.200"));

    let contacts = reopened.list_contacts().await.unwrap();
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0].name, "Dona Clara");

    // Id allocation continues after the ones already taken.
    let next = reopened.create_contact(contact("Novo")).await.unwrap();
    assert_eq!(next.id, 2);
}

#[tokio::test]
async fn test_hero_slides_listed_ascending_and_swapped() {
    let store = JsonStore::in_memory();

    let _first = store.create_hero_slide(slide("primeiro", 0)).await.unwrap();
    let second = store.create_hero_slide(slide("segundo", 1)).await.unwrap();
    let _third = store.create_hero_slide(slide("terceiro", 2)).await.unwrap();

    let titles = |slides: Vec<covera::domain::HeroSlide>| {
        slides.into_iter().map(|s| s.title).collect::<Vec<_>>()
    };

    assert_eq!(
        titles(store.list_hero_slides().await.unwrap()),
        vec!["primeiro", "segundo", "terceiro"]
    );

    // Swap "segundo" down past "terceiro".
    store
        .move_hero_slide(second.id, SlideDirection::Down)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        titles(store.list_hero_slides().await.unwrap()),
        vec!["primeiro", "terceiro", "segundo"]
    );

    // Moving the now-last slide down is a no-op.
    store
        .move_hero_slide(second.id, SlideDirection::Down)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        titles(store.list_hero_slides().await.unwrap()),
        vec!["primeiro", "terceiro", "segundo"]
    );
}

#[tokio::test]
async fn test_deletes_are_idempotent() {
    let store = JsonStore::in_memory();
    let created = store.create_post(post("Um", "um")).await.unwrap();

    store.delete_post(created.id).await.unwrap();
    store.delete_post(created.id).await.unwrap();
    assert!(store.list_posts().await.unwrap().is_empty());

    // Deleting something that never existed is fine too.
    store.delete_task(12345).await.unwrap();
}

#[tokio::test]
async fn test_settings_persist_across_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("covera.json");

    {
        let store = JsonStore::open(path.clone()).await.unwrap();
        store
            .update_site_settings(covera::domain::SiteSettingsPatch {
                site_name: Some("Corretora Central".to_string()),
                contact_email: Some("oi@central.com".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
    }

    let reopened = JsonStore::open(path).await.unwrap();
    let settings = reopened.site_settings().await.unwrap();
    assert_eq!(settings.site_name, "Corretora Central");
    assert_eq!(settings.contact_email, "oi@central.com");
    // Untouched fields keep their defaults.
    assert_eq!(settings.primary_color, "#0f172a");
}
