//! Pipeline Engine Integration Tests
//!
//! Transition semantics: free-form stage jumps, idempotent repeats,
//! vocabulary enforcement, and the authorization policy.

use std::sync::Arc;
use std::time::Duration;

use covera::core::{Denial, PipelineEngine, PipelineError, TaskBoardFilter};
use covera::domain::crm::{NewContact, NewLead, NewTask};
use covera::domain::{ContactKind, LeadStage, Principal, Role, TaskStage};
use covera::store::{JsonStore, ResourceStore};

fn admin() -> Principal {
    Principal::new(1, Role::Admin)
}

fn employee() -> Principal {
    Principal::new(2, Role::Employee)
}

async fn setup() -> (Arc<JsonStore>, PipelineEngine) {
    let store = Arc::new(JsonStore::in_memory());
    let engine = PipelineEngine::new(store.clone());
    (store, engine)
}

async fn seed_lead(store: &JsonStore) -> i64 {
    let contact = store
        .create_contact(NewContact {
            kind: ContactKind::Individual,
            name: "João Pereira".to_string(),
            email: None,
            phone: None,
            document: None,
            address: None,
            assigned_to: None,
        })
        .await
        .unwrap();

    store
        .create_lead(NewLead {
            contact_id: contact.id,
            status: LeadStage::New,
            source: Some("website".to_string()),
            value: None,
            notes: None,
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_stage_jump_skips_intermediates() {
    let (store, engine) = setup().await;
    let lead_id = seed_lead(&store).await;

    // new -> closed directly; no adjacency restriction
    let moved = engine
        .move_lead(lead_id, "closed", Some(&employee()))
        .await
        .unwrap();
    assert_eq!(moved.status, LeadStage::Closed);

    let stored = store.find_lead(lead_id).await.unwrap().unwrap();
    assert_eq!(stored.status, LeadStage::Closed);
}

#[tokio::test]
async fn test_move_to_current_stage_is_idempotent() {
    let (store, engine) = setup().await;
    let lead_id = seed_lead(&store).await;

    let first = engine
        .move_lead(lead_id, "proposal", Some(&employee()))
        .await
        .unwrap();
    let second = engine
        .move_lead(lead_id, "proposal", Some(&employee()))
        .await
        .unwrap();

    assert_eq!(first.status, LeadStage::Proposal);
    assert_eq!(second.status, LeadStage::Proposal);
    assert_eq!(
        store.find_lead(lead_id).await.unwrap().unwrap().status,
        LeadStage::Proposal
    );
}

#[tokio::test]
async fn test_invalid_stage_rejected_without_mutation() {
    let (store, engine) = setup().await;
    let lead_id = seed_lead(&store).await;

    let err = engine
        .move_lead(lead_id, "archived", Some(&employee()))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidStage(_)));

    // A task stage is not a lead stage either.
    let err = engine
        .move_lead(lead_id, "in_progress", Some(&employee()))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidStage(_)));

    assert_eq!(
        store.find_lead(lead_id).await.unwrap().unwrap().status,
        LeadStage::New
    );
}

#[tokio::test]
async fn test_missing_item_is_not_found() {
    let (_store, engine) = setup().await;

    let err = engine
        .move_lead(999, "qualified", Some(&employee()))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::NotFound { .. }));
}

#[tokio::test]
async fn test_unauthenticated_move_is_forbidden_and_unwritten() {
    let (store, engine) = setup().await;
    let lead_id = seed_lead(&store).await;

    let err = engine.move_lead(lead_id, "qualified", None).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Forbidden(Denial::Unauthenticated)
    ));

    assert_eq!(
        store.find_lead(lead_id).await.unwrap().unwrap().status,
        LeadStage::New
    );
}

#[tokio::test]
async fn test_campaign_moves_are_admin_only() {
    let (store, engine) = setup().await;
    let campaign = store
        .create_campaign(covera::domain::crm::NewCampaign {
            name: "Primavera".to_string(),
            platform: covera::domain::CampaignPlatform::Instagram,
            status: Default::default(),
            budget: None,
            start_date: None,
            end_date: None,
        })
        .await
        .unwrap();

    let err = engine
        .move_campaign(campaign.id, "paused", Some(&employee()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Forbidden(Denial::AdminRequired)
    ));

    let moved = engine
        .move_campaign(campaign.id, "paused", Some(&admin()))
        .await
        .unwrap();
    assert_eq!(moved.status, covera::domain::CampaignStage::Paused);
}

#[tokio::test]
async fn test_task_board_filters_and_groups() {
    let (store, engine) = setup().await;

    // Three tasks for user 7 (one per stage) and one for user 8.
    for (title, status, assigned_to) in [
        ("ligar para cliente", TaskStage::Todo, 7),
        ("preparar proposta", TaskStage::InProgress, 7),
        ("enviar apólice", TaskStage::Done, 7),
        ("outra pessoa", TaskStage::Todo, 8),
    ] {
        store
            .create_task(
                1,
                NewTask {
                    title: title.to_string(),
                    description: None,
                    status,
                    priority: Default::default(),
                    assigned_to,
                    due_date: None,
                },
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let board = engine
        .task_board(
            TaskBoardFilter {
                assigned_to: Some(7),
            },
            Some(&employee()),
        )
        .await
        .unwrap();

    // Exactly one column per task stage, in vocabulary order.
    assert_eq!(board.columns.len(), 3);
    assert_eq!(board.columns[0].stage, TaskStage::Todo);
    assert_eq!(board.columns[1].stage, TaskStage::InProgress);
    assert_eq!(board.columns[2].stage, TaskStage::Done);

    // Only user 7's tasks appear.
    assert_eq!(board.len(), 3);
    for column in &board.columns {
        for task in &column.items {
            assert_eq!(task.assigned_to, 7);
        }
    }
}

#[tokio::test]
async fn test_board_buckets_are_newest_first() {
    let (store, engine) = setup().await;

    for title in ["primeira", "segunda", "terceira"] {
        store
            .create_task(
                1,
                NewTask {
                    title: title.to_string(),
                    description: None,
                    status: TaskStage::Todo,
                    priority: Default::default(),
                    assigned_to: 7,
                    due_date: None,
                },
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let board = engine
        .task_board(TaskBoardFilter::default(), Some(&employee()))
        .await
        .unwrap();

    let titles: Vec<&str> = board.columns[0]
        .items
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, vec!["terceira", "segunda", "primeira"]);
}

#[tokio::test]
async fn test_delete_succeeds_in_any_stage() {
    let (store, engine) = setup().await;
    let lead_id = seed_lead(&store).await;

    engine
        .move_lead(lead_id, "lost", Some(&employee()))
        .await
        .unwrap();

    // "lost" is not terminal-and-locking: delete still works.
    store.delete_lead(lead_id).await.unwrap();
    assert!(store.find_lead(lead_id).await.unwrap().is_none());

    // Deleting again is quietly idempotent.
    store.delete_lead(lead_id).await.unwrap();
}

#[tokio::test]
async fn test_moving_lead_does_not_touch_parent_contact() {
    let (store, engine) = setup().await;
    let lead_id = seed_lead(&store).await;

    let contacts_before = store.list_contacts().await.unwrap();
    engine
        .move_lead(lead_id, "negotiation", Some(&employee()))
        .await
        .unwrap();
    let contacts_after = store.list_contacts().await.unwrap();

    assert_eq!(contacts_before.len(), contacts_after.len());
    assert_eq!(contacts_before[0].name, contacts_after[0].name);
    assert_eq!(contacts_before[0].created_at, contacts_after[0].created_at);
}
