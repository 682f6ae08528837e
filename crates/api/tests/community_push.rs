//! Delivery of community events over `/ws`.
//!
//! Drives `NotificationRouter` against a real database with sockets
//! registered directly on the `WsManager`.

use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::ws::Message;
use sangam_api::notifications::router::NotificationRouter;
use sangam_api::ws::WsManager;
use sangam_core::event_types::{COMMUNITY_DM_SENT, COMMUNITY_MESSAGE_SENT};
use sangam_db::models::community::{CreateCommunityMember, CreateStudent};
use sangam_db::models::profile::CreateProfile;
use sangam_db::repositories::{CommunityMemberRepo, ProfileRepo, StudentRepo};
use sangam_events::{EventBus, PlatformEvent};
use serde_json::json;
use sqlx::PgPool;

async fn user(pool: &PgPool, email: &str) -> i64 {
    let input = CreateProfile {
        email: email.to_string(),
        password_hash: "hash".to_string(),
        full_name: email.to_string(),
        phone: None,
        role: "user".to_string(),
    };
    ProfileRepo::create(pool, &input).await.unwrap().id
}

async fn student(pool: &PgPool, email: &str, status: &str) -> i64 {
    let user_id = user(pool, email).await;
    let input = CreateStudent {
        name: format!("Student {email}"),
        email: email.to_string(),
        ..Default::default()
    };
    StudentRepo::create(pool, &input, user_id, status).await.unwrap();
    user_id
}

async fn member(pool: &PgPool, email: &str, status: &str) -> i64 {
    let user_id = user(pool, email).await;
    let input = CreateCommunityMember {
        name: format!("Member {email}"),
        email: email.to_string(),
        ..Default::default()
    };
    CommunityMemberRepo::create(pool, &input, user_id, status)
        .await
        .unwrap();
    user_id
}

/// Publish `events` through a router and wait for it to drain them.
async fn route(pool: PgPool, ws_manager: Arc<WsManager>, events: Vec<PlatformEvent>) {
    let bus = EventBus::default();
    let router = NotificationRouter::new(pool, ws_manager);
    let handle = tokio::spawn(router.run(bus.subscribe()));
    for event in events {
        bus.publish(event);
    }
    drop(bus);
    handle.await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn chat_reaches_only_approved_participants(pool: PgPool) {
    let student_id = student(&pool, "ravi@example.org", "approved").await;
    let member_id = member(&pool, "meera@example.org", "approved").await;
    let pending_id = member(&pool, "pending@example.org", "pending").await;
    let rejected_id = student(&pool, "rejected@example.org", "rejected").await;
    let outsider_id = user(&pool, "outsider@example.org").await;

    let ws_manager = Arc::new(WsManager::new());
    let mut to_student = ws_manager.add("s".to_string(), student_id).await;
    let mut to_member = ws_manager.add("m".to_string(), member_id).await;
    let mut to_pending = ws_manager.add("p".to_string(), pending_id).await;
    let mut to_rejected = ws_manager.add("r".to_string(), rejected_id).await;
    let mut to_outsider = ws_manager.add("o".to_string(), outsider_id).await;

    let chat = PlatformEvent::new(COMMUNITY_MESSAGE_SENT)
        .with_payload(json!({ "id": 1, "content": "private hub chat" }));
    route(pool, ws_manager, vec![chat]).await;

    assert_matches!(
        to_student.try_recv(),
        Ok(Message::Text(t)) if t.as_str().contains("private hub chat")
    );
    assert_matches!(to_member.try_recv(), Ok(Message::Text(_)));
    assert!(to_pending.try_recv().is_err());
    assert!(to_rejected.try_recv().is_err());
    assert!(to_outsider.try_recv().is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn direct_message_reaches_only_the_receiver(pool: PgPool) {
    let receiver_id = student(&pool, "ravi@example.org", "approved").await;
    let bystander_id = member(&pool, "meera@example.org", "approved").await;

    let ws_manager = Arc::new(WsManager::new());
    let mut to_receiver = ws_manager.add("r".to_string(), receiver_id).await;
    let mut to_bystander = ws_manager.add("b".to_string(), bystander_id).await;

    let dm = PlatformEvent::new(COMMUNITY_DM_SENT).with_payload(json!({
        "message": { "id": 7, "content": "see you at the library" },
        "recipient_user_id": receiver_id,
    }));
    route(pool, ws_manager, vec![dm]).await;

    assert_matches!(
        to_receiver.try_recv(),
        Ok(Message::Text(t)) if t.as_str().contains("see you at the library")
    );
    assert!(to_bystander.try_recv().is_err());
}
