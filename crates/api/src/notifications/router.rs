//! Event routing engine.
//!
//! Two kinds of delivery:
//! - community posts, replies and chat messages go to the sockets of
//!   connected approved participants; direct messages go only to the
//!   receiver's sockets;
//! - events whose payload names a `recipient_user_id` become a row in
//!   `notifications`, which is then pushed to that user's sockets.

use std::sync::Arc;

use axum::extract::ws::Message;
use sangam_core::donations::{PAYMENT_COMPLETED, PAYMENT_FAILED, PAYMENT_REFUNDED};
use sangam_core::event_types::{
    is_community_event, COMMUNITY_DM_SENT, COMMUNITY_MEMBER_REVIEWED, DONATION_STATUS_CHANGED,
    EVENT_REGISTERED, REGISTRATION_CANCELLED, VOLUNTEER_REVIEWED,
};
use sangam_core::notifications::{KIND_INFO, KIND_SUCCESS, KIND_WARNING};
use sangam_core::types::DbId;
use sangam_db::models::notification::CreateNotification;
use sangam_db::repositories::{NotificationRepo, ParticipantRepo};
use sangam_db::DbPool;
use sangam_events::PlatformEvent;
use serde_json::json;
use tokio::sync::broadcast;

use crate::ws::WsManager;

/// Frame type for a freshly created in-app notification.
pub const FRAME_NOTIFICATION: &str = "notification";

/// Payload key naming the account an event is addressed to.
pub const RECIPIENT_KEY: &str = "recipient_user_id";

/// Title, body and link of an in-app notification before it has a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDraft {
    pub title: String,
    pub message: String,
    pub kind: &'static str,
    pub link: Option<String>,
}

/// Routes platform events to sockets and notification rows.
pub struct NotificationRouter {
    pool: DbPool,
    ws_manager: Arc<WsManager>,
}

impl NotificationRouter {
    pub fn new(pool: DbPool, ws_manager: Arc<WsManager>) -> Self {
        Self { pool, ws_manager }
    }

    /// Run the routing loop until the [`EventBus`](sangam_events::EventBus)
    /// is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    async fn route_event(&self, event: &PlatformEvent) -> Result<(), sqlx::Error> {
        if is_community_event(&event.event_type) {
            self.push_community(event).await?;
        }

        if let (Some(user_id), Some(draft)) = (recipient(event), compose_notification(event)) {
            self.notify(user_id, draft).await?;
        }

        Ok(())
    }

    /// Push a community event to the sockets that should see it.
    async fn push_community(&self, event: &PlatformEvent) -> Result<(), sqlx::Error> {
        let frame = Message::Text(community_frame(event).to_string().into());

        if event.event_type == COMMUNITY_DM_SENT {
            match recipient(event) {
                Some(user_id) => {
                    let delivered = self.ws_manager.send_to_user(user_id, frame).await;
                    tracing::debug!(user_id, delivered, "Direct message pushed");
                }
                None => tracing::debug!("Direct message receiver has no linked account"),
            }
            return Ok(());
        }

        let connected = self.ws_manager.connected_user_ids().await;
        if connected.is_empty() {
            return Ok(());
        }
        // Membership can change while a socket is open, so resolve per event.
        let participants = ParticipantRepo::participant_user_ids(&self.pool, &connected).await?;
        let delivered = self.ws_manager.send_to_users(&participants, frame).await;
        tracing::debug!(event_type = %event.event_type, delivered, "Community event pushed");
        Ok(())
    }

    /// Persist a notification and push it to the recipient's sockets.
    async fn notify(&self, user_id: DbId, draft: NotificationDraft) -> Result<(), sqlx::Error> {
        let notification = NotificationRepo::create(
            &self.pool,
            &CreateNotification {
                user_id,
                title: draft.title,
                message: draft.message,
                kind: draft.kind.to_string(),
                link: draft.link,
            },
        )
        .await?;

        let frame = json!({ "type": FRAME_NOTIFICATION, "data": notification });
        self.ws_manager
            .send_to_user(user_id, Message::Text(frame.to_string().into()))
            .await;
        Ok(())
    }
}

/// The account an event is addressed to, if any.
pub fn recipient(event: &PlatformEvent) -> Option<DbId> {
    event.payload.get(RECIPIENT_KEY).and_then(|v| v.as_i64())
}

/// WebSocket frame for a community event: `{"type": ..., "data": ...}`.
///
/// Direct messages carry the row under `message`; other community events
/// carry the row as the whole payload.
pub fn community_frame(event: &PlatformEvent) -> serde_json::Value {
    let data = if event.event_type == COMMUNITY_DM_SENT {
        event.payload.get("message").cloned().unwrap_or_default()
    } else {
        event.payload.clone()
    };
    json!({ "type": event.event_type, "data": data })
}

fn payload_str<'a>(event: &'a PlatformEvent, key: &str) -> &'a str {
    event.payload.get(key).and_then(|v| v.as_str()).unwrap_or("")
}

/// The in-app notification an event produces, if it produces one.
pub fn compose_notification(event: &PlatformEvent) -> Option<NotificationDraft> {
    let draft = |title: &str, message: String, kind: &'static str, link: &str| NotificationDraft {
        title: title.to_string(),
        message,
        kind,
        link: Some(link.to_string()),
    };

    match event.event_type.as_str() {
        DONATION_STATUS_CHANGED => {
            let amount = payload_str(event, "amount");
            match payload_str(event, "to") {
                PAYMENT_COMPLETED => Some(draft(
                    "Donation confirmed",
                    format!("Thank you! Your donation of Rs. {amount} has been received."),
                    KIND_SUCCESS,
                    "/me/donations",
                )),
                PAYMENT_FAILED => Some(draft(
                    "Donation payment failed",
                    format!("We could not confirm your donation of Rs. {amount}."),
                    KIND_WARNING,
                    "/me/donations",
                )),
                PAYMENT_REFUNDED => Some(draft(
                    "Donation refunded",
                    format!("Your donation of Rs. {amount} has been refunded."),
                    KIND_INFO,
                    "/me/donations",
                )),
                _ => None,
            }
        }
        VOLUNTEER_REVIEWED => {
            let status = payload_str(event, "status");
            Some(draft(
                "Volunteer application reviewed",
                format!("Your volunteer application is now {status}."),
                if status == "approved" { KIND_SUCCESS } else { KIND_INFO },
                "/volunteer",
            ))
        }
        COMMUNITY_MEMBER_REVIEWED => {
            let status = payload_str(event, "status");
            Some(draft(
                "Community membership reviewed",
                format!("Your community membership request is now {status}."),
                if status == "approved" { KIND_SUCCESS } else { KIND_INFO },
                "/community",
            ))
        }
        EVENT_REGISTERED => Some(draft(
            "Registration confirmed",
            format!("You are registered for {}.", payload_str(event, "event_title")),
            KIND_SUCCESS,
            "/me/registrations",
        )),
        REGISTRATION_CANCELLED => Some(draft(
            "Registration cancelled",
            format!(
                "Your registration for {} was cancelled.",
                payload_str(event, "event_title")
            ),
            KIND_INFO,
            "/me/registrations",
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use sangam_core::event_types::{BOOK_CREATED, COMMUNITY_MESSAGE_SENT};

    use super::*;

    #[test]
    fn completed_donation_notifies_donor() {
        let event = PlatformEvent::new(DONATION_STATUS_CHANGED).with_payload(json!({
            "from": "pending", "to": "completed", "amount": "500.00", RECIPIENT_KEY: 9
        }));
        assert_eq!(recipient(&event), Some(9));
        let draft = compose_notification(&event).expect("completed donations notify");
        assert_eq!(draft.kind, KIND_SUCCESS);
        assert!(draft.message.contains("Rs. 500.00"));
    }

    #[test]
    fn pending_transition_is_silent() {
        let event = PlatformEvent::new(DONATION_STATUS_CHANGED)
            .with_payload(json!({ "from": "failed", "to": "pending" }));
        assert_eq!(compose_notification(&event), None);
        assert_eq!(recipient(&event), None);
    }

    #[test]
    fn unrelated_events_produce_nothing() {
        assert_eq!(compose_notification(&PlatformEvent::new(BOOK_CREATED)), None);
    }

    #[test]
    fn dm_frame_unwraps_message() {
        let event = PlatformEvent::new(COMMUNITY_DM_SENT).with_payload(json!({
            "message": { "id": 3, "content": "hi" }, RECIPIENT_KEY: 4
        }));
        let frame = community_frame(&event);
        assert_eq!(frame["type"], COMMUNITY_DM_SENT);
        assert_eq!(frame["data"]["content"], "hi");
    }

    #[test]
    fn chat_frame_carries_payload() {
        let event = PlatformEvent::new(COMMUNITY_MESSAGE_SENT)
            .with_payload(json!({ "id": 1, "content": "namaste" }));
        assert_eq!(community_frame(&event)["data"]["content"], "namaste");
    }
}
