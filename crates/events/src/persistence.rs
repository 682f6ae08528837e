//! Activity log writer.
//!
//! [`EventPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes every received [`PlatformEvent`] to `activity_logs`. It runs
//! as a long-lived background task and stops when the bus sender is
//! dropped.

use sangam_core::types::DbId;
use sangam_db::models::activity::CreateActivityLog;
use sangam_db::repositories::ActivityRepo;
use sangam_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

/// Background service that persists platform events to the activity log.
pub struct EventPersistence;

impl EventPersistence {
    /// Run the persistence loop until the channel is closed.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PlatformEvent>) {
        tracing::info!("Activity log writer started");
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to persist event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Event persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Write a single event as an activity log row.
    async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<DbId, sqlx::Error> {
        ActivityRepo::create(pool, &Self::to_log(event)).await
    }

    fn to_log(event: &PlatformEvent) -> CreateActivityLog {
        CreateActivityLog {
            user_id: event.actor_user_id,
            action: event.event_type.clone(),
            entity_type: event.source_entity_type.clone(),
            entity_id: event.source_entity_id,
            details: event.payload.clone(),
        }
    }
}
