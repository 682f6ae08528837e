//! Repository for the group chat (`community_messages`) and direct
//! messages (`community_dm`).

use sqlx::PgPool;
use sangam_core::community::Participant;

use crate::models::community::{ChatMessage, DirectMessage, UnreadCount};

const MESSAGE_COLUMNS: &str =
    "id, sender_type, sender_id, sender_name, content, created_at, updated_at";

const DM_COLUMNS: &str = "id, sender_type, sender_id, sender_name, receiver_type, receiver_id, \
                          receiver_name, content, is_read, created_at, updated_at";

pub struct ChatRepo;

impl ChatRepo {
    pub async fn post_message(
        pool: &PgPool,
        sender: &Participant,
        content: &str,
    ) -> Result<ChatMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO community_messages (sender_type, sender_id, sender_name, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {MESSAGE_COLUMNS}"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(&sender.author_type)
            .bind(sender.id)
            .bind(&sender.name)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// The most recent `limit` messages in ascending order.
    pub async fn recent_messages(pool: &PgPool, limit: i64) -> Result<Vec<ChatMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM (
                SELECT {MESSAGE_COLUMNS} FROM community_messages
                ORDER BY created_at DESC, id DESC
                LIMIT $1
             ) recent
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, ChatMessage>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Direct messages
    // -----------------------------------------------------------------------

    pub async fn send_dm(
        pool: &PgPool,
        sender: &Participant,
        receiver: &Participant,
        content: &str,
    ) -> Result<DirectMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO community_dm
                (sender_type, sender_id, sender_name, receiver_type, receiver_id, receiver_name,
                 content)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {DM_COLUMNS}"
        );
        sqlx::query_as::<_, DirectMessage>(&query)
            .bind(&sender.author_type)
            .bind(sender.id)
            .bind(&sender.name)
            .bind(&receiver.author_type)
            .bind(receiver.id)
            .bind(&receiver.name)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// Both directions of a conversation in ascending order.
    ///
    /// Messages addressed to `me` are marked read first, so the returned
    /// rows reflect that.
    pub async fn conversation(
        pool: &PgPool,
        me: &Participant,
        peer_type: &str,
        peer_id: i64,
    ) -> Result<Vec<DirectMessage>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "UPDATE community_dm SET is_read = true
             WHERE receiver_type = $1 AND receiver_id = $2
               AND sender_type = $3 AND sender_id = $4
               AND is_read = false",
        )
        .bind(&me.author_type)
        .bind(me.id)
        .bind(peer_type)
        .bind(peer_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "SELECT {DM_COLUMNS} FROM community_dm
             WHERE (sender_type = $1 AND sender_id = $2 AND receiver_type = $3 AND receiver_id = $4)
                OR (sender_type = $3 AND sender_id = $4 AND receiver_type = $1 AND receiver_id = $2)
             ORDER BY created_at ASC, id ASC"
        );
        let messages = sqlx::query_as::<_, DirectMessage>(&query)
            .bind(&me.author_type)
            .bind(me.id)
            .bind(peer_type)
            .bind(peer_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(messages)
    }

    /// Unread messages addressed to `me`, grouped by sender.
    pub async fn unread_counts(
        pool: &PgPool,
        me: &Participant,
    ) -> Result<Vec<UnreadCount>, sqlx::Error> {
        sqlx::query_as::<_, UnreadCount>(
            "SELECT sender_type, sender_id, MAX(sender_name) AS sender_name, COUNT(*) AS count
             FROM community_dm
             WHERE receiver_type = $1 AND receiver_id = $2 AND is_read = false
             GROUP BY sender_type, sender_id
             ORDER BY count DESC, sender_name",
        )
        .bind(&me.author_type)
        .bind(me.id)
        .fetch_all(pool)
        .await
    }
}
