//! Repository for `events` and `event_registrations`.

use sqlx::PgPool;
use sangam_core::error::CoreError;
use sangam_core::events::{check_registration_open, check_seat_available, holds_seat, REG_CANCELLED};
use sangam_core::types::DbId;

use crate::error::RepoError;
use crate::models::event::{
    CreateEvent, CreateRegistration, Event, EventFilter, EventRegistration,
    RegistrationWithEvent, UpdateEvent, UpdateRegistration,
};

const COLUMNS: &str = "id, title, slug, description, event_type, status, start_date, end_date, \
                       location, venue_address, is_online, online_link, cover_image, capacity, \
                       registered_count, organizer_id, is_featured, is_published, \
                       created_at, updated_at";

const REG_COLUMNS: &str = "id, event_id, user_id, name, email, phone, status, attended, \
                           registered_at, created_at, updated_at";

pub struct EventRepo;

impl EventRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateEvent,
        slug: &str,
        organizer_id: DbId,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events
                (title, slug, description, event_type, status, start_date, end_date, location,
                 venue_address, is_online, online_link, cover_image, capacity, organizer_id,
                 is_featured, is_published)
             VALUES ($1, $2, $3, COALESCE($4, 'other'), COALESCE($5, 'upcoming'), $6, $7, $8,
                     $9, COALESCE($10, false), $11, $12, $13, $14, COALESCE($15, false),
                     COALESCE($16, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&input.title)
            .bind(slug)
            .bind(&input.description)
            .bind(&input.event_type)
            .bind(&input.status)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.location)
            .bind(&input.venue_address)
            .bind(input.is_online)
            .bind(&input.online_link)
            .bind(&input.cover_image)
            .bind(input.capacity)
            .bind(organizer_id)
            .bind(input.is_featured)
            .bind(input.is_published)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List events by start date, soonest first.
    pub async fn list(pool: &PgPool, filter: &EventFilter) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE ($1::TEXT IS NULL OR status = $1)
               AND ($2 = false OR is_published = true)
             ORDER BY start_date, id"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(&filter.status)
            .bind(filter.published_only)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                description = COALESCE($4, description),
                event_type = COALESCE($5, event_type),
                status = COALESCE($6, status),
                start_date = COALESCE($7, start_date),
                end_date = COALESCE($8, end_date),
                location = COALESCE($9, location),
                venue_address = COALESCE($10, venue_address),
                is_online = COALESCE($11, is_online),
                online_link = COALESCE($12, online_link),
                cover_image = COALESCE($13, cover_image),
                capacity = COALESCE($14, capacity),
                is_featured = COALESCE($15, is_featured),
                is_published = COALESCE($16, is_published)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.description)
            .bind(&input.event_type)
            .bind(&input.status)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.location)
            .bind(&input.venue_address)
            .bind(input.is_online)
            .bind(&input.online_link)
            .bind(&input.cover_image)
            .bind(input.capacity)
            .bind(input.is_featured)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Registrations
    // -----------------------------------------------------------------------

    /// Register for a published event.
    ///
    /// Locks the event row, checks it is open with a free seat and that the
    /// email is not already registered, then bumps `registered_count`.
    pub async fn register(
        pool: &PgPool,
        event_id: DbId,
        input: &CreateRegistration,
        user_id: Option<DbId>,
    ) -> Result<EventRegistration, RepoError> {
        let mut tx = pool.begin().await?;

        let event: Option<(String, Option<i32>, i32, bool)> = sqlx::query_as(
            "SELECT status, capacity, registered_count, is_published
             FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((status, capacity, registered_count, true)) = event else {
            return Err(CoreError::NotFound {
                entity: "Event",
                id: event_id,
            }
            .into());
        };
        check_registration_open(&status, capacity, registered_count)?;

        let (taken,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                SELECT 1 FROM event_registrations
                WHERE event_id = $1 AND lower(email) = lower($2) AND status <> $3
             )",
        )
        .bind(event_id)
        .bind(&input.email)
        .bind(REG_CANCELLED)
        .fetch_one(&mut *tx)
        .await?;
        if taken {
            return Err(
                CoreError::Conflict("This email is already registered".to_string()).into(),
            );
        }

        // A cancelled registration for the same email is revived in place.
        let query = format!(
            "INSERT INTO event_registrations (event_id, user_id, name, email, phone)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_event_registrations_event_id_email DO UPDATE SET
                user_id = COALESCE(EXCLUDED.user_id, event_registrations.user_id),
                name = EXCLUDED.name,
                phone = EXCLUDED.phone,
                status = 'registered',
                attended = false,
                registered_at = NOW()
             RETURNING {REG_COLUMNS}"
        );
        let registration = sqlx::query_as::<_, EventRegistration>(&query)
            .bind(event_id)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("UPDATE events SET registered_count = registered_count + 1 WHERE id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(registration)
    }

    pub async fn list_registrations(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<EventRegistration>, sqlx::Error> {
        let query = format!(
            "SELECT {REG_COLUMNS} FROM event_registrations
             WHERE event_id = $1
             ORDER BY registered_at"
        );
        sqlx::query_as::<_, EventRegistration>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Registrations belonging to a user, by user id or email.
    pub async fn list_registrations_for_user(
        pool: &PgPool,
        user_id: DbId,
        email: &str,
    ) -> Result<Vec<RegistrationWithEvent>, sqlx::Error> {
        sqlx::query_as::<_, RegistrationWithEvent>(
            "SELECT r.id, r.event_id, e.title AS event_title, e.start_date AS event_start_date,
                    e.status AS event_status, r.status, r.attended, r.registered_at
             FROM event_registrations r
             JOIN events e ON e.id = r.event_id
             WHERE r.user_id = $1 OR lower(r.email) = lower($2)
             ORDER BY e.start_date DESC",
        )
        .bind(user_id)
        .bind(email)
        .fetch_all(pool)
        .await
    }

    /// Admin update of a registration.
    ///
    /// Moving into or out of `cancelled` releases or takes a seat; taking
    /// one is refused when the event is full.
    pub async fn update_registration(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRegistration,
    ) -> Result<Option<EventRegistration>, RepoError> {
        let mut tx = pool.begin().await?;

        let current: Option<(DbId, String)> = sqlx::query_as(
            "SELECT event_id, status FROM event_registrations WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((event_id, current_status)) = current else {
            return Ok(None);
        };

        if let Some(next) = input.status.as_deref() {
            let seat_delta = i32::from(holds_seat(next)) - i32::from(holds_seat(&current_status));
            if seat_delta > 0 {
                let (capacity, registered_count): (Option<i32>, i32) = sqlx::query_as(
                    "SELECT capacity, registered_count FROM events WHERE id = $1 FOR UPDATE",
                )
                .bind(event_id)
                .fetch_one(&mut *tx)
                .await?;
                check_seat_available(capacity, registered_count)?;
            }
            if seat_delta != 0 {
                sqlx::query(
                    "UPDATE events SET registered_count = GREATEST(registered_count + $2, 0)
                     WHERE id = $1",
                )
                .bind(event_id)
                .bind(seat_delta)
                .execute(&mut *tx)
                .await?;
            }
        }

        let query = format!(
            "UPDATE event_registrations SET
                status = COALESCE($2, status),
                attended = COALESCE($3, attended)
             WHERE id = $1
             RETURNING {REG_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, EventRegistration>(&query)
            .bind(id)
            .bind(&input.status)
            .bind(input.attended)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Cancel one of the caller's own registrations.
    ///
    /// Returns `None` when the registration does not exist or belongs to
    /// someone else. Cancelling twice is a `Conflict`.
    pub async fn cancel_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        email: &str,
    ) -> Result<Option<EventRegistration>, RepoError> {
        let mut tx = pool.begin().await?;

        let current: Option<(DbId, String)> = sqlx::query_as(
            "SELECT event_id, status FROM event_registrations
             WHERE id = $1 AND (user_id = $2 OR lower(email) = lower($3))
             FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .bind(email)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((event_id, status)) = current else {
            return Ok(None);
        };
        if status == REG_CANCELLED {
            return Err(CoreError::Conflict("Registration is already cancelled".to_string()).into());
        }

        sqlx::query(
            "UPDATE events SET registered_count = GREATEST(registered_count - 1, 0) WHERE id = $1",
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "UPDATE event_registrations SET status = $2 WHERE id = $1 RETURNING {REG_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, EventRegistration>(&query)
            .bind(id)
            .bind(REG_CANCELLED)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }
}
