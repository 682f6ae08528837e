//! Repository for money `donations`.
//!
//! Every write that moves a donation into or out of `completed` adjusts the
//! campaign's `raised_amount` inside the same transaction.

use sqlx::{PgConnection, PgPool};
use sangam_core::donations::{raised_delta, validate_transition, PAYMENT_COMPLETED};
use sangam_core::error::CoreError;
use sangam_core::search::like_pattern;
use sangam_core::types::{DbId, Money};

use crate::error::RepoError;
use crate::models::donation::{CreateDonation, Donation, DonationFilter, DonationStats};

const COLUMNS: &str = "id, campaign_id, user_id, donor_name, donor_email, donor_phone, amount, \
                       donation_type, purpose, payment_method, payment_status, transaction_id, \
                       is_anonymous, message, receipt_sent, donated_at, created_at, updated_at";

pub struct DonationRepo;

impl DonationRepo {
    /// Record a donation with the given initial payment status.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDonation,
        user_id: Option<DbId>,
        payment_status: &str,
    ) -> Result<Donation, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO donations
                (campaign_id, user_id, donor_name, donor_email, donor_phone, amount,
                 donation_type, purpose, payment_method, payment_status, transaction_id,
                 is_anonymous, message, donated_at)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'one-time'), COALESCE($8, 'general'),
                     $9, $10, $11, $12, $13, COALESCE($14, NOW()))
             RETURNING {COLUMNS}"
        );
        let donation = sqlx::query_as::<_, Donation>(&query)
            .bind(input.campaign_id)
            .bind(user_id)
            .bind(&input.donor_name)
            .bind(&input.donor_email)
            .bind(&input.donor_phone)
            .bind(input.amount)
            .bind(&input.donation_type)
            .bind(&input.purpose)
            .bind(&input.payment_method)
            .bind(payment_status)
            .bind(&input.transaction_id)
            .bind(input.is_anonymous)
            .bind(&input.message)
            .bind(input.donated_at)
            .fetch_one(&mut *tx)
            .await?;

        if payment_status == PAYMENT_COMPLETED {
            adjust_raised(&mut *tx, donation.campaign_id, donation.amount).await?;
        }

        tx.commit().await?;
        Ok(donation)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Donation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM donations WHERE id = $1");
        sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List donations, newest first. `search` matches donor name or email.
    pub async fn list(
        pool: &PgPool,
        filter: &DonationFilter,
    ) -> Result<Vec<Donation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM donations
             WHERE ($1::BIGINT IS NULL OR campaign_id = $1)
               AND ($2::TEXT IS NULL OR payment_status = $2)
               AND ($3::TEXT IS NULL OR donor_name ILIKE $3 OR donor_email ILIKE $3)
               AND ($4::BIGINT IS NULL OR user_id = $4)
             ORDER BY donated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Donation>(&query)
            .bind(filter.campaign_id)
            .bind(&filter.status)
            .bind(like_pattern(filter.search.as_deref()))
            .bind(filter.user_id)
            .fetch_all(pool)
            .await
    }

    /// Move a donation to `next`, returning the updated row and the
    /// previous status.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        next: &str,
    ) -> Result<(Donation, String), RepoError> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM donations WHERE id = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Donation",
                id,
            })?;
        validate_transition(&current.payment_status, next)?;

        let delta = raised_delta(&current.payment_status, next, current.amount);
        adjust_raised(&mut *tx, current.campaign_id, delta).await?;

        let query = format!(
            "UPDATE donations SET payment_status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Donation>(&query)
            .bind(id)
            .bind(next)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((updated, current.payment_status))
    }

    pub async fn mark_receipt_sent(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE donations SET receipt_sent = true WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Totals over completed donations.
    pub async fn stats(pool: &PgPool) -> Result<DonationStats, sqlx::Error> {
        sqlx::query_as::<_, DonationStats>(
            "SELECT
                COALESCE(SUM(amount), 0) AS total_amount,
                COUNT(DISTINCT COALESCE(lower(donor_email), donor_name)) AS donor_count
             FROM donations
             WHERE payment_status = 'completed'",
        )
        .fetch_one(pool)
        .await
    }
}

/// Add `delta` to a campaign's raised amount, never going below zero.
async fn adjust_raised(
    conn: &mut PgConnection,
    campaign_id: Option<DbId>,
    delta: Money,
) -> Result<(), sqlx::Error> {
    let Some(campaign_id) = campaign_id else {
        return Ok(());
    };
    if delta.is_zero() {
        return Ok(());
    }
    sqlx::query(
        "UPDATE campaigns SET raised_amount = GREATEST(raised_amount + $2, 0) WHERE id = $1",
    )
    .bind(campaign_id)
    .bind(delta)
    .execute(conn)
    .await?;
    Ok(())
}
