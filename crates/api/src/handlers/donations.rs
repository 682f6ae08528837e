//! Handlers for fundraising campaigns and money donations.
//!
//! Public routes list campaigns and accept donations (always `pending`).
//! Admin routes record manual donations, move payment status through its
//! transitions and export CSV. A donation that reaches `completed` is
//! mailed a receipt when SMTP is configured and the donor left an email.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sangam_core::csv::build_csv;
use sangam_core::donations::{
    campaign_progress, validate_payment_status, validate_purpose, validate_type, CSV_HEADERS,
    PAYMENT_COMPLETED, PAYMENT_PENDING,
};
use sangam_core::error::CoreError;
use sangam_core::event_types::{DONATION_CREATED, DONATION_STATUS_CHANGED};
use sangam_core::types::DbId;
use sangam_core::validation::{
    normalize_email, require_non_empty, slugify, validate_email, validate_max_length,
    validate_positive_amount, MAX_NAME_LENGTH,
};
use sangam_db::models::donation::{
    Campaign, CampaignWithProgress, CreateCampaign, CreateDonation, Donation, DonationFilter,
    UpdateCampaign,
};
use sangam_db::repositories::{CampaignRepo, DonationRepo};
use sangam_db::DbPool;
use sangam_events::delivery::email::donation_receipt_message;
use sangam_events::{EmailDelivery, PlatformEvent};
use serde::Deserialize;
use serde_json::json;

use crate::error::{not_found, AppResult};
use crate::middleware::auth::OptionalAuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::notifications::router::RECIPIENT_KEY;
use crate::query::non_blank;
use crate::response::{csv_attachment, DataResponse};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DonationListParams {
    pub campaign_id: Option<DbId>,
    pub status: Option<String>,
    pub search: Option<String>,
}

impl DonationListParams {
    fn into_filter(self) -> DonationFilter {
        DonationFilter {
            campaign_id: self.campaign_id,
            status: non_blank(self.status),
            search: non_blank(self.search),
            user_id: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PaymentStatusUpdate {
    pub status: String,
}

fn with_progress(campaign: Campaign) -> CampaignWithProgress {
    let progress = campaign_progress(campaign.raised_amount, campaign.target_amount);
    CampaignWithProgress { campaign, progress }
}

// ---------------------------------------------------------------------------
// Campaigns
// ---------------------------------------------------------------------------

/// GET /api/v1/campaigns
///
/// Active campaigns, featured first, with progress percentages.
pub async fn list_campaigns(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let campaigns: Vec<CampaignWithProgress> = CampaignRepo::list(&state.pool, true)
        .await?
        .into_iter()
        .map(with_progress)
        .collect();
    Ok(Json(DataResponse { data: campaigns }))
}

/// GET /api/v1/campaigns/{id}
///
/// Inactive campaigns are hidden from the public.
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = CampaignRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|c| c.is_active)
        .ok_or_else(|| not_found("Campaign", id))?;
    Ok(Json(DataResponse {
        data: with_progress(campaign),
    }))
}

/// GET /api/v1/admin/campaigns
pub async fn admin_list_campaigns(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let campaigns: Vec<CampaignWithProgress> = CampaignRepo::list(&state.pool, false)
        .await?
        .into_iter()
        .map(with_progress)
        .collect();
    Ok(Json(DataResponse { data: campaigns }))
}

/// POST /api/v1/admin/campaigns
///
/// The slug is derived from the title when not supplied.
pub async fn create_campaign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateCampaign>,
) -> AppResult<impl IntoResponse> {
    require_non_empty("title", &input.title)?;
    validate_max_length("title", &input.title, MAX_NAME_LENGTH)?;
    validate_positive_amount("target_amount", input.target_amount)?;
    if let Some(purpose) = &input.purpose {
        validate_purpose(purpose)?;
    }

    let slug = slugify(input.slug.as_deref().unwrap_or(&input.title));
    if slug.is_empty() {
        return Err(CoreError::Validation("slug must contain letters or digits".into()).into());
    }

    let campaign = CampaignRepo::create(&state.pool, &input, &slug).await?;
    tracing::info!(
        campaign_id = campaign.id,
        slug = %campaign.slug,
        user_id = admin.user_id,
        "Campaign created",
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: with_progress(campaign),
        }),
    ))
}

/// PUT /api/v1/admin/campaigns/{id}
pub async fn update_campaign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateCampaign>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_non_empty("title", title)?;
    }
    if let Some(target) = input.target_amount {
        validate_positive_amount("target_amount", target)?;
    }
    if let Some(purpose) = &input.purpose {
        validate_purpose(purpose)?;
    }
    if let Some(slug) = input.slug.take() {
        let slug = slugify(&slug);
        if slug.is_empty() {
            return Err(CoreError::Validation("slug must contain letters or digits".into()).into());
        }
        input.slug = Some(slug);
    }

    let campaign = CampaignRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Campaign", id))?;
    tracing::info!(campaign_id = id, user_id = admin.user_id, "Campaign updated");
    Ok(Json(DataResponse {
        data: with_progress(campaign),
    }))
}

/// POST /api/v1/admin/campaigns/{id}/toggle-active
pub async fn toggle_campaign_active(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let campaign = CampaignRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Campaign", id))?;
    tracing::info!(
        campaign_id = id,
        is_active = campaign.is_active,
        user_id = admin.user_id,
        "Campaign active flag toggled",
    );
    Ok(Json(DataResponse {
        data: with_progress(campaign),
    }))
}

/// DELETE /api/v1/admin/campaigns/{id}
pub async fn delete_campaign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CampaignRepo::delete(&state.pool, id).await? {
        return Err(not_found("Campaign", id));
    }
    tracing::info!(campaign_id = id, user_id = admin.user_id, "Campaign deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Donations
// ---------------------------------------------------------------------------

async fn validate_donation(state: &AppState, input: &mut CreateDonation) -> AppResult<()> {
    require_non_empty("donor_name", &input.donor_name)?;
    validate_max_length("donor_name", &input.donor_name, MAX_NAME_LENGTH)?;
    validate_positive_amount("amount", input.amount)?;
    if let Some(donation_type) = &input.donation_type {
        validate_type(donation_type)?;
    }
    if let Some(purpose) = &input.purpose {
        validate_purpose(purpose)?;
    }
    if let Some(email) = input.donor_email.take().filter(|e| !e.trim().is_empty()) {
        let email = normalize_email(&email);
        validate_email(&email)?;
        input.donor_email = Some(email);
    }
    if let Some(campaign_id) = input.campaign_id {
        if CampaignRepo::find_by_id(&state.pool, campaign_id).await?.is_none() {
            return Err(not_found("Campaign", campaign_id));
        }
    }
    Ok(())
}

fn publish_created(state: &AppState, donation: &Donation, actor: Option<DbId>) {
    state.event_bus.publish(
        PlatformEvent::new(DONATION_CREATED)
            .with_source("donation", donation.id)
            .with_optional_actor(actor)
            .with_payload(json!({
                "amount": donation.amount.to_string(),
                "campaign_id": donation.campaign_id,
                "payment_status": donation.payment_status,
            })),
    );
}

/// POST /api/v1/donations
///
/// Record a pledge as `pending`. A signed-in donor is linked by user id.
pub async fn create_donation(
    caller: OptionalAuthUser,
    State(state): State<AppState>,
    Json(mut input): Json<CreateDonation>,
) -> AppResult<impl IntoResponse> {
    validate_donation(&state, &mut input).await?;

    let donation =
        DonationRepo::create(&state.pool, &input, caller.user_id(), PAYMENT_PENDING).await?;

    tracing::info!(
        donation_id = donation.id,
        amount = %donation.amount,
        user_id = ?caller.user_id(),
        "Donation recorded",
    );
    publish_created(&state, &donation, caller.user_id());

    Ok((StatusCode::CREATED, Json(DataResponse { data: donation })))
}

/// GET /api/v1/donations/stats
///
/// Total amount and distinct donors over completed donations.
pub async fn donation_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = DonationRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/admin/donations
pub async fn admin_list_donations(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<DonationListParams>,
) -> AppResult<impl IntoResponse> {
    let donations = DonationRepo::list(&state.pool, &params.into_filter()).await?;
    Ok(Json(DataResponse { data: donations }))
}

/// POST /api/v1/admin/donations
///
/// Manually record a donation received offline. Defaults to `completed`.
pub async fn admin_create_donation(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(mut input): Json<CreateDonation>,
) -> AppResult<impl IntoResponse> {
    validate_donation(&state, &mut input).await?;

    let donation = DonationRepo::create(&state.pool, &input, None, PAYMENT_COMPLETED).await?;

    tracing::info!(
        donation_id = donation.id,
        amount = %donation.amount,
        user_id = admin.user_id,
        "Manual donation recorded",
    );
    publish_created(&state, &donation, Some(admin.user_id));
    send_receipt(&state, &donation);

    Ok((StatusCode::CREATED, Json(DataResponse { data: donation })))
}

/// PUT /api/v1/admin/donations/{id}/status
///
/// Apply a payment status transition; the campaign total moves with it.
pub async fn update_donation_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<PaymentStatusUpdate>,
) -> AppResult<impl IntoResponse> {
    validate_payment_status(&input.status)?;

    let (donation, previous) = DonationRepo::update_status(&state.pool, id, &input.status).await?;

    tracing::info!(
        donation_id = id,
        from = %previous,
        to = %donation.payment_status,
        user_id = admin.user_id,
        "Donation status updated",
    );

    let mut payload = json!({
        "from": previous,
        "to": donation.payment_status,
        "amount": donation.amount.to_string(),
    });
    if let Some(donor) = donation.user_id {
        payload[RECIPIENT_KEY] = json!(donor);
    }
    state.event_bus.publish(
        PlatformEvent::new(DONATION_STATUS_CHANGED)
            .with_source("donation", id)
            .with_actor(admin.user_id)
            .with_payload(payload),
    );

    if donation.payment_status == PAYMENT_COMPLETED {
        send_receipt(&state, &donation);
    }

    Ok(Json(DataResponse { data: donation }))
}

/// GET /api/v1/admin/donations/export
pub async fn export_donations(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<DonationListParams>,
) -> AppResult<Response> {
    let donations = DonationRepo::list(&state.pool, &params.into_filter()).await?;
    let rows: Vec<Vec<String>> = donations.iter().map(csv_row).collect();

    tracing::info!(rows = rows.len(), user_id = admin.user_id, "Donations exported");
    Ok(csv_attachment("donations.csv", build_csv(CSV_HEADERS, &rows)))
}

fn csv_row(d: &Donation) -> Vec<String> {
    vec![
        d.donated_at.format("%Y-%m-%d").to_string(),
        d.donor_name.clone(),
        d.donor_email.clone().unwrap_or_default(),
        d.donor_phone.clone().unwrap_or_default(),
        format!("{:.2}", d.amount),
        d.donation_type.clone(),
        d.purpose.clone(),
        d.payment_status.clone(),
    ]
}

// ---------------------------------------------------------------------------
// Receipts
// ---------------------------------------------------------------------------

/// Mail a receipt in the background and flag the donation once sent.
///
/// Skipped when no mailer is configured, the donor gave no email, or a
/// receipt already went out.
fn send_receipt(state: &AppState, donation: &Donation) {
    if donation.receipt_sent {
        return;
    }
    let Some(to) = donation.donor_email.clone() else {
        return;
    };
    let Some(mailer) = state.mailer.clone() else {
        tracing::debug!(donation_id = donation.id, "SMTP not configured, receipt skipped");
        return;
    };

    let pool = state.pool.clone();
    let donation = donation.clone();
    tokio::spawn(deliver_receipt(pool, mailer, to, donation));
}

async fn deliver_receipt(pool: DbPool, mailer: Arc<EmailDelivery>, to: String, donation: Donation) {
    let message = donation_receipt_message(&donation);
    if let Err(e) = mailer.send(&to, &message).await {
        tracing::error!(donation_id = donation.id, error = %e, "Receipt mail failed");
        return;
    }
    if let Err(e) = DonationRepo::mark_receipt_sent(&pool, donation.id).await {
        tracing::error!(donation_id = donation.id, error = %e, "Failed to flag receipt as sent");
    }
}
