//! Handlers for public site content (`/site`) and its admin surface
//! (`/admin/settings`, `/admin/hero`, `/admin/stats`, `/admin/testimonials`,
//! `/admin/contact`, `/admin/members`).

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use sangam_core::error::CoreError;
use sangam_core::event_types::{CONTACT_SUBMITTED, SETTING_UPDATED};
use sangam_core::types::DbId;
use sangam_core::validation::{
    normalize_email, require_non_empty, validate_email, validate_max_length, MAX_NAME_LENGTH,
    MAX_TEXT_LENGTH,
};
use sangam_core::{contact, members, site};
use sangam_db::models::site::{
    CreateContactInquiry, CreateHeroContent, CreateMember, CreateStat, CreateTestimonial,
    MemberFilter, UpdateContactInquiry, UpdateHeroContent, UpdateMember, UpdateStat,
    UpdateTestimonial, UpsertSetting,
};
use sangam_db::repositories::{
    ContactRepo, HeroRepo, MemberRepo, SettingRepo, StatRepo, TestimonialRepo,
};
use sangam_events::PlatformEvent;
use serde::Deserialize;
use serde_json::json;

use crate::error::{not_found, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{non_blank, StatusSearchParams};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct MemberParams {
    pub member_type: Option<String>,
    pub is_approved: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApprovedParams {
    pub approved: Option<bool>,
}

// ---------------------------------------------------------------------------
// Public
// ---------------------------------------------------------------------------

/// GET /api/v1/site/settings
///
/// All settings as a `{key: value}` map.
pub async fn public_settings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let settings: BTreeMap<String, serde_json::Value> = SettingRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|s| (s.key, s.value))
        .collect();
    Ok(Json(DataResponse { data: settings }))
}

/// GET /api/v1/site/hero
pub async fn public_hero(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let hero = HeroRepo::list(&state.pool, true).await?;
    Ok(Json(DataResponse { data: hero }))
}

/// GET /api/v1/site/stats
pub async fn public_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = StatRepo::list(&state.pool, true).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/site/overview
///
/// Headline counts for the landing page.
pub async fn overview(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let overview = StatRepo::overview(&state.pool).await?;
    Ok(Json(DataResponse { data: overview }))
}

/// GET /api/v1/site/testimonials
///
/// Approved testimonials, featured first.
pub async fn public_testimonials(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let testimonials = TestimonialRepo::list(&state.pool, Some(true)).await?;
    Ok(Json(DataResponse { data: testimonials }))
}

/// POST /api/v1/site/testimonials
///
/// Public submission. Always lands unapproved and unfeatured.
pub async fn submit_testimonial(
    State(state): State<AppState>,
    Json(mut input): Json<CreateTestimonial>,
) -> AppResult<impl IntoResponse> {
    validate_testimonial(&input)?;
    input.is_approved = false;
    input.is_featured = false;

    let testimonial = TestimonialRepo::create(&state.pool, &input).await?;
    tracing::info!(testimonial_id = testimonial.id, "Testimonial submitted");
    Ok((StatusCode::CREATED, Json(DataResponse { data: testimonial })))
}

/// POST /api/v1/site/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(mut input): Json<CreateContactInquiry>,
) -> AppResult<impl IntoResponse> {
    require_non_empty("name", &input.name)?;
    validate_max_length("name", &input.name, MAX_NAME_LENGTH)?;
    input.email = normalize_email(&input.email);
    validate_email(&input.email)?;
    require_non_empty("message", &input.message)?;
    validate_max_length("message", &input.message, MAX_TEXT_LENGTH)?;

    let inquiry = ContactRepo::create(&state.pool, &input).await?;

    tracing::info!(inquiry_id = inquiry.id, "Contact inquiry received");
    state.event_bus.publish(
        PlatformEvent::new(CONTACT_SUBMITTED)
            .with_source("contact_inquiry", inquiry.id)
            .with_payload(json!({ "subject": inquiry.subject })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: inquiry })))
}

/// GET /api/v1/site/members
///
/// Active, approved members.
pub async fn public_members(
    State(state): State<AppState>,
    Query(params): Query<MemberParams>,
) -> AppResult<impl IntoResponse> {
    let filter = MemberFilter {
        member_type: non_blank(params.member_type),
        is_approved: None,
        search: non_blank(params.search),
        public_only: true,
    };
    let members = MemberRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: members }))
}

// ---------------------------------------------------------------------------
// Admin: settings
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/settings
pub async fn list_settings(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let settings = SettingRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/admin/settings/{key}
///
/// Insert or replace a setting.
pub async fn upsert_setting(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(input): Json<UpsertSetting>,
) -> AppResult<impl IntoResponse> {
    site::validate_setting_key(&key)?;

    let setting = SettingRepo::upsert(
        &state.pool,
        &key,
        &input.value,
        input.description.as_deref(),
        admin.user_id,
    )
    .await?;

    tracing::info!(key = %key, user_id = admin.user_id, "Site setting updated");
    state.event_bus.publish(
        PlatformEvent::new(SETTING_UPDATED)
            .with_source("site_setting", setting.id)
            .with_actor(admin.user_id)
            .with_payload(json!({ "key": key })),
    );

    Ok(Json(DataResponse { data: setting }))
}

// ---------------------------------------------------------------------------
// Admin: hero
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/hero
pub async fn list_hero(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let hero = HeroRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: hero }))
}

/// POST /api/v1/admin/hero
pub async fn create_hero(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateHeroContent>,
) -> AppResult<impl IntoResponse> {
    require_non_empty("title", &input.title)?;
    let hero = HeroRepo::create(&state.pool, &input).await?;
    tracing::info!(hero_id = hero.id, user_id = admin.user_id, "Hero content created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: hero })))
}

/// PUT /api/v1/admin/hero/{id}
pub async fn update_hero(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateHeroContent>,
) -> AppResult<impl IntoResponse> {
    if let Some(title) = &input.title {
        require_non_empty("title", title)?;
    }
    let hero = HeroRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("HeroContent", id))?;
    tracing::info!(hero_id = id, user_id = admin.user_id, "Hero content updated");
    Ok(Json(DataResponse { data: hero }))
}

/// DELETE /api/v1/admin/hero/{id}
pub async fn delete_hero(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !HeroRepo::delete(&state.pool, id).await? {
        return Err(not_found("HeroContent", id));
    }
    tracing::info!(hero_id = id, user_id = admin.user_id, "Hero content deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin: stats
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/stats
pub async fn list_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = StatRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// POST /api/v1/admin/stats
pub async fn create_stat(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateStat>,
) -> AppResult<impl IntoResponse> {
    site::validate_setting_key(&input.key)?;
    require_non_empty("label", &input.label)?;
    let stat = StatRepo::create(&state.pool, &input).await?;
    tracing::info!(stat_id = stat.id, user_id = admin.user_id, "Stat created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: stat })))
}

/// PUT /api/v1/admin/stats/{id}
pub async fn update_stat(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStat>,
) -> AppResult<impl IntoResponse> {
    let stat = StatRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Stat", id))?;
    tracing::info!(stat_id = id, user_id = admin.user_id, "Stat updated");
    Ok(Json(DataResponse { data: stat }))
}

/// DELETE /api/v1/admin/stats/{id}
pub async fn delete_stat(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !StatRepo::delete(&state.pool, id).await? {
        return Err(not_found("Stat", id));
    }
    tracing::info!(stat_id = id, user_id = admin.user_id, "Stat deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin: testimonials
// ---------------------------------------------------------------------------

fn validate_testimonial(input: &CreateTestimonial) -> Result<(), CoreError> {
    require_non_empty("name", &input.name)?;
    validate_max_length("name", &input.name, MAX_NAME_LENGTH)?;
    require_non_empty("content", &input.content)?;
    validate_max_length("content", &input.content, MAX_TEXT_LENGTH)?;
    if let Some(rating) = input.rating {
        site::validate_rating(rating)?;
    }
    Ok(())
}

/// GET /api/v1/admin/testimonials
pub async fn list_testimonials(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ApprovedParams>,
) -> AppResult<impl IntoResponse> {
    let testimonials = TestimonialRepo::list(&state.pool, params.approved).await?;
    Ok(Json(DataResponse { data: testimonials }))
}

/// POST /api/v1/admin/testimonials
pub async fn create_testimonial(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTestimonial>,
) -> AppResult<impl IntoResponse> {
    validate_testimonial(&input)?;
    let testimonial = TestimonialRepo::create(&state.pool, &input).await?;
    tracing::info!(
        testimonial_id = testimonial.id,
        user_id = admin.user_id,
        "Testimonial created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: testimonial })))
}

/// PUT /api/v1/admin/testimonials/{id}
pub async fn update_testimonial(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTestimonial>,
) -> AppResult<impl IntoResponse> {
    if let Some(rating) = input.rating {
        site::validate_rating(rating)?;
    }
    let testimonial = TestimonialRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Testimonial", id))?;
    tracing::info!(testimonial_id = id, user_id = admin.user_id, "Testimonial updated");
    Ok(Json(DataResponse { data: testimonial }))
}

/// POST /api/v1/admin/testimonials/{id}/toggle-approved
pub async fn toggle_testimonial_approved(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let testimonial = TestimonialRepo::toggle_approved(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Testimonial", id))?;
    tracing::info!(
        testimonial_id = id,
        is_approved = testimonial.is_approved,
        user_id = admin.user_id,
        "Testimonial approval toggled",
    );
    Ok(Json(DataResponse { data: testimonial }))
}

/// POST /api/v1/admin/testimonials/{id}/toggle-featured
pub async fn toggle_testimonial_featured(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let testimonial = TestimonialRepo::toggle_featured(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Testimonial", id))?;
    tracing::info!(
        testimonial_id = id,
        is_featured = testimonial.is_featured,
        user_id = admin.user_id,
        "Testimonial featured flag toggled",
    );
    Ok(Json(DataResponse { data: testimonial }))
}

/// DELETE /api/v1/admin/testimonials/{id}
pub async fn delete_testimonial(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TestimonialRepo::delete(&state.pool, id).await? {
        return Err(not_found("Testimonial", id));
    }
    tracing::info!(testimonial_id = id, user_id = admin.user_id, "Testimonial deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin: contact inquiries
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/contact
pub async fn list_contact(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatusSearchParams>,
) -> AppResult<impl IntoResponse> {
    let status = non_blank(params.status);
    let search = non_blank(params.search);
    let inquiries =
        ContactRepo::list(&state.pool, status.as_deref(), search.as_deref()).await?;
    Ok(Json(DataResponse { data: inquiries }))
}

/// PUT /api/v1/admin/contact/{id}
pub async fn update_contact(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContactInquiry>,
) -> AppResult<impl IntoResponse> {
    if let Some(status) = &input.status {
        contact::validate_status(status)?;
    }
    let inquiry = ContactRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("ContactInquiry", id))?;
    tracing::info!(
        inquiry_id = id,
        status = %inquiry.status,
        user_id = admin.user_id,
        "Contact inquiry updated",
    );
    Ok(Json(DataResponse { data: inquiry }))
}

/// DELETE /api/v1/admin/contact/{id}
pub async fn delete_contact(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ContactRepo::delete(&state.pool, id).await? {
        return Err(not_found("ContactInquiry", id));
    }
    tracing::info!(inquiry_id = id, user_id = admin.user_id, "Contact inquiry deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin: members
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/members
pub async fn list_members(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<MemberParams>,
) -> AppResult<impl IntoResponse> {
    let filter = MemberFilter {
        member_type: non_blank(params.member_type),
        is_approved: params.is_approved,
        search: non_blank(params.search),
        public_only: false,
    };
    let members = MemberRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: members }))
}

/// POST /api/v1/admin/members
pub async fn create_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(mut input): Json<CreateMember>,
) -> AppResult<impl IntoResponse> {
    require_non_empty("name", &input.name)?;
    validate_max_length("name", &input.name, MAX_NAME_LENGTH)?;
    if let Some(member_type) = &input.member_type {
        members::validate_type(member_type)?;
    }
    if let Some(email) = input.email.take().and_then(|e| non_blank(Some(e))) {
        let email = normalize_email(&email);
        validate_email(&email)?;
        input.email = Some(email);
    }

    let member = MemberRepo::create(&state.pool, &input).await?;
    tracing::info!(member_id = member.id, user_id = admin.user_id, "Member created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: member })))
}

/// PUT /api/v1/admin/members/{id}
pub async fn update_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateMember>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        require_non_empty("name", name)?;
    }
    if let Some(member_type) = &input.member_type {
        members::validate_type(member_type)?;
    }
    let member = MemberRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Member", id))?;
    tracing::info!(member_id = id, user_id = admin.user_id, "Member updated");
    Ok(Json(DataResponse { data: member }))
}

/// DELETE /api/v1/admin/members/{id}
///
/// Soft delete: the member is marked inactive.
pub async fn deactivate_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !MemberRepo::deactivate(&state.pool, id).await? {
        return Err(not_found("Member", id));
    }
    tracing::info!(member_id = id, user_id = admin.user_id, "Member deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/members/{id}/approve
pub async fn approve_member(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let member = MemberRepo::approve(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Member", id))?;
    tracing::info!(member_id = id, user_id = admin.user_id, "Member approved");
    Ok(Json(DataResponse { data: member }))
}
