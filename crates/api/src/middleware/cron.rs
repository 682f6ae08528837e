//! Shared-secret authentication for the scraper pipeline.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sangam_core::error::CoreError;
use sangam_core::hashing::sha256_hex;
use sangam_core::roles::ROLE_ADMIN;

use super::auth::{authenticate, bearer_token, AuthUser};
use crate::error::AppError;
use crate::state::AppState;

/// Who triggered a crawler endpoint.
#[derive(Debug, Clone)]
pub enum CrawlerCaller {
    /// The bearer token matched `CRON_SECRET`.
    Cron,
    /// A signed-in admin.
    Admin(AuthUser),
}

/// Compare two secrets through their digests so the comparison time does
/// not depend on the length of the matching prefix.
fn secret_matches(presented: &str, expected: &str) -> bool {
    sha256_hex(presented.as_bytes()) == sha256_hex(expected.as_bytes())
}

fn is_cron_secret(token: &str, state: &AppState) -> bool {
    state
        .config
        .cron_secret
        .as_deref()
        .is_some_and(|secret| secret_matches(token, secret))
}

/// Requires the cron secret. Used by the webhook only.
pub struct RequireCron;

impl FromRequestParts<AppState> for RequireCron {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.cron_secret.is_none() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Crawler webhook is not configured".into(),
            )));
        }
        match bearer_token(parts)? {
            Some(token) if is_cron_secret(token, state) => Ok(RequireCron),
            _ => Err(AppError::Core(CoreError::Unauthorized(
                "Invalid cron secret".into(),
            ))),
        }
    }
}

/// Accepts the cron secret or an admin access token.
pub struct CronOrAdmin(pub CrawlerCaller);

impl FromRequestParts<AppState> for CronOrAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;
        if is_cron_secret(token, state) {
            return Ok(CronOrAdmin(CrawlerCaller::Cron));
        }
        let user = authenticate(token, state)?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(CronOrAdmin(CrawlerCaller::Admin(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_compare_by_value() {
        assert!(secret_matches("s3cret", "s3cret"));
        assert!(!secret_matches("s3cret", "s3cre"));
        assert!(!secret_matches("", "s3cret"));
    }
}
