//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`auth::OptionalAuthUser`] -- Same, for public routes that record the caller when known.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.
//! - [`rbac::RequireLibrarian`] -- Requires `librarian` or `admin`.
//! - [`rbac::RequireAuth`] -- Requires any authenticated user.
//! - [`cron::CronOrAdmin`] -- Cron secret or an admin token.

pub mod auth;
pub mod cron;
pub mod rbac;
