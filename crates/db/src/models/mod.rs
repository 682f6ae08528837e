//! Row models and DTOs.
//!
//! Each submodule contains:
//! - a `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` create DTOs for inserts
//! - `Deserialize` update DTOs (all `Option` fields) for patches

pub mod activity;
pub mod analytics;
pub mod book;
pub mod book_donation;
pub mod community;
pub mod crawler_run;
pub mod donation;
pub mod event;
pub mod exam;
pub mod library;
pub mod notification;
pub mod profile;
pub mod session;
pub mod site;
pub mod transaction;
pub mod volunteer;
