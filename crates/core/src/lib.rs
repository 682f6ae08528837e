//! Sangam domain core.
//!
//! Status vocabularies, validation rules and pure calculations shared by the
//! repository layer, the HTTP API and background jobs. Nothing in this crate
//! performs I/O.

pub mod book_donations;
pub mod books;
pub mod community;
pub mod contact;
pub mod crawler;
pub mod csv;
pub mod donations;
pub mod error;
pub mod event_types;
pub mod events;
pub mod exams;
pub mod finance;
pub mod hashing;
pub mod library;
pub mod members;
pub mod notifications;
pub mod roles;
pub mod search;
pub mod site;
pub mod tokens;
pub mod types;
pub mod validation;
pub mod volunteers;
