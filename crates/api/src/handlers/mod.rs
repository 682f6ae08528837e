//! Request handlers, one module per area.
//!
//! Handlers validate input with the rules in `sangam_core`, delegate to the
//! repositories in `sangam_db`, publish domain events on the bus and wrap
//! successful bodies in [`DataResponse`](crate::response::DataResponse).

pub mod admin;
pub mod auth;
pub mod book_donations;
pub mod books;
pub mod community;
pub mod crawler;
pub mod donations;
pub mod events;
pub mod exams;
pub mod library;
pub mod me;
pub mod site;
pub mod transparency;
pub mod volunteers;
