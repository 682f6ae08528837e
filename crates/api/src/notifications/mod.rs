//! Event-to-user routing.
//!
//! The [`NotificationRouter`] subscribes to the event bus, pushes community
//! activity over WebSocket and records in-app notifications for events that
//! concern a single account.

pub mod router;

pub use router::NotificationRouter;
