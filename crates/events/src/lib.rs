//! Sangam event bus and outbound mail.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`EventPersistence`]: background service that writes every event to
//!   the `activity_logs` table.
//! - [`delivery`]: SMTP mail for password resets and donation receipts.

pub mod bus;
pub mod delivery;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, MailMessage};
pub use persistence::EventPersistence;
