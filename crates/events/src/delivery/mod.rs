//! Outbound delivery channels.
//!
//! Only SMTP mail is supported: password reset links and donation
//! receipts.

pub mod email;
