//! In-app notification kinds.

pub const KIND_INFO: &str = "info";
pub const KIND_SUCCESS: &str = "success";
pub const KIND_WARNING: &str = "warning";
pub const KIND_ERROR: &str = "error";
