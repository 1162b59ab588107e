// Common types and utilities shared across the application

pub mod entity_ids;
pub mod error;
pub mod id;
pub mod phone;

pub use entity_ids::*;
pub use error::{is_unique_violation, ApiError, ApiResult};
pub use id::Id;
pub use phone::{is_allowed_country, mask_phone, normalize_phone};
