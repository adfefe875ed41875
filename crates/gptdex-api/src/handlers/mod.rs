//! HTTP request handlers for the gptdex API.
//!
//! Handlers follow a consistent pattern: extract input, run exactly one
//! storage operation, serialize the result as JSON. Only the "not found"
//! case is handled explicitly; any other storage failure surfaces as an
//! opaque 500, so constraint violations and connection failures are
//! indistinguishable from the client's perspective.

pub mod health;
pub mod profiles;

pub use health::{health_check, liveness_check, readiness_check};
pub use profiles::{create_profile, delete_profile, get_profile, list_profiles, update_profile};
