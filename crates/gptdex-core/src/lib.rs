//! Core domain models and storage for the gptdex services.
//!
//! Provides the profile and media record types, the error taxonomy shared by
//! both HTTP services, and the repository layer that owns every SQL statement
//! in the system.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod models;
pub mod storage;

pub use error::{CoreError, Result};
pub use models::{GptProfile, MediaItem, ProfilePatch};
