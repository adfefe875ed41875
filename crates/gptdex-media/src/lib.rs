//! Media listing HTTP service.
//!
//! Exposes a single paginated, read-only view over an externally managed
//! media table. Opens one fresh database connection per request and never
//! performs DDL.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use server::{create_router, start_server};
