//! Backend access: HTTP transport and the crate-wide error type.

pub mod client;
pub mod errors;

pub use client::{ApiClient, ClientConfig, DEFAULT_TIMEOUT};
pub use errors::Error;
