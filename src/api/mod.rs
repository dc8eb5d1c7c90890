//! Remote API client.
//!
//! Thin request/response wrappers around the clinic backend's HTTP
//! endpoints, behind the `BackendApi` trait so the orchestration layer can
//! be tested against `MockBackend` without a network.

pub mod client;
pub mod mock;
pub mod types;

pub use client::ApiClient;
pub use mock::MockBackend;
pub use types::{ApiError, BackendApi, GENERIC_FAILURE_REASON};
