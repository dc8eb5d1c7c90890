//! MediSage core — client-side session, data-cache, and upload-workflow
//! controller for the MediSage lab-report assistant.
//!
//! The rendering layer and the remote extraction service are external
//! collaborators. An embedder constructs a [`CoreState`] over an
//! [`api::ApiClient`] (or any [`api::BackendApi`] implementation), drives
//! it through the named operations (login, register, refresh, select,
//! submit), and renders from the cloned state snapshots it exposes.

pub mod api;
pub mod config;
pub mod core_state;
pub mod data_cache;
pub mod models;
pub mod navigation;
pub mod recommendations;
pub mod session;
pub mod upload;

pub use api::{ApiClient, ApiError, BackendApi};
pub use core_state::{CoreError, CoreState, SubmitOutcome};
pub use models::{LabResult, LabStatus, Report, User, UserRole};
pub use navigation::View;
pub use upload::{PendingFile, UploadError, UploadState};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for an embedding application. Honors `RUST_LOG`,
/// falling back to the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
    tracing::info!("{} core v{}", config::APP_NAME, config::APP_VERSION);
}

/// The application core wired to the environment-configured backend.
pub fn new_core() -> CoreState<ApiClient> {
    CoreState::new(ApiClient::from_env())
}
