use std::future::Future;

use thiserror::Error;

use crate::models::{Report, User, UserRole};
use crate::upload::PendingFile;

/// User-facing reason when the failure carries no server message.
pub const GENERIC_FAILURE_REASON: &str = "request failed";

/// Normalized failure from a backend call.
///
/// `Display` is what the view layer shows: generic for transport failures,
/// the server's `detail` verbatim for application errors. Diagnostic detail
/// for transport failures is kept out of `Display` and logged instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never completed (offline, DNS, refused, timeout).
    #[error("request failed")]
    Transport { detail: String },

    /// The server answered with a non-success status. `detail` is the JSON
    /// body's `detail` field when parseable, otherwise the generic reason.
    #[error("{detail}")]
    Api { status: u16, detail: String },
}

impl ApiError {
    pub fn transport(detail: impl Into<String>) -> Self {
        Self::Transport {
            detail: detail.into(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The reason string surfaced to the user.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// The clinic backend's endpoints, as consumed by this client.
///
/// `ApiClient` is the production implementation; `MockBackend` scripts
/// responses for tests. Futures are `Send` so callers can drive operations
/// from any runtime flavor.
pub trait BackendApi {
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send;

    fn list_reports(&self) -> impl Future<Output = Result<Vec<Report>, ApiError>> + Send;

    fn list_user_reports(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<Report>, ApiError>> + Send;

    fn login(&self, mobile_number: &str) -> impl Future<Output = Result<User, ApiError>> + Send;

    fn register(
        &self,
        name: &str,
        mobile_number: &str,
        role: UserRole,
    ) -> impl Future<Output = Result<User, ApiError>> + Send;

    fn upload_report(
        &self,
        user_id: &str,
        file: &PendingFile,
    ) -> impl Future<Output = Result<Report, ApiError>> + Send;
}
