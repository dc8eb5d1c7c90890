//! Scriptable backend for tests — no network.
//!
//! Same role the mock LLM client plays elsewhere in this codebase: each
//! endpoint returns a configured response, every call is counted, and an
//! optional gate holds responses in flight so tests can interleave other
//! operations (logout during an outstanding upload, for example) before a
//! response lands.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use crate::models::{Report, User, UserRole};
use crate::upload::PendingFile;

use super::types::{ApiError, BackendApi};

fn unconfigured<T>() -> Result<T, ApiError> {
    Err(ApiError::transport("mock: no response configured"))
}

/// In-memory `BackendApi` with scriptable responses.
pub struct MockBackend {
    users: Mutex<Result<Vec<User>, ApiError>>,
    reports: Mutex<Result<Vec<Report>, ApiError>>,
    user_reports: Mutex<Result<Vec<Report>, ApiError>>,
    login_response: Mutex<Result<User, ApiError>>,
    register_response: Mutex<Result<User, ApiError>>,
    upload_response: Mutex<Result<Report, ApiError>>,
    request_count: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Ok(Vec::new())),
            reports: Mutex::new(Ok(Vec::new())),
            user_reports: Mutex::new(Ok(Vec::new())),
            login_response: Mutex::new(unconfigured()),
            register_response: Mutex::new(unconfigured()),
            upload_response: Mutex::new(unconfigured()),
            request_count: AtomicUsize::new(0),
            gate: Mutex::new(None),
        }
    }

    // ── Scripting ────────────────────────────────────────────

    pub fn with_users(self, users: Vec<User>) -> Self {
        *self.users.lock().unwrap() = Ok(users);
        self
    }

    pub fn with_reports(self, reports: Vec<Report>) -> Self {
        *self.reports.lock().unwrap() = Ok(reports);
        self
    }

    pub fn with_user_reports(self, reports: Vec<Report>) -> Self {
        *self.user_reports.lock().unwrap() = Ok(reports);
        self
    }

    pub fn with_users_error(self, err: ApiError) -> Self {
        *self.users.lock().unwrap() = Err(err);
        self
    }

    pub fn with_reports_error(self, err: ApiError) -> Self {
        *self.reports.lock().unwrap() = Err(err);
        self
    }

    pub fn with_login(self, user: User) -> Self {
        *self.login_response.lock().unwrap() = Ok(user);
        self
    }

    pub fn with_login_error(self, err: ApiError) -> Self {
        *self.login_response.lock().unwrap() = Err(err);
        self
    }

    pub fn with_register(self, user: User) -> Self {
        *self.register_response.lock().unwrap() = Ok(user);
        self
    }

    pub fn with_register_error(self, err: ApiError) -> Self {
        *self.register_response.lock().unwrap() = Err(err);
        self
    }

    pub fn with_upload(self, report: Report) -> Self {
        *self.upload_response.lock().unwrap() = Ok(report);
        self
    }

    pub fn with_upload_error(self, err: ApiError) -> Self {
        *self.upload_response.lock().unwrap() = Err(err);
        self
    }

    /// Hold every response until the gate is notified. One notification
    /// releases one in-flight call.
    pub fn with_gate(self, gate: Arc<Notify>) -> Self {
        *self.gate.lock().unwrap() = Some(gate);
        self
    }

    /// Install or remove the gate after construction. Calls already
    /// waiting keep the gate they picked up when they were issued.
    pub fn set_gate(&self, gate: Option<Arc<Notify>>) {
        *self.gate.lock().unwrap() = gate;
    }

    /// Rescript the login response after construction.
    pub fn set_login(&self, user: User) {
        *self.login_response.lock().unwrap() = Ok(user);
    }

    /// Total network calls issued against this backend.
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    // ── Internal ────────────────────────────────────────────

    async fn issue(&self) {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendApi for MockBackend {
    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.issue().await;
        self.users.lock().unwrap().clone()
    }

    async fn list_reports(&self) -> Result<Vec<Report>, ApiError> {
        self.issue().await;
        self.reports.lock().unwrap().clone()
    }

    async fn list_user_reports(&self, _user_id: &str) -> Result<Vec<Report>, ApiError> {
        self.issue().await;
        self.user_reports.lock().unwrap().clone()
    }

    async fn login(&self, _mobile_number: &str) -> Result<User, ApiError> {
        self.issue().await;
        self.login_response.lock().unwrap().clone()
    }

    async fn register(
        &self,
        _name: &str,
        _mobile_number: &str,
        _role: UserRole,
    ) -> Result<User, ApiError> {
        self.issue().await;
        self.register_response.lock().unwrap().clone()
    }

    async fn upload_report(&self, _user_id: &str, _file: &PendingFile) -> Result<Report, ApiError> {
        self.issue().await;
        self.upload_response.lock().unwrap().clone()
    }
}
