//! Application core: session, cache, upload workflow, and navigation
//! behind one lock, driven by named async operations.
//!
//! The lock is never held across an await, so every mutation lands
//! atomically within one callback turn — the same discipline as a
//! single-threaded event loop. Session-scoped requests capture the session
//! epoch before suspending and re-validate it before merging; a response
//! from a superseded context is dropped silently.

use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::api::{ApiError, BackendApi};
use crate::data_cache::DataCache;
use crate::models::{Report, User, UserRole};
use crate::navigation::{Navigation, View};
use crate::session::{Session, SessionEpoch};
use crate::upload::{PendingFile, UploadError, UploadState, UploadWorkflow};

// ═══════════════════════════════════════════════════════════
// State and error types
// ═══════════════════════════════════════════════════════════

/// Mutable application state. Only `CoreState` operations touch it.
#[derive(Debug, Default)]
struct AppState {
    session: Session,
    cache: DataCache,
    upload: UploadWorkflow,
    nav: Navigation,
}

/// Errors from core operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("No report with id {0} in the cache")]
    UnknownReport(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Internal lock error")]
    LockPoisoned,
}

/// Outcome of driving one submission to completion.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Report merged into the cache; workflow settled to `Success`.
    Completed(Report),
    /// Server or transport failure; workflow settled to `Error(reason)`.
    Failed(String),
    /// The response landed after the issuing session ended; nothing was
    /// mutated.
    Discarded,
}

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

/// The application core, generic over the backend so tests can run
/// against `MockBackend` and production against `ApiClient`.
pub struct CoreState<B> {
    state: RwLock<AppState>,
    backend: B,
}

impl<B: BackendApi> CoreState<B> {
    pub fn new(backend: B) -> Self {
        Self {
            state: RwLock::new(AppState::default()),
            backend,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ── Lock helpers ────────────────────────────────────────

    fn read(&self) -> Result<RwLockReadGuard<'_, AppState>, CoreError> {
        self.state.read().map_err(|_| CoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, AppState>, CoreError> {
        self.state.write().map_err(|_| CoreError::LockPoisoned)
    }

    fn session_epoch(&self) -> Result<SessionEpoch, CoreError> {
        Ok(self.read()?.session.epoch())
    }

    // ── Snapshots (read path) ───────────────────────────────

    pub fn current_user(&self) -> Option<User> {
        self.state
            .read()
            .ok()
            .and_then(|s| s.session.current_user().cloned())
    }

    pub fn is_logged_in(&self) -> bool {
        self.state
            .read()
            .map(|s| s.session.is_logged_in())
            .unwrap_or(false)
    }

    pub fn current_view(&self) -> View {
        self.state
            .read()
            .map(|s| s.nav.current_view())
            .unwrap_or_default()
    }

    pub fn users(&self) -> Vec<User> {
        self.state
            .read()
            .map(|s| s.cache.users().to_vec())
            .unwrap_or_default()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.state
            .read()
            .map(|s| s.cache.reports().to_vec())
            .unwrap_or_default()
    }

    pub fn user_reports(&self) -> Vec<Report> {
        self.state
            .read()
            .map(|s| s.cache.user_reports().to_vec())
            .unwrap_or_default()
    }

    pub fn upload_state(&self) -> UploadState {
        self.state
            .read()
            .map(|s| s.upload.state().clone())
            .unwrap_or_default()
    }

    /// The report selected for detail view, resolved against the cache.
    pub fn selected_report(&self) -> Option<Report> {
        let s = self.state.read().ok()?;
        let id = s.nav.selected_report_id()?;
        s.cache.report_by_id(id).cloned()
    }

    /// Dashboard stat: analyzed parameters across the session user's
    /// reports.
    pub fn analyzed_parameter_count(&self) -> usize {
        self.state
            .read()
            .map(|s| s.cache.analyzed_parameter_count())
            .unwrap_or(0)
    }

    /// The session user's most recent uploads, at most `n`.
    pub fn recent_user_reports(&self, n: usize) -> Vec<Report> {
        self.state
            .read()
            .map(|s| s.cache.recent_user_reports(n).to_vec())
            .unwrap_or_default()
    }

    // ── Startup ─────────────────────────────────────────────

    /// Fetch the global collections. Each failure is tolerated
    /// independently: whichever snapshot arrives is merged, the rest keep
    /// their previous contents.
    pub async fn initialize(&self) {
        match self.backend.list_users().await {
            Ok(users) => {
                if let Ok(mut s) = self.state.write() {
                    s.cache.replace_users(users);
                }
            }
            Err(e) => warn!(error = ?e, "Initial user fetch failed"),
        }
        match self.backend.list_reports().await {
            Ok(reports) => {
                if let Ok(mut s) = self.state.write() {
                    s.cache.replace_reports(reports);
                }
            }
            Err(e) => warn!(error = ?e, "Initial report fetch failed"),
        }
    }

    // ── Session operations ──────────────────────────────────

    /// Log in with a mobile number.
    ///
    /// On success the identity is set, the view moves to the dashboard,
    /// and the user's reports are fetched. On failure nothing is mutated
    /// and the reason is returned. `Ok(None)` means the response resolved
    /// after the session context changed and was discarded.
    pub async fn login(&self, mobile_number: &str) -> Result<Option<User>, CoreError> {
        let issued = self.session_epoch()?;
        let user = self.backend.login(mobile_number).await?;
        {
            let mut s = self.write()?;
            if !s.session.is_current(issued) {
                debug!(user_id = %user.user_id, "Discarding login response from a superseded session context");
                return Ok(None);
            }
            s.session.begin(user.clone());
            s.nav.navigate(View::Dashboard);
        }
        info!(user_id = %user.user_id, "Logged in");

        if let Err(e) = self.refresh_user_reports().await {
            warn!(error = ?e, "Post-login report fetch failed");
        }
        Ok(Some(user))
    }

    /// Register a new user. Appends to the user collection on success and
    /// does **not** log in. The server's response omits the mobile
    /// number, so it is backfilled from the submitted form.
    pub async fn register(
        &self,
        name: &str,
        mobile_number: &str,
        role: UserRole,
    ) -> Result<User, CoreError> {
        let mut user = self.backend.register(name, mobile_number, role).await?;
        if user.mobile_number.is_empty() {
            user.mobile_number = mobile_number.to_string();
        }
        self.write()?.cache.append_user(user.clone());
        info!(user_id = %user.user_id, "Registered user");
        Ok(user)
    }

    /// Clear the session: identity, per-user reports, upload slot, view,
    /// and selection. Callable at any time; responses still in flight
    /// cannot resurrect the cleared state (their epoch no longer
    /// matches).
    pub fn logout(&self) {
        if let Ok(mut s) = self.state.write() {
            let user = s.session.end();
            s.cache.clear_user_reports();
            s.upload.reset();
            s.nav.reset();
            if let Some(user) = user {
                info!(user_id = %user.user_id, "Logged out");
            }
        }
    }

    // ── Cache refreshes ─────────────────────────────────────

    /// Replace the user collection with the server's snapshot.
    pub async fn refresh_users(&self) -> Result<(), CoreError> {
        let users = self.backend.list_users().await?;
        self.write()?.cache.replace_users(users);
        Ok(())
    }

    /// Replace the global report collection with the server's snapshot.
    pub async fn refresh_all_reports(&self) -> Result<(), CoreError> {
        let reports = self.backend.list_reports().await?;
        self.write()?.cache.replace_reports(reports);
        Ok(())
    }

    /// Replace the session user's report collection. Session-scoped: the
    /// snapshot is dropped if the session changes while the request is in
    /// flight.
    pub async fn refresh_user_reports(&self) -> Result<(), CoreError> {
        let (issued, user_id) = {
            let s = self.read()?;
            let user_id = s
                .session
                .current_user_id()
                .ok_or(CoreError::NotLoggedIn)?
                .to_string();
            (s.session.epoch(), user_id)
        };
        let reports = self.backend.list_user_reports(&user_id).await?;
        let mut s = self.write()?;
        if !s.session.is_current(issued) {
            debug!(user_id = %user_id, "Discarding user-report snapshot from a superseded session context");
            return Ok(());
        }
        s.cache.replace_user_reports(reports);
        Ok(())
    }

    // ── Upload workflow ─────────────────────────────────────

    /// Select a file for upload. Synchronous validation only; no network.
    pub fn select_file(&self, file: PendingFile) -> Result<(), CoreError> {
        self.write()?.upload.select_file(file)?;
        Ok(())
    }

    /// Select a file from disk, inferring its media type from the
    /// extension.
    pub fn select_file_from_path(&self, path: &Path) -> Result<(), CoreError> {
        let file = PendingFile::from_path(path)?;
        self.select_file(file)
    }

    /// Drop the selection and any settled result.
    pub fn reset_upload(&self) -> Result<(), CoreError> {
        self.write()?.upload.reset();
        Ok(())
    }

    /// Drive the selected file through submission.
    ///
    /// Transitions to `Uploading` synchronously, then settles the slot
    /// when the response arrives. On success the report is merged into
    /// the cache before the state is observable as `Success`.
    pub async fn submit(&self, user_id: &str) -> Result<SubmitOutcome, CoreError> {
        let (issued, file) = {
            let mut s = self.write()?;
            let file = s.upload.begin_submit(user_id)?;
            (s.session.epoch(), file)
        };
        info!(file_name = %file.file_name, size = file.size(), "Uploading report");

        match self.backend.upload_report(user_id, &file).await {
            Ok(report) => {
                let mut s = self.write()?;
                if !s.session.is_current(issued) {
                    debug!(report_id = %report.report_id, "Discarding upload response from a superseded session context");
                    return Ok(SubmitOutcome::Discarded);
                }
                let owner = s.session.current_user_id().map(str::to_owned);
                s.cache.append_report(report.clone(), owner.as_deref());
                s.upload.complete_success(report.clone());
                info!(report_id = %report.report_id, values = report.lab_value_count(), "Upload complete");
                Ok(SubmitOutcome::Completed(report))
            }
            Err(e) => {
                let reason = e.reason();
                let mut s = self.write()?;
                if !s.session.is_current(issued) {
                    debug!("Discarding upload failure from a superseded session context");
                    return Ok(SubmitOutcome::Discarded);
                }
                warn!(error = ?e, "Upload failed");
                s.upload.complete_error(reason.clone());
                Ok(SubmitOutcome::Failed(reason))
            }
        }
    }

    // ── Navigation ──────────────────────────────────────────

    pub fn navigate(&self, view: View) -> Result<(), CoreError> {
        self.write()?.nav.navigate(view);
        Ok(())
    }

    /// Select a cached report for detail view and move to the analysis
    /// screen. Pointer assignment only.
    pub fn select_report(&self, report_id: &str) -> Result<(), CoreError> {
        let mut s = self.write()?;
        if s.cache.report_by_id(report_id).is_none() {
            return Err(CoreError::UnknownReport(report_id.to_string()));
        }
        s.nav.select_report(report_id);
        s.nav.navigate(View::Analysis);
        Ok(())
    }

    /// Back from detail view to the report list.
    pub fn clear_selected_report(&self) -> Result<(), CoreError> {
        self.write()?.nav.clear_selection();
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
