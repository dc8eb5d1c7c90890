//! Session state: at most one authenticated identity.
//!
//! Every login and logout bumps a monotonic epoch. Network operations
//! scoped to the session capture the epoch before suspending; a response
//! whose captured epoch no longer matches was issued under a context that
//! has ended and must be discarded at merge time, never surfaced as an
//! error.

use crate::models::User;

/// Tag for the session context a request was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEpoch(u64);

/// Authenticated-identity holder.
///
/// State machine: `LoggedOut → LoggedIn → LoggedOut`. Registration does
/// not pass through here; it never changes the session.
#[derive(Debug, Default)]
pub struct Session {
    current_user: Option<User>,
    epoch: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn current_user_id(&self) -> Option<&str> {
        self.current_user.as_ref().map(|u| u.user_id.as_str())
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// The current context tag. Capture before issuing a session-scoped
    /// request; check with `is_current` before merging its response.
    pub fn epoch(&self) -> SessionEpoch {
        SessionEpoch(self.epoch)
    }

    pub fn is_current(&self, issued: SessionEpoch) -> bool {
        self.epoch == issued.0
    }

    /// Establish a new identity. Responses issued under the previous
    /// context no longer merge.
    pub fn begin(&mut self, user: User) {
        self.epoch += 1;
        self.current_user = Some(user);
    }

    /// Clear the identity, returning it. Safe to call at any time; the
    /// epoch bumps even when already logged out so that anything issued
    /// beforehand is invalidated.
    pub fn end(&mut self) -> Option<User> {
        self.epoch += 1;
        self.current_user.take()
    }
}
