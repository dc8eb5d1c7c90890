//! View and selection state.

use serde::Serialize;

/// The application's screens. `Login` is the unauthenticated entry view;
/// the rest are gated behind an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    Login,
    Dashboard,
    Upload,
    Analysis,
}

/// Tracks the active screen and the report selected for detail view.
///
/// Selection is a pointer into the data cache by report id; it triggers no
/// refetch and no recomputation.
#[derive(Debug, Default)]
pub struct Navigation {
    current_view: View,
    selected_report: Option<String>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn selected_report_id(&self) -> Option<&str> {
        self.selected_report.as_deref()
    }

    pub fn navigate(&mut self, view: View) {
        self.current_view = view;
    }

    pub fn select_report(&mut self, report_id: impl Into<String>) {
        self.selected_report = Some(report_id.into());
    }

    /// Back from detail view to the report list.
    pub fn clear_selection(&mut self) {
        self.selected_report = None;
    }

    /// Back to the unauthenticated entry view, selection dropped.
    /// The selected report may belong to a user who just logged out.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
