//! In-memory collections of users and reports.
//!
//! Single source of truth for `users`, `reports` (global) and
//! `user_reports` (scoped to the session user). Mutated only through the
//! named operations below, and only by the orchestration layer after its
//! session checks pass. Collections preserve insertion order and are
//! append-only between snapshot replacements; the client never observes a
//! deletion.

use crate::models::{Report, User};

#[derive(Debug, Default)]
pub struct DataCache {
    users: Vec<User>,
    reports: Vec<Report>,
    user_reports: Vec<Report>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Snapshot replacement ─────────────────────────────

    /// Replace the user collection with the server's current snapshot.
    pub fn replace_users(&mut self, users: Vec<User>) {
        self.users = users;
    }

    /// Replace the global report collection with the server's snapshot.
    pub fn replace_reports(&mut self, reports: Vec<Report>) {
        self.reports = reports;
    }

    /// Replace the session user's report collection with the server's
    /// snapshot.
    pub fn replace_user_reports(&mut self, reports: Vec<Report>) {
        self.user_reports = reports;
    }

    /// Drop the per-user view. Called on logout; the global collections
    /// survive the session.
    pub fn clear_user_reports(&mut self) {
        self.user_reports.clear();
    }

    // ── Optimistic appends ───────────────────────────────

    /// Append a freshly uploaded report. Mirrored into the session user's
    /// view when the owner matches, so both views show the upload without
    /// waiting for a refresh.
    pub fn append_report(&mut self, report: Report, current_user_id: Option<&str>) {
        if current_user_id == Some(report.user_id.as_str()) {
            self.user_reports.push(report.clone());
        }
        self.reports.push(report);
    }

    /// Append a freshly registered user.
    pub fn append_user(&mut self, user: User) {
        self.users.push(user);
    }

    // ── Reads ────────────────────────────────────────────

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn user_reports(&self) -> &[Report] {
        &self.user_reports
    }

    /// Find a report in either view.
    pub fn report_by_id(&self, report_id: &str) -> Option<&Report> {
        self.reports
            .iter()
            .chain(self.user_reports.iter())
            .find(|r| r.report_id == report_id)
    }

    /// Dashboard stat: total analyzed parameters across the session
    /// user's reports.
    pub fn analyzed_parameter_count(&self) -> usize {
        self.user_reports.iter().map(|r| r.lab_value_count()).sum()
    }

    /// The session user's most recent uploads, oldest first (insertion
    /// order), at most `n` entries.
    pub fn recent_user_reports(&self, n: usize) -> &[Report] {
        let start = self.user_reports.len().saturating_sub(n);
        &self.user_reports[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    fn user(id: &str, name: &str) -> User {
        User {
            user_id: id.into(),
            name: name.into(),
            mobile_number: format!("900000000{id}"),
            role: UserRole::Patient,
        }
    }

    fn report(report_id: &str, user_id: &str) -> Report {
        serde_json::from_str(&format!(
            r#"{{
                "report_id": "{report_id}",
                "user_id": "{user_id}",
                "file_name": "{report_id}.pdf",
                "lab_results": {{
                    "WBC": {{"value": 7800.0, "unit": "/cmm", "status": "Normal"}}
                }}
            }}"#
        ))
        .unwrap()
    }

    #[test]
    fn new_cache_is_empty() {
        let cache = DataCache::new();
        assert!(cache.users().is_empty());
        assert!(cache.reports().is_empty());
        assert!(cache.user_reports().is_empty());
    }

    #[test]
    fn replace_is_a_full_snapshot() {
        let mut cache = DataCache::new();
        cache.replace_users(vec![user("u1", "Asha"), user("u2", "Ravi")]);
        assert_eq!(cache.users().len(), 2);

        // A later snapshot without u2 must not leave u2 behind.
        cache.replace_users(vec![user("u1", "Asha")]);
        assert_eq!(cache.users().len(), 1);
        assert_eq!(cache.users()[0].user_id, "u1");
    }

    #[test]
    fn replace_preserves_server_order() {
        let mut cache = DataCache::new();
        cache.replace_reports(vec![report("r2", "u1"), report("r1", "u1")]);
        let ids: Vec<_> = cache.reports().iter().map(|r| r.report_id.as_str()).collect();
        assert_eq!(ids, ["r2", "r1"]);
    }

    #[test]
    fn append_report_for_session_user_lands_in_both_views() {
        let mut cache = DataCache::new();
        cache.append_report(report("r1", "u1"), Some("u1"));

        assert_eq!(cache.reports().len(), 1);
        assert_eq!(cache.user_reports().len(), 1);
        let in_global = cache.reports().iter().filter(|r| r.report_id == "r1").count();
        let in_user = cache
            .user_reports()
            .iter()
            .filter(|r| r.report_id == "r1")
            .count();
        assert_eq!((in_global, in_user), (1, 1), "exactly once in each view");
    }

    #[test]
    fn append_report_for_other_user_stays_global_only() {
        let mut cache = DataCache::new();
        cache.append_report(report("r1", "u2"), Some("u1"));
        assert_eq!(cache.reports().len(), 1);
        assert!(cache.user_reports().is_empty());
    }

    #[test]
    fn append_report_without_session_stays_global_only() {
        let mut cache = DataCache::new();
        cache.append_report(report("r1", "u1"), None);
        assert_eq!(cache.reports().len(), 1);
        assert!(cache.user_reports().is_empty());
    }

    #[test]
    fn appends_preserve_insertion_order() {
        let mut cache = DataCache::new();
        cache.append_report(report("r1", "u1"), Some("u1"));
        cache.append_report(report("r2", "u1"), Some("u1"));
        let ids: Vec<_> = cache
            .user_reports()
            .iter()
            .map(|r| r.report_id.as_str())
            .collect();
        assert_eq!(ids, ["r1", "r2"]);
    }

    #[test]
    fn append_user_extends_collection() {
        let mut cache = DataCache::new();
        cache.replace_users(vec![user("u1", "Asha")]);
        cache.append_user(user("u2", "Ravi"));
        assert_eq!(cache.users().len(), 2);
        assert_eq!(cache.users()[1].name, "Ravi");
    }

    #[test]
    fn clear_user_reports_leaves_global_alone() {
        let mut cache = DataCache::new();
        cache.append_report(report("r1", "u1"), Some("u1"));
        cache.clear_user_reports();
        assert!(cache.user_reports().is_empty());
        assert_eq!(cache.reports().len(), 1);
    }

    #[test]
    fn report_by_id_searches_both_views() {
        let mut cache = DataCache::new();
        cache.replace_reports(vec![report("r1", "u1")]);
        cache.replace_user_reports(vec![report("r2", "u1")]);

        assert!(cache.report_by_id("r1").is_some());
        assert!(cache.report_by_id("r2").is_some());
        assert!(cache.report_by_id("r9").is_none());
    }

    #[test]
    fn analyzed_parameter_count_sums_user_reports() {
        let mut cache = DataCache::new();
        cache.replace_user_reports(vec![report("r1", "u1"), report("r2", "u1")]);
        // One WBC entry each.
        assert_eq!(cache.analyzed_parameter_count(), 2);
    }

    #[test]
    fn recent_user_reports_returns_tail() {
        let mut cache = DataCache::new();
        for i in 0..7 {
            cache.append_report(report(&format!("r{i}"), "u1"), Some("u1"));
        }
        let recent = cache.recent_user_reports(5);
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].report_id, "r2");
        assert_eq!(recent[4].report_id, "r6");

        assert_eq!(cache.recent_user_reports(100).len(), 7);
    }
}
