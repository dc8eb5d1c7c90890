//! Upload workflow controller.
//!
//! Single-slot state machine for one report submission at a time:
//! `Idle → FileSelected → Uploading → Success | Error → Idle`.
//!
//! The machine owns no I/O. The orchestration layer calls `begin_submit`
//! before issuing the network request and settles the slot with
//! `complete_success` / `complete_error` when the response arrives, so the
//! reachable states are exactly the enum variants.

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::config::{self, MAX_UPLOAD_BYTES};
use crate::models::Report;

/// A file chosen for upload: declared metadata plus its bytes.
///
/// The media type is the *declared* one (picker metadata or extension
/// guess); magic-byte sniffing is the server's problem.
#[derive(Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Build from a filesystem path, inferring the media type from the
    /// extension.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = std::fs::read(path).map_err(|e| UploadError::FileRead(e.to_string()))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let media_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        Ok(Self {
            file_name,
            media_type,
            bytes,
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for PendingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingFile")
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .finish()
    }
}

/// Client-local validation and state errors. All reported synchronously;
/// none issue a network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Unsupported file type: {0}. Use PDF, PNG or JPEG.")]
    UnsupportedMediaType(String),

    #[error("File is {size} bytes; the maximum is {max} bytes")]
    FileTooLarge { size: u64, max: u64 },

    #[error("No file selected")]
    NoFileSelected,

    #[error("No target user for the upload")]
    MissingUser,

    #[error("An upload is already in progress")]
    UploadInProgress,

    #[error("Could not read file: {0}")]
    FileRead(String),
}

/// Lifecycle of a single report submission.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    FileSelected(PendingFile),
    Uploading,
    /// The report has already been merged into the data cache by the time
    /// this state is observable.
    Success(Report),
    Error(String),
}

/// The single-slot submission machine.
#[derive(Debug, Default)]
pub struct UploadWorkflow {
    state: UploadState,
}

impl UploadWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.state, UploadState::Uploading)
    }

    /// Select a file, replacing any prior selection or settled result.
    ///
    /// Rejected while an upload is in flight. Validates the declared media
    /// type and the 10 MB cap; on rejection the current state is left
    /// untouched.
    pub fn select_file(&mut self, file: PendingFile) -> Result<(), UploadError> {
        if self.is_uploading() {
            return Err(UploadError::UploadInProgress);
        }
        if !config::is_supported_media_type(&file.media_type) {
            return Err(UploadError::UnsupportedMediaType(file.media_type.clone()));
        }
        if file.size() > MAX_UPLOAD_BYTES {
            return Err(UploadError::FileTooLarge {
                size: file.size(),
                max: MAX_UPLOAD_BYTES,
            });
        }
        self.state = UploadState::FileSelected(file);
        Ok(())
    }

    /// Transition to `Uploading` and hand back the file to send.
    ///
    /// Valid only from `FileSelected` with a non-empty target user; the
    /// transition happens before any network request is issued.
    pub fn begin_submit(&mut self, user_id: &str) -> Result<PendingFile, UploadError> {
        match &self.state {
            UploadState::Uploading => Err(UploadError::UploadInProgress),
            UploadState::FileSelected(file) => {
                if user_id.trim().is_empty() {
                    return Err(UploadError::MissingUser);
                }
                let file = file.clone();
                self.state = UploadState::Uploading;
                Ok(file)
            }
            _ => Err(UploadError::NoFileSelected),
        }
    }

    /// Settle the in-flight submission as succeeded. Ignored unless an
    /// upload is actually in flight (a logout may have reset the slot
    /// while the response was outstanding).
    pub fn complete_success(&mut self, report: Report) {
        if self.is_uploading() {
            self.state = UploadState::Success(report);
        }
    }

    /// Settle the in-flight submission as failed. Same guard as
    /// `complete_success`.
    pub fn complete_error(&mut self, reason: String) {
        if self.is_uploading() {
            self.state = UploadState::Error(reason);
        }
    }

    /// Back to `Idle` from any state, dropping the selection and result.
    pub fn reset(&mut self) {
        self.state = UploadState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf_file() -> PendingFile {
        PendingFile::new("cbc.pdf", "application/pdf", vec![0x25, 0x50, 0x44, 0x46])
    }

    fn sample_report() -> Report {
        serde_json::from_str(r#"{"report_id": "r1", "user_id": "u1", "file_name": "cbc.pdf"}"#)
            .unwrap()
    }

    #[test]
    fn starts_idle() {
        let workflow = UploadWorkflow::new();
        assert_eq!(*workflow.state(), UploadState::Idle);
    }

    #[test]
    fn select_valid_file() {
        let mut workflow = UploadWorkflow::new();
        workflow.select_file(pdf_file()).unwrap();
        assert!(matches!(workflow.state(), UploadState::FileSelected(f) if f.file_name == "cbc.pdf"));
    }

    #[test]
    fn select_rejects_unsupported_media_type() {
        let mut workflow = UploadWorkflow::new();
        let err = workflow
            .select_file(PendingFile::new("notes.txt", "text/plain", vec![1]))
            .unwrap_err();
        assert_eq!(err, UploadError::UnsupportedMediaType("text/plain".into()));
        assert_eq!(*workflow.state(), UploadState::Idle, "state untouched");
    }

    #[test]
    fn select_accepts_jpg_alias() {
        let mut workflow = UploadWorkflow::new();
        workflow
            .select_file(PendingFile::new("photo.jpg", "image/jpg", vec![1]))
            .unwrap();
        assert!(matches!(workflow.state(), UploadState::FileSelected(_)));
    }

    #[test]
    fn select_enforces_size_cap() {
        let mut workflow = UploadWorkflow::new();
        let oversized = PendingFile::new(
            "huge.pdf",
            "application/pdf",
            vec![0; (MAX_UPLOAD_BYTES + 1) as usize],
        );
        let err = workflow.select_file(oversized).unwrap_err();
        assert!(matches!(err, UploadError::FileTooLarge { size, max }
            if size == MAX_UPLOAD_BYTES + 1 && max == MAX_UPLOAD_BYTES));
        assert_eq!(*workflow.state(), UploadState::Idle);
    }

    #[test]
    fn select_at_exact_cap_is_accepted() {
        let mut workflow = UploadWorkflow::new();
        let at_cap = PendingFile::new(
            "full.pdf",
            "application/pdf",
            vec![0; MAX_UPLOAD_BYTES as usize],
        );
        workflow.select_file(at_cap).unwrap();
        assert!(matches!(workflow.state(), UploadState::FileSelected(_)));
    }

    #[test]
    fn reselect_replaces_prior_selection() {
        let mut workflow = UploadWorkflow::new();
        workflow.select_file(pdf_file()).unwrap();
        workflow
            .select_file(PendingFile::new("scan.png", "image/png", vec![2]))
            .unwrap();
        assert!(matches!(workflow.state(), UploadState::FileSelected(f) if f.file_name == "scan.png"));
    }

    #[test]
    fn select_rejected_while_uploading() {
        let mut workflow = UploadWorkflow::new();
        workflow.select_file(pdf_file()).unwrap();
        workflow.begin_submit("u1").unwrap();
        let err = workflow.select_file(pdf_file()).unwrap_err();
        assert_eq!(err, UploadError::UploadInProgress);
        assert!(workflow.is_uploading());
    }

    #[test]
    fn submit_from_idle_is_rejected() {
        let mut workflow = UploadWorkflow::new();
        assert_eq!(
            workflow.begin_submit("u1").unwrap_err(),
            UploadError::NoFileSelected
        );
        assert_eq!(*workflow.state(), UploadState::Idle);
    }

    #[test]
    fn submit_while_uploading_is_rejected() {
        let mut workflow = UploadWorkflow::new();
        workflow.select_file(pdf_file()).unwrap();
        workflow.begin_submit("u1").unwrap();
        assert_eq!(
            workflow.begin_submit("u1").unwrap_err(),
            UploadError::UploadInProgress
        );
    }

    #[test]
    fn submit_requires_target_user() {
        let mut workflow = UploadWorkflow::new();
        workflow.select_file(pdf_file()).unwrap();
        assert_eq!(
            workflow.begin_submit("  ").unwrap_err(),
            UploadError::MissingUser
        );
        // Still FileSelected — submit can be retried once a user is chosen.
        assert!(matches!(workflow.state(), UploadState::FileSelected(_)));
    }

    #[test]
    fn submit_hands_back_selected_file() {
        let mut workflow = UploadWorkflow::new();
        workflow.select_file(pdf_file()).unwrap();
        let file = workflow.begin_submit("u1").unwrap();
        assert_eq!(file.file_name, "cbc.pdf");
        assert!(workflow.is_uploading());
    }

    #[test]
    fn settle_success_from_uploading() {
        let mut workflow = UploadWorkflow::new();
        workflow.select_file(pdf_file()).unwrap();
        workflow.begin_submit("u1").unwrap();
        workflow.complete_success(sample_report());
        assert!(matches!(workflow.state(), UploadState::Success(r) if r.report_id == "r1"));
    }

    #[test]
    fn settle_error_from_uploading() {
        let mut workflow = UploadWorkflow::new();
        workflow.select_file(pdf_file()).unwrap();
        workflow.begin_submit("u1").unwrap();
        workflow.complete_error("No text extracted from file".into());
        assert!(matches!(workflow.state(), UploadState::Error(reason)
            if reason == "No text extracted from file"));
    }

    #[test]
    fn settle_ignored_when_not_uploading() {
        let mut workflow = UploadWorkflow::new();
        workflow.complete_success(sample_report());
        assert_eq!(*workflow.state(), UploadState::Idle);

        workflow.complete_error("late".into());
        assert_eq!(*workflow.state(), UploadState::Idle);
    }

    #[test]
    fn select_after_settled_result_clears_it() {
        let mut workflow = UploadWorkflow::new();
        workflow.select_file(pdf_file()).unwrap();
        workflow.begin_submit("u1").unwrap();
        workflow.complete_error("boom".into());

        workflow.select_file(pdf_file()).unwrap();
        assert!(matches!(workflow.state(), UploadState::FileSelected(_)));
    }

    #[test]
    fn reset_from_any_state() {
        let mut workflow = UploadWorkflow::new();
        workflow.select_file(pdf_file()).unwrap();
        workflow.reset();
        assert_eq!(*workflow.state(), UploadState::Idle);

        workflow.select_file(pdf_file()).unwrap();
        workflow.begin_submit("u1").unwrap();
        workflow.reset();
        assert_eq!(*workflow.state(), UploadState::Idle);
    }

    #[test]
    fn from_path_infers_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let file = PendingFile::from_path(&path).unwrap();
        assert_eq!(file.file_name, "report.pdf");
        assert_eq!(file.media_type, "application/pdf");
        assert_eq!(file.size(), 8);
    }

    #[test]
    fn from_path_unknown_extension_falls_through_to_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xyz");
        std::fs::write(&path, b"data").unwrap();

        let file = PendingFile::from_path(&path).unwrap();
        assert_eq!(file.media_type, "application/octet-stream");

        // And the workflow then rejects it without any I/O.
        let mut workflow = UploadWorkflow::new();
        assert!(matches!(
            workflow.select_file(file),
            Err(UploadError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn from_path_missing_file_errors() {
        let err = PendingFile::from_path(Path::new("/nonexistent/report.pdf")).unwrap_err();
        assert!(matches!(err, UploadError::FileRead(_)));
    }
}
