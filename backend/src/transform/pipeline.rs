//! Upload pipeline: select, read, parse, transform, submit.
//!
//! One [`UploadPipeline`] holds at most one active file and the phase of the
//! current attempt. Steps run strictly in sequence; each awaits the previous
//! one. There is no retry and no cancellation once [`UploadPipeline::submit`]
//! starts.
//!
//! # Example
//!
//! ```rust,ignore
//! use sheetgate::{UploadPipeline, UploadFile, SimulatedIngestion, Delimiting};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut pipeline = UploadPipeline::new(Arc::new(SimulatedIngestion::default()), Delimiting::Quoted);
//!     pipeline.select(Some(UploadFile::from_path("catalog.xlsx")))?;
//!     let outcome = pipeline.submit().await?;
//!     println!("{}", outcome.text);
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use super::delimited::{to_delimited_text, Delimiting};
use crate::api::logs::{log_info_indent, log_phase, log_success, log_warning};
use crate::error::{ParseError, UploadError, UploadResult};
use crate::ingest::PersistenceCollaborator;
use crate::models::{FileSource, UploadFile, UploadOutcome, UploadPhase, ACCEPTED_EXTENSION};
use crate::parser::parse_first_sheet;

/// Shown when a selection is missing or has the wrong extension.
pub fn invalid_selection_message() -> String {
    format!("Please select a valid {} file", ACCEPTED_EXTENSION)
}

/// Shown when submit is triggered with nothing selected.
pub const NO_FILE_MESSAGE: &str = "Please select a file first";

/// State machine for one upload form.
pub struct UploadPipeline {
    file: Option<UploadFile>,
    phase: UploadPhase,
    delimiting: Delimiting,
    ingest: Arc<dyn PersistenceCollaborator>,
}

impl UploadPipeline {
    pub fn new(ingest: Arc<dyn PersistenceCollaborator>, delimiting: Delimiting) -> Self {
        Self {
            file: None,
            phase: UploadPhase::Idle,
            delimiting,
            ingest,
        }
    }

    pub fn phase(&self) -> &UploadPhase {
        &self.phase
    }

    pub fn selected(&self) -> Option<&UploadFile> {
        self.file.as_ref()
    }

    pub fn delimiting(&self) -> Delimiting {
        self.delimiting
    }

    pub fn is_busy(&self) -> bool {
        self.phase.is_in_flight()
    }

    /// Replace the active file.
    ///
    /// A valid selection resets the phase to `Idle`. `None` or a name without
    /// the accepted extension clears the file and fails the selection.
    pub fn select(&mut self, selection: Option<UploadFile>) -> UploadResult<()> {
        match selection {
            Some(file) if file.has_accepted_extension() => {
                log_info_indent(format!("Selected file: {}", file.name), 1);
                self.file = Some(file);
                self.set_phase(UploadPhase::Idle);
                Ok(())
            }
            _ => {
                self.file = None;
                Err(self.fail(UploadError::InvalidFileSelection(invalid_selection_message())))
            }
        }
    }

    /// Drop the active file and return to `Idle`.
    pub fn clear(&mut self) {
        self.file = None;
        self.phase = UploadPhase::Idle;
    }

    /// Run read, parse, transform and submit on the active file.
    ///
    /// The file stays selected afterwards so the user can resubmit it.
    pub async fn submit(&mut self) -> UploadResult<UploadOutcome> {
        let Some(file) = self.file.clone() else {
            return Err(self.fail(UploadError::InvalidFileSelection(NO_FILE_MESSAGE.to_string())));
        };

        match self.run(&file).await {
            Ok(outcome) => {
                self.set_phase(UploadPhase::Succeeded);
                log_success(format!(
                    "{} rows from {} submitted ({} bytes)",
                    outcome.row_count, outcome.file_name, outcome.acknowledgement.accepted_bytes
                ));
                Ok(outcome)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn run(&mut self, file: &UploadFile) -> UploadResult<UploadOutcome> {
        self.set_phase(UploadPhase::Reading);
        let bytes = read_source(&file.source).await?;
        log_info_indent(format!("Read {} bytes", bytes.len()), 1);

        self.set_phase(UploadPhase::Parsing);
        let data = parse_first_sheet(&bytes)?;
        log_info_indent(format!("First sheet has {} rows", data.row_count()), 1);
        if data.is_empty() {
            log_warning("First sheet is empty");
        }

        self.set_phase(UploadPhase::Transforming);
        let text = to_delimited_text(&data, self.delimiting)?;

        self.set_phase(UploadPhase::Submitting);
        log_info_indent(format!("Handing off to {}", self.ingest.describe()), 1);
        let acknowledgement = self.ingest.ingest(&text).await?;

        Ok(UploadOutcome {
            file_name: file.name.clone(),
            row_count: data.row_count(),
            text,
            acknowledgement,
        })
    }

    fn set_phase(&mut self, phase: UploadPhase) {
        log_phase(&phase);
        self.phase = phase;
    }

    fn fail(&mut self, error: UploadError) -> UploadError {
        self.set_phase(UploadPhase::Failed(error.message().to_string()));
        error
    }
}

async fn read_source(source: &FileSource) -> Result<Vec<u8>, ParseError> {
    match source {
        FileSource::Path(path) => Ok(tokio::fs::read(path).await?),
        FileSource::Bytes(bytes) => Ok(bytes.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IngestError, IngestResult};
    use crate::ingest::SimulatedIngestion;
    use crate::models::Acknowledgement;
    use crate::parser::testutil::workbook_bytes;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every payload it receives.
    #[derive(Default)]
    struct RecordingIngestion {
        calls: AtomicUsize,
        payloads: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PersistenceCollaborator for RecordingIngestion {
        async fn ingest(&self, text: &str) -> IngestResult<Acknowledgement> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads.lock().unwrap().push(text.to_string());
            SimulatedIngestion::new(Duration::ZERO).ingest(text).await
        }

        fn describe(&self) -> String {
            "recording".into()
        }
    }

    struct RejectingIngestion;

    #[async_trait]
    impl PersistenceCollaborator for RejectingIngestion {
        async fn ingest(&self, _text: &str) -> IngestResult<Acknowledgement> {
            Err(IngestError::Http("connection reset".into()))
        }

        fn describe(&self) -> String {
            "rejecting".into()
        }
    }

    fn pipeline_with(ingest: Arc<dyn PersistenceCollaborator>) -> UploadPipeline {
        UploadPipeline::new(ingest, Delimiting::Quoted)
    }

    fn xlsx(name: &str, rows: &[&[&str]]) -> UploadFile {
        UploadFile::from_bytes(name, workbook_bytes(rows))
    }

    #[tokio::test]
    async fn test_successful_upload() {
        let recorder = Arc::new(RecordingIngestion::default());
        let mut pipeline = pipeline_with(recorder.clone());

        pipeline.select(Some(xlsx("book.xlsx", &[&["a", "b"], &["1", "2"]]))).unwrap();
        let outcome = pipeline.submit().await.unwrap();

        assert_eq!(outcome.text, "a,b\n1,2");
        assert_eq!(outcome.row_count, 2);
        assert_eq!(outcome.file_name, "book.xlsx");
        assert_eq!(pipeline.phase(), &UploadPhase::Succeeded);
        assert_eq!(recorder.payloads.lock().unwrap().as_slice(), ["a,b\n1,2"]);
        // File stays selected for resubmission
        assert!(pipeline.selected().is_some());
    }

    #[tokio::test]
    async fn test_raw_policy_passes_through() {
        let recorder = Arc::new(RecordingIngestion::default());
        let mut pipeline = UploadPipeline::new(recorder.clone(), Delimiting::Raw);

        pipeline.select(Some(xlsx("book.xlsx", &[&["x,y", "z"]]))).unwrap();
        let outcome = pipeline.submit().await.unwrap();
        assert_eq!(outcome.text, "x,y,z");
    }

    #[tokio::test]
    async fn test_invalid_extension_rejected() {
        let mut pipeline = pipeline_with(Arc::new(RecordingIngestion::default()));

        for name in ["book.csv", "book.xls", "book", "book.XLSX"] {
            let err = pipeline.select(Some(xlsx(name, &[&["a"]]))).unwrap_err();
            assert!(matches!(err, UploadError::InvalidFileSelection(_)));
            assert_eq!(err.message(), "Please select a valid .xlsx file");
            assert!(pipeline.selected().is_none());
        }
    }

    #[tokio::test]
    async fn test_invalid_selection_discards_prior_file() {
        let mut pipeline = pipeline_with(Arc::new(RecordingIngestion::default()));
        pipeline.select(Some(xlsx("good.xlsx", &[&["a"]]))).unwrap();

        assert!(pipeline.select(None).is_err());
        assert!(pipeline.selected().is_none());
        assert!(matches!(pipeline.phase(), UploadPhase::Failed(_)));
    }

    #[tokio::test]
    async fn test_submit_without_file_does_nothing() {
        let recorder = Arc::new(RecordingIngestion::default());
        let mut pipeline = pipeline_with(recorder.clone());

        let err = pipeline.submit().await.unwrap_err();
        assert_eq!(err, UploadError::InvalidFileSelection(NO_FILE_MESSAGE.into()));
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(pipeline.phase(), &UploadPhase::Failed(NO_FILE_MESSAGE.into()));
    }

    #[tokio::test]
    async fn test_corrupt_file_fails_before_submit() {
        let recorder = Arc::new(RecordingIngestion::default());
        let mut pipeline = pipeline_with(recorder.clone());

        pipeline
            .select(Some(UploadFile::from_bytes("broken.xlsx", b"not a workbook".to_vec())))
            .unwrap();
        let err = pipeline.submit().await.unwrap_err();

        assert!(matches!(err, UploadError::ReadOrParseFailure(_)));
        assert!(!err.message().is_empty());
        assert_eq!(recorder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(pipeline.phase().error(), Some(err.message()));
    }

    #[tokio::test]
    async fn test_missing_path_is_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_with(Arc::new(RecordingIngestion::default()));

        pipeline
            .select(Some(UploadFile::from_path(dir.path().join("gone.xlsx"))))
            .unwrap();
        let err = pipeline.submit().await.unwrap_err();
        assert!(matches!(err, UploadError::ReadOrParseFailure(_)));
    }

    #[tokio::test]
    async fn test_path_source_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.xlsx");
        std::fs::write(&path, workbook_bytes(&[&["p", "q"]])).unwrap();

        let mut pipeline = pipeline_with(Arc::new(RecordingIngestion::default()));
        pipeline.select(Some(UploadFile::from_path(&path))).unwrap();
        assert_eq!(pipeline.submit().await.unwrap().text, "p,q");
    }

    #[tokio::test]
    async fn test_submission_failure_surfaces_message() {
        let mut pipeline = pipeline_with(Arc::new(RejectingIngestion));

        pipeline.select(Some(xlsx("book.xlsx", &[&["a"]]))).unwrap();
        let err = pipeline.submit().await.unwrap_err();

        assert!(matches!(err, UploadError::SubmissionFailure(_)));
        assert!(err.message().contains("connection reset"));
    }

    #[tokio::test]
    async fn test_new_selection_resets_after_success_and_failure() {
        let mut pipeline = pipeline_with(Arc::new(RecordingIngestion::default()));

        pipeline.select(Some(xlsx("a.xlsx", &[&["a"]]))).unwrap();
        pipeline.submit().await.unwrap();
        assert_eq!(pipeline.phase(), &UploadPhase::Succeeded);

        pipeline.select(Some(xlsx("b.xlsx", &[&["b"]]))).unwrap();
        assert_eq!(pipeline.phase(), &UploadPhase::Idle);
        assert!(pipeline.phase().error().is_none());

        pipeline
            .select(Some(UploadFile::from_bytes("c.xlsx", b"junk".to_vec())))
            .unwrap();
        assert!(pipeline.submit().await.is_err());
        assert!(pipeline.phase().error().is_some());

        pipeline.select(Some(xlsx("d.xlsx", &[&["d"]]))).unwrap();
        assert_eq!(pipeline.phase(), &UploadPhase::Idle);
    }

    #[tokio::test]
    async fn test_clear_resets() {
        let mut pipeline = pipeline_with(Arc::new(RecordingIngestion::default()));
        pipeline.select(Some(xlsx("a.xlsx", &[&["a"]]))).unwrap();

        pipeline.clear();
        assert!(pipeline.selected().is_none());
        assert_eq!(pipeline.phase(), &UploadPhase::Idle);
    }
}
