//! Top-level view switch between the session gate and the upload form.
//!
//! The session starts `LoggedOut`. A successful login replaces the view with
//! `LoggedIn`, which owns a fresh [`UploadPipeline`]. Logging out drops the
//! pipeline and everything it held.

use std::sync::Arc;

use crate::api::logs::log_info;
use crate::auth::{IdentityProvider, SessionGate};
use crate::error::{AuthError, AuthResult};
use crate::ingest::PersistenceCollaborator;
use crate::transform::delimited::Delimiting;
use crate::transform::pipeline::UploadPipeline;

/// Which form is showing.
pub enum ViewState {
    LoggedOut,
    LoggedIn(UploadPipeline),
}

/// Title and subtitle for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Heading {
    pub title: &'static str,
    pub subtitle: &'static str,
}

const LOGGED_OUT_HEADING: Heading = Heading {
    title: "Log in to your account",
    subtitle: "Enter your credentials to access the system",
};

const LOGGED_IN_HEADING: Heading = Heading {
    title: "Upload Excel File",
    subtitle: "Upload your Excel file to process",
};

/// One user's session: the gate, the current view, and what a new upload
/// form is built from.
pub struct Session {
    gate: SessionGate,
    view: ViewState,
    ingest: Arc<dyn PersistenceCollaborator>,
    delimiting: Delimiting,
}

impl Session {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        ingest: Arc<dyn PersistenceCollaborator>,
        delimiting: Delimiting,
    ) -> Self {
        Self {
            gate: SessionGate::new(identity),
            view: ViewState::LoggedOut,
            ingest,
            delimiting,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.view, ViewState::LoggedIn(_))
    }

    pub fn heading(&self) -> Heading {
        match self.view {
            ViewState::LoggedOut => LOGGED_OUT_HEADING,
            ViewState::LoggedIn(_) => LOGGED_IN_HEADING,
        }
    }

    /// Authenticate and switch to the upload form.
    ///
    /// Credentials are always verified. When already logged in, a valid
    /// pair keeps the current upload form and an invalid one leaves it as is.
    pub async fn login(&mut self, username: &str, password: &str) -> AuthResult<()> {
        self.gate.authenticate(username, password).await?;
        if self.is_authenticated() {
            return Ok(());
        }
        self.view = ViewState::LoggedIn(UploadPipeline::new(self.ingest.clone(), self.delimiting));
        log_info("Switched to upload view");
        Ok(())
    }

    pub fn logout(&mut self) {
        if self.is_authenticated() {
            log_info("Logged out");
        }
        self.view = ViewState::LoggedOut;
    }

    /// The upload form, if logged in.
    pub fn uploader(&mut self) -> AuthResult<&mut UploadPipeline> {
        match &mut self.view {
            ViewState::LoggedIn(pipeline) => Ok(pipeline),
            ViewState::LoggedOut => Err(AuthError::NotAuthenticated),
        }
    }

    /// Read-only view of the upload form, if logged in.
    pub fn pipeline(&self) -> Option<&UploadPipeline> {
        match &self.view {
            ViewState::LoggedIn(pipeline) => Some(pipeline),
            ViewState::LoggedOut => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticIdentityProvider;
    use crate::ingest::SimulatedIngestion;
    use crate::models::{UploadFile, UploadPhase};
    use crate::parser::testutil::workbook_bytes;
    use std::time::Duration;

    fn session() -> Session {
        Session::new(
            Arc::new(StaticIdentityProvider::default().with_delay(Duration::ZERO)),
            Arc::new(SimulatedIngestion::new(Duration::ZERO)),
            Delimiting::Quoted,
        )
    }

    #[tokio::test]
    async fn test_starts_logged_out() {
        let mut session = session();
        assert!(!session.is_authenticated());
        assert_eq!(session.heading().title, "Log in to your account");
        assert!(matches!(session.uploader(), Err(AuthError::NotAuthenticated)));
    }

    #[tokio::test]
    async fn test_valid_login_switches_view() {
        let mut session = session();
        session.login("admin", "password").await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.heading().title, "Upload Excel File");
        assert_eq!(session.uploader().unwrap().phase(), &UploadPhase::Idle);
    }

    #[tokio::test]
    async fn test_invalid_login_stays_logged_out() {
        let mut session = session();
        let err = session.login("admin", "wrong").await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!session.is_authenticated());
        assert!(session.pipeline().is_none());
    }

    #[tokio::test]
    async fn test_logout_drops_upload_state() {
        let mut session = session();
        session.login("admin", "password").await.unwrap();
        session
            .uploader()
            .unwrap()
            .select(Some(UploadFile::from_bytes("a.xlsx", workbook_bytes(&[&["a"]]))))
            .unwrap();

        session.logout();
        assert!(!session.is_authenticated());

        session.login("admin", "password").await.unwrap();
        assert!(session.uploader().unwrap().selected().is_none());
    }

    #[tokio::test]
    async fn test_login_when_logged_in_keeps_form() {
        let mut session = session();
        session.login("admin", "password").await.unwrap();
        session
            .uploader()
            .unwrap()
            .select(Some(UploadFile::from_bytes("a.xlsx", workbook_bytes(&[&["a"]]))))
            .unwrap();

        let err = session.login("anything", "else").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(session.is_authenticated());
        assert!(session.uploader().unwrap().selected().is_some());

        session.login("admin", "password").await.unwrap();
        assert!(session.uploader().unwrap().selected().is_some());
    }

    #[tokio::test]
    async fn test_end_to_end_upload() {
        let mut session = session();
        session.login("admin", "password").await.unwrap();

        let uploader = session.uploader().unwrap();
        uploader
            .select(Some(UploadFile::from_bytes(
                "book.xlsx",
                workbook_bytes(&[&["a", "b"], &["1", "2"]]),
            )))
            .unwrap();
        let outcome = uploader.submit().await.unwrap();

        assert_eq!(outcome.text, "a,b\n1,2");
        assert!(outcome.acknowledgement.simulated);
    }
}
