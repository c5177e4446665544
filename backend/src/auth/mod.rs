//! Session gate: credential collection and delegated verification.
//!
//! The gate never decides on its own whether a pair is valid; it asks an
//! [`IdentityProvider`]. Any rejection or provider failure surfaces as the
//! same [`AuthError::InvalidCredentials`], without naming the wrong field.
//! No token is issued and nothing is persisted.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;

use crate::api::logs::{log_info, log_success, log_warning};
use crate::error::{AuthError, AuthResult};
use crate::models::Credentials;

/// Default artificial verification delay.
pub const DEFAULT_AUTH_DELAY: Duration = Duration::from_millis(1000);

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "password";

/// Verifies a credential pair.
///
/// `Ok(false)` is a rejection; `Err` is a provider failure. The gate treats
/// both the same way towards the user.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, credentials: &Credentials) -> AuthResult<bool>;
}

// =============================================================================
// Static provider
// =============================================================================

/// Accepts exactly one configured pair after an artificial delay.
pub struct StaticIdentityProvider {
    username: String,
    password: SecretString,
    delay: Duration,
}

impl StaticIdentityProvider {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
            delay: DEFAULT_AUTH_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for StaticIdentityProvider {
    fn default() -> Self {
        Self::new(DEFAULT_USERNAME, DEFAULT_PASSWORD)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify(&self, credentials: &Credentials) -> AuthResult<bool> {
        tokio::time::sleep(self.delay).await;
        Ok(credentials.username() == self.username
            && credentials.expose_password() == self.password.expose_secret())
    }
}

// =============================================================================
// Gate
// =============================================================================

/// Front door of the session. Holds only the identity collaborator.
#[derive(Clone)]
pub struct SessionGate {
    identity: Arc<dyn IdentityProvider>,
}

impl SessionGate {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    /// Verify a username/password pair.
    ///
    /// The credentials exist only for the duration of this call.
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthResult<()> {
        let credentials = Credentials::new(username, password)?;

        log_info("🔑 Verifying credentials...");
        match self.identity.verify(&credentials).await {
            Ok(true) => {
                log_success("Authenticated");
                Ok(())
            }
            Ok(false) => {
                log_warning("Credentials rejected");
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => {
                log_warning(format!("Identity provider failed: {}", e));
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProvider;

    #[async_trait]
    impl IdentityProvider for FailingProvider {
        async fn verify(&self, _credentials: &Credentials) -> AuthResult<bool> {
            Err(AuthError::Provider("connection refused".into()))
        }
    }

    fn gate() -> SessionGate {
        SessionGate::new(Arc::new(
            StaticIdentityProvider::default().with_delay(Duration::ZERO),
        ))
    }

    #[tokio::test]
    async fn test_valid_pair_accepted() {
        assert!(gate().authenticate("admin", "password").await.is_ok());
    }

    #[tokio::test]
    async fn test_other_pairs_rejected() {
        let gate = gate();
        let pairs = [
            ("admin", "Password"),
            ("Admin", "password"),
            ("admin ", "password"),
            ("root", "password"),
            ("admin", "password1"),
            ("password", "admin"),
        ];
        for (user, pass) in pairs {
            let result = gate.authenticate(user, pass).await;
            assert!(
                matches!(result, Err(AuthError::InvalidCredentials)),
                "{user}/{pass} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_blank_fields_rejected_before_provider() {
        let gate = SessionGate::new(Arc::new(FailingProvider));
        let result = gate.authenticate("", "password").await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_provider_failure_is_generic() {
        let gate = SessionGate::new(Arc::new(FailingProvider));
        let err = gate.authenticate("admin", "password").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
        assert!(!err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_configured_pair() {
        let gate = SessionGate::new(Arc::new(
            StaticIdentityProvider::new("ops", "s3cret").with_delay(Duration::ZERO),
        ));
        assert!(gate.authenticate("ops", "s3cret").await.is_ok());
        assert!(gate.authenticate("admin", "password").await.is_err());
    }
}
