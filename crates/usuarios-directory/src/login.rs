//! Per-scheme login.
//!
//! The backend decides; this module only turns its answer into what the page
//! should do next.

use tracing::{info, warn};
use usuarios_api::{Credentials, Scheme};
use usuarios_core::Error;

use crate::api::CredentialVerifier;

/// Route shown after a successful login.
pub const DASHBOARD_ROUTE: &str = "/dashboard";

/// Alert for rejected credentials.
pub const INVALID_CREDENTIALS_ALERT: &str = "Incorrect username or password";

/// Alert when the backend could not be asked.
pub const CONNECTION_ALERT: &str = "There was a problem signing in. Please try again.";

/// What the login page does after submitting.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Navigate to `redirect`.
    Granted {
        /// Target route.
        redirect: &'static str,
    },
    /// Credentials rejected; show `alert` and stay.
    Denied {
        /// Blocking alert text.
        alert: &'static str,
    },
    /// The request failed; show `alert` and stay.
    Failed {
        /// Blocking alert text.
        alert: &'static str,
        /// Underlying failure.
        error: Error,
    },
}

impl LoginOutcome {
    /// Route to navigate to, if any.
    #[must_use]
    pub const fn redirect(&self) -> Option<&'static str> {
        match self {
            Self::Granted { redirect } => Some(*redirect),
            _ => None,
        }
    }

    /// Alert to show, if any.
    #[must_use]
    pub const fn alert(&self) -> Option<&'static str> {
        match self {
            Self::Granted { .. } => None,
            Self::Denied { alert } | Self::Failed { alert, .. } => Some(*alert),
        }
    }
}

/// Verify `credentials` under `scheme`. No session token is kept.
pub async fn login(
    verifier: &dyn CredentialVerifier,
    scheme: Scheme,
    credentials: &Credentials,
) -> LoginOutcome {
    match verifier.verify(scheme, credentials).await {
        Ok(verification) if verification.is_granted() => {
            info!(%scheme, user = credentials.username(), "login accepted, redirecting to dashboard");
            LoginOutcome::Granted {
                redirect: DASHBOARD_ROUTE,
            }
        }
        Ok(verification) => {
            warn!(
                %scheme,
                user = credentials.username(),
                resultado = verification.resultado,
                "login rejected"
            );
            LoginOutcome::Denied {
                alert: INVALID_CREDENTIALS_ALERT,
            }
        }
        Err(error) => {
            warn!(%scheme, code = error.error_code(), error = %error, "login request failed");
            LoginOutcome::Failed {
                alert: CONNECTION_ALERT,
                error,
            }
        }
    }
}
