//! Registration form validation.

use serde::Serialize;
use tracing::info;
use usuarios_core::{Error, Result};
use validator::Validate;

/// Banner shown when the confirmation differs from the password.
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Registration form input.
#[derive(Debug, Clone, Default, Validate)]
pub struct RegistrationForm {
    /// Full name.
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    /// Email address.
    #[validate(email(message = "email is not valid"))]
    pub email: String,
    /// Chosen password.
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    /// Repeated password.
    #[validate(must_match(other = "password", message = "passwords do not match"))]
    pub confirm_password: String,
}

/// Accepted registration. Carries no password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl RegistrationForm {
    /// Validate the form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ValidationError`] carrying [`PASSWORD_MISMATCH`] when
    /// the confirmation differs, or the failed field constraints otherwise.
    pub fn submit(&self) -> Result<Registration> {
        if let Err(errors) = self.validate() {
            if errors.field_errors().contains_key("confirm_password") {
                return Err(Error::ValidationError(PASSWORD_MISMATCH.to_string()));
            }
            return Err(errors.into());
        }

        info!(name = %self.name, email = %self.email, "registration accepted");
        Ok(Registration {
            name: self.name.clone(),
            email: self.email.clone(),
        })
    }
}
