//! The create/edit modal.
//!
//! One [`Modal`] value holds either a fresh draft or an edit buffer; the same
//! field setter writes into whichever it holds.

use std::fmt;
use std::str::FromStr;
use usuarios_api::{UserDraft, UserRecord};
use usuarios_core::Error;

/// Editable input in the modal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    /// First name.
    FirstName,
    /// Last name.
    LastName,
    /// Email.
    Email,
    /// Login name.
    Username,
    /// Stored plain hash.
    PasswordHash,
    /// Stored MD5 digest.
    PasswordMd5,
    /// Stored SHA-1 digest.
    PasswordSha1,
}

impl FormField {
    /// Inputs in display order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::FirstName,
            Self::LastName,
            Self::Email,
            Self::Username,
            Self::PasswordHash,
            Self::PasswordMd5,
            Self::PasswordSha1,
        ]
    }

    /// Input placeholder.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Username => "Username",
            Self::PasswordHash => "Password hash",
            Self::PasswordMd5 => "Password MD5",
            Self::PasswordSha1 => "Password SHA1",
        }
    }

    /// Read this input from a field set.
    #[must_use]
    pub fn get(self, fields: &UserDraft) -> &str {
        match self {
            Self::FirstName => &fields.first_name,
            Self::LastName => &fields.last_name,
            Self::Email => &fields.email,
            Self::Username => &fields.username,
            Self::PasswordHash => &fields.password_hash,
            Self::PasswordMd5 => &fields.password_md5,
            Self::PasswordSha1 => &fields.password_sha1,
        }
    }

    fn slot(self, fields: &mut UserDraft) -> &mut String {
        match self {
            Self::FirstName => &mut fields.first_name,
            Self::LastName => &mut fields.last_name,
            Self::Email => &mut fields.email,
            Self::Username => &mut fields.username,
            Self::PasswordHash => &mut fields.password_hash,
            Self::PasswordMd5 => &mut fields.password_md5,
            Self::PasswordSha1 => &mut fields.password_sha1,
        }
    }
}

impl FromStr for FormField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "first-name" | "nombre" => Ok(Self::FirstName),
            "last-name" | "apellido" => Ok(Self::LastName),
            "email" => Ok(Self::Email),
            "username" | "usuario" => Ok(Self::Username),
            "hash" | "contrasena-hash" => Ok(Self::PasswordHash),
            "md5" | "contrasena-md5" => Ok(Self::PasswordMd5),
            "sha1" | "contrasena-sha1" => Ok(Self::PasswordSha1),
            _ => Err(Error::InvalidRequest(format!("Unknown form field: {s}"))),
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Modal state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    /// Nothing open.
    #[default]
    Closed,
    /// Creating a user from a draft.
    Creating(UserDraft),
    /// Editing a copy of a cached record.
    Editing(UserRecord),
}

impl Modal {
    /// True unless closed.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// Dialog title.
    #[must_use]
    pub const fn title(&self) -> Option<&'static str> {
        match self {
            Self::Closed => None,
            Self::Creating(_) => Some("Create user"),
            Self::Editing(_) => Some("Edit user"),
        }
    }

    /// Submit button label.
    #[must_use]
    pub const fn submit_label(&self) -> Option<&'static str> {
        match self {
            Self::Closed => None,
            Self::Creating(_) => Some("Create"),
            Self::Editing(_) => Some("Update"),
        }
    }

    /// Field set currently bound to the inputs.
    #[must_use]
    pub const fn fields(&self) -> Option<&UserDraft> {
        match self {
            Self::Closed => None,
            Self::Creating(draft) => Some(draft),
            Self::Editing(record) => Some(&record.fields),
        }
    }

    /// Write `value` into `field` of whichever buffer is open. Returns false
    /// when the modal is closed. The identifier of an edited record is never
    /// touched.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> bool {
        let fields = match self {
            Self::Closed => return false,
            Self::Creating(draft) => draft,
            Self::Editing(record) => &mut record.fields,
        };
        *field.slot(fields) = value.into();
        true
    }
}
