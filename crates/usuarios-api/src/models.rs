//! Wire models for the `/usuarios` endpoints.

use secrecy::{ExposeSecret, SecretString};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use usuarios_core::Error;

/// Backend-assigned user identifier (`idusuario`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for UserId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| Error::InvalidRequest(format!("invalid user id: {s}")))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Account status. The API encodes it as `1` (active) and anything else
/// (inactive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Status {
    /// Account can sign in.
    #[default]
    Active,
    /// Account is disabled.
    Inactive,
}

impl Status {
    /// Numeric wire value.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Active => 1,
            Self::Inactive => 0,
        }
    }

    /// Table label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl From<i64> for Status {
    fn from(code: i64) -> Self {
        if code == 1 {
            Self::Active
        } else {
            Self::Inactive
        }
    }
}

impl From<Status> for i64 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Editable fields of a user. Sent as-is when creating a user; the stored
/// credential strings are opaque and never computed here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserDraft {
    /// First name.
    #[serde(rename = "nombre", default, deserialize_with = "nullable_string")]
    pub first_name: String,
    /// Last name.
    #[serde(rename = "apellido", default, deserialize_with = "nullable_string")]
    pub last_name: String,
    /// Email address.
    #[serde(default, deserialize_with = "nullable_string")]
    pub email: String,
    /// Login name.
    #[serde(rename = "usuario", default, deserialize_with = "nullable_string")]
    pub username: String,
    /// Stored plain-hash representation.
    #[serde(rename = "contrasena_hash", default, deserialize_with = "nullable_string")]
    pub password_hash: String,
    /// Stored MD5 representation.
    #[serde(rename = "contrasena_md5", default, deserialize_with = "nullable_string")]
    pub password_md5: String,
    /// Stored SHA-1 representation.
    #[serde(rename = "contrasena_sha1", default, deserialize_with = "nullable_string")]
    pub password_sha1: String,
    /// Account status. A missing key means active; an explicit `null` is not
    /// `1` and so reads as inactive.
    #[serde(default, deserialize_with = "nullable_status")]
    pub status: Status,
}

/// A user as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Backend-assigned identifier.
    #[serde(rename = "idusuario")]
    pub id: UserId,
    /// Everything else.
    #[serde(flatten)]
    pub fields: UserDraft,
}

impl UserRecord {
    /// Pairs an identifier with its fields.
    #[must_use]
    pub const fn new(id: UserId, fields: UserDraft) -> Self {
        Self { id, fields }
    }
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_status<'de, D>(deserializer: D) -> Result<Status, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.map_or(Status::Inactive, Status::from))
}

/// Credential representation a login is verified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// Plain hash.
    Hash,
    /// MD5 digest.
    Md5,
    /// SHA-1 digest.
    Sha1,
    /// RSA.
    Rsa,
}

impl Scheme {
    /// Returns every scheme.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Hash, Self::Md5, Self::Sha1, Self::Rsa]
    }

    /// Lowercase scheme name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hash => "hash",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Rsa => "rsa",
        }
    }

    /// Verification endpoint, relative to the API base URL.
    #[must_use]
    pub fn verification_path(self) -> String {
        format!("usuarios/verificar{}", self.name())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hash" => Ok(Self::Hash),
            "md5" => Ok(Self::Md5),
            "sha1" | "sha-1" => Ok(Self::Sha1),
            "rsa" => Ok(Self::Rsa),
            _ => Err(Error::InvalidRequest(format!("Unknown scheme: {s}"))),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Login body for the verification endpoints.
///
/// The password stays wrapped until serialization.
#[derive(Debug)]
pub struct Credentials {
    username: String,
    password: SecretString,
}

impl Credentials {
    /// Creates credentials from a login name and password.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Login name.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Serialize for Credentials {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut body = serializer.serialize_struct("Credentials", 2)?;
        body.serialize_field("usuario", &self.username)?;
        body.serialize_field("contrasena", self.password.expose_secret())?;
        body.end()
    }
}

/// Verification endpoint response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    /// `1` when the credentials matched.
    pub resultado: i64,
}

impl Verification {
    /// True when the backend accepted the credentials.
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        self.resultado == 1
    }
}
