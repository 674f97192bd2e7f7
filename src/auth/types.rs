//! Credential types
//!
//! `CredentialsConfig` is what the configuration file says; `Credentials` is
//! the resolved key pair used to sign requests.

use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Environment variable holding the access key id
pub const ENV_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
/// Environment variable holding the secret access key
pub const ENV_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
/// Environment variable holding the session token
pub const ENV_SESSION_TOKEN: &str = "AWS_SESSION_TOKEN";

/// Resolved AWS credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create long-term credentials
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attach a session token (temporary credentials)
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into()).none_if_empty();
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Where credentials come from
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialsConfig {
    /// Read the standard AWS environment variables
    #[default]
    Environment,

    /// Keys written in the configuration file
    Static {
        access_key_id: String,
        secret_access_key: String,
        #[serde(default)]
        session_token: Option<String>,
    },
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => f.write_str("Environment"),
            Self::Static { access_key_id, .. } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .finish_non_exhaustive(),
        }
    }
}

impl CredentialsConfig {
    /// Resolve credentials from the process environment
    pub fn resolve(&self) -> Result<Credentials> {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve credentials, reading variables through `lookup`
    pub fn resolve_with<F>(&self, lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (access_key_id, secret_access_key, session_token) = match self {
            Self::Environment => {
                let get = |name: &str| lookup(name).none_if_empty();
                let access_key_id = get(ENV_ACCESS_KEY_ID).ok_or_else(|| {
                    Error::credentials(format!("{ENV_ACCESS_KEY_ID} is not set"))
                })?;
                let secret_access_key = get(ENV_SECRET_ACCESS_KEY).ok_or_else(|| {
                    Error::credentials(format!("{ENV_SECRET_ACCESS_KEY} is not set"))
                })?;
                (access_key_id, secret_access_key, get(ENV_SESSION_TOKEN))
            }
            Self::Static {
                access_key_id,
                secret_access_key,
                session_token,
            } => {
                if access_key_id.is_empty() || secret_access_key.is_empty() {
                    return Err(Error::credentials(
                        "static credentials need both access_key_id and secret_access_key",
                    ));
                }
                (
                    access_key_id.clone(),
                    secret_access_key.clone(),
                    session_token.clone().none_if_empty(),
                )
            }
        };

        Ok(Credentials {
            access_key_id,
            secret_access_key,
            session_token,
        })
    }
}
