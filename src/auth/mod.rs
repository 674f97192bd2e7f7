//! Authentication module
//!
//! Every RDS request is signed with AWS Signature Version 4. Credentials are
//! resolved once at startup, either from the standard environment variables
//! or from the configuration file, and handed to a [`SigV4Signer`].

mod signer;
mod types;

pub use signer::{sha256_hex, uri_encode, SigV4Signer};
pub use types::{
    Credentials, CredentialsConfig, ENV_ACCESS_KEY_ID, ENV_SECRET_ACCESS_KEY, ENV_SESSION_TOKEN,
};
