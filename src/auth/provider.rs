//! Identity-provider boundary.
//!
//! Any backend implementing these five operations is substitutable: account
//! creation, credential sign-in, user-record read/write, and file upload
//! for teacher verification documents. The auth service layers timeout and
//! demo-mode policy on top; implementations only translate transport
//! failures into [`Error::Provider`].

use crate::{Error, session::Role};
use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// User document held by the identity provider's record store.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_doc_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<String>,
    pub created_at: String,
}

/// External system of record for credentials and profile data.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a credential entry, returning the new account's uid.
    async fn create_user(&self, email: &str, password: &SecretString) -> Result<String, Error>;

    /// Verify credentials, returning the account's uid.
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<String, Error>;

    /// Fetch the user record for `uid`, absent when none exists.
    async fn get_user_record(&self, uid: &str) -> Result<Option<UserRecord>, Error>;

    /// Create or replace the user record for `uid`.
    async fn set_user_record(&self, uid: &str, record: &UserRecord) -> Result<(), Error>;

    /// Store an uploaded file under `path`, returning its download URL.
    async fn upload_file(&self, path: &str, bytes: &[u8]) -> Result<String, Error>;
}
