//! HTTP identity provider speaking a small JSON surface.
//!
//! Request construction, timeout policy, and error mapping live here so the
//! service and tests never touch transport details. All failures map to
//! [`Error::Provider`]; the service wraps calls in its own deadline and owns
//! the `Timeout` classification.

use crate::{
    Error,
    auth::provider::{IdentityProvider, UserRecord},
};
use async_trait::async_trait;
use base64ct::{Base64UrlUnpadded, Encoding};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Transport-level connect timeout; the per-call deadline is enforced by the
/// auth service on top of this.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct CredentialRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct UidResponse {
    uid: String,
}

#[derive(Serialize)]
struct FileUploadRequest<'a> {
    contents: &'a str,
}

#[derive(Deserialize)]
struct FileUploadResponse {
    url: String,
}

/// JSON-over-HTTP [`IdentityProvider`].
pub struct RestProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl RestProvider {
    /// Build a provider client against `base_url`.
    ///
    /// # Errors
    /// Returns `Error::Provider` when the URL does not parse or the HTTP
    /// client cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)
            .map_err(|err| Error::Provider(format!("invalid provider url {base_url}: {err}")))?;
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|err| Error::Provider(format!("failed to build http client: {err}")))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|err| Error::Provider(format!("invalid endpoint {path}: {err}")))
    }

    async fn post_credentials(&self, path: &str, email: &str, password: &SecretString) -> Result<String, Error> {
        let url = self.endpoint(path)?;
        debug!(%url, "provider credential call");
        let response = self
            .client
            .post(url)
            .json(&CredentialRequest {
                email,
                password: password.expose_secret(),
            })
            .send()
            .await
            .map_err(|err| Error::Provider(format!("{path}: {err}")))?;
        let response = check_status(path, response)?;
        let body: UidResponse = response
            .json()
            .await
            .map_err(|err| Error::Provider(format!("{path}: invalid response: {err}")))?;
        Ok(body.uid)
    }
}

fn check_status(path: &str, response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Provider(format!("{path}: http status {status}")))
    }
}

#[async_trait]
impl IdentityProvider for RestProvider {
    async fn create_user(&self, email: &str, password: &SecretString) -> Result<String, Error> {
        self.post_credentials("v1/accounts", email, password).await
    }

    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<String, Error> {
        self.post_credentials("v1/sessions", email, password).await
    }

    async fn get_user_record(&self, uid: &str) -> Result<Option<UserRecord>, Error> {
        let url = self.endpoint(&format!("v1/users/{uid}"))?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| Error::Provider(format!("get_user_record: {err}")))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status("get_user_record", response)?;
        let record: UserRecord = response
            .json()
            .await
            .map_err(|err| Error::Provider(format!("get_user_record: invalid response: {err}")))?;
        Ok(Some(record))
    }

    async fn set_user_record(&self, uid: &str, record: &UserRecord) -> Result<(), Error> {
        let url = self.endpoint(&format!("v1/users/{uid}"))?;
        let response = self
            .client
            .put(url)
            .json(record)
            .send()
            .await
            .map_err(|err| Error::Provider(format!("set_user_record: {err}")))?;
        check_status("set_user_record", response)?;
        Ok(())
    }

    async fn upload_file(&self, path: &str, bytes: &[u8]) -> Result<String, Error> {
        let url = self.endpoint(&format!("v1/files/{path}"))?;
        let contents = Base64UrlUnpadded::encode_string(bytes);
        let response = self
            .client
            .post(url)
            .json(&FileUploadRequest {
                contents: &contents,
            })
            .send()
            .await
            .map_err(|err| Error::Provider(format!("upload_file: {err}")))?;
        let response = check_status("upload_file", response)?;
        let body: FileUploadResponse = response
            .json()
            .await
            .map_err(|err| Error::Provider(format!("upload_file: invalid response: {err}")))?;
        Ok(body.url)
    }
}
