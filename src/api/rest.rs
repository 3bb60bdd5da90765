//! JSON client for a real analysis/minting backend.
//!
//! Mirrors the endpoint set the client application depends on: `/upload`,
//! `/analyze`, `/mint`, `/nfts`, `/feedback`, and `/` as the health probe.
//! Timeout policy lives on the HTTP client so every call shares it.

use crate::{
    Error,
    api::{AnalysisReport, ArtifactApi, IssuedArtifact, MintReceipt, MintRequest, UploadReceipt},
};
use async_trait::async_trait;
use base64ct::{Base64UrlUnpadded, Encoding};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Applied to every request, connection establishment included.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct UploadRequest<'a> {
    filename: &'a str,
    title: &'a str,
    contents: &'a str,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    file_id: &'a str,
}

#[derive(Serialize)]
struct FeedbackRequest<'a> {
    artifact_id: &'a str,
    text: &'a str,
}

/// HTTP [`ArtifactApi`] implementation.
pub struct RestApi {
    client: reqwest::Client,
    base_url: Url,
}

impl RestApi {
    /// # Errors
    /// Returns `Error::Api` when the URL does not parse or the HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)
            .map_err(|err| Error::Api(format!("invalid api url {base_url}: {err}")))?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| Error::Api(format!("failed to build http client: {err}")))?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path)
            .map_err(|err| Error::Api(format!("invalid endpoint {path}: {err}")))
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.endpoint(path)?;
        debug!(%url, "artifact api call");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!("{path}: http status {status}")));
        }
        response
            .json()
            .await
            .map_err(|err| Error::Api(format!("{path}: invalid response: {err}")))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("{REQUEST_TIMEOUT:?} waiting for artifact api"))
    } else {
        Error::Api(err.to_string())
    }
}

#[async_trait]
impl ArtifactApi for RestApi {
    async fn upload(
        &self,
        filename: &str,
        title: &str,
        bytes: &[u8],
    ) -> Result<UploadReceipt, Error> {
        let contents = Base64UrlUnpadded::encode_string(bytes);
        self.post_json(
            "upload",
            &UploadRequest {
                filename,
                title,
                contents: &contents,
            },
        )
        .await
    }

    async fn analyze(&self, file_id: &str) -> Result<AnalysisReport, Error> {
        self.post_json("analyze", &AnalyzeRequest { file_id }).await
    }

    async fn mint(&self, request: &MintRequest) -> Result<MintReceipt, Error> {
        self.post_json("mint", request).await
    }

    async fn list_artifacts(&self) -> Result<Vec<IssuedArtifact>, Error> {
        let url = self.endpoint("nfts")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!("nfts: http status {status}")));
        }
        response
            .json()
            .await
            .map_err(|err| Error::Api(format!("nfts: invalid response: {err}")))
    }

    async fn submit_feedback(&self, artifact_id: &str, text: &str) -> Result<(), Error> {
        let url = self.endpoint("feedback")?;
        let response = self
            .client
            .post(url)
            .json(&FeedbackRequest { artifact_id, text })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!("feedback: http status {status}")));
        }
        Ok(())
    }

    async fn health(&self) -> bool {
        let Ok(url) = self.endpoint("") else {
            return false;
        };
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RestApi;

    #[test]
    fn rejects_unparseable_base_url() {
        assert!(RestApi::new("::").is_err());
    }

    #[test]
    fn joins_endpoint_paths() {
        let api = RestApi::new("http://localhost:8000/").expect("api");
        let url = api.endpoint("analyze").expect("endpoint");
        assert_eq!(url.as_str(), "http://localhost:8000/analyze");
    }
}
