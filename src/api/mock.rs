//! Fabricated analysis/minting pipeline.
//!
//! Stands in for the whole backend during demos: fixed delays simulate the
//! upload/analysis/minting latency and every value is synthesized. Scores
//! stay below 0.30 so the demo always mints. No output of this module means
//! anything.

use crate::{
    Error,
    api::{AnalysisReport, ArtifactApi, IssuedArtifact, MintReceipt, MintRequest, UploadReceipt},
};
use async_trait::async_trait;
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use std::{
    collections::HashMap,
    sync::Mutex,
    time::Duration,
};
use tokio::time::sleep;
use tracing::debug;
use ulid::Ulid;

/// Simulated latency per pipeline stage, scaled by the configured factor.
const UPLOAD_DELAY: Duration = Duration::from_millis(1000);
const ANALYZE_DELAY: Duration = Duration::from_millis(2000);
const MINT_DELAY: Duration = Duration::from_millis(3000);
const LIST_DELAY: Duration = Duration::from_millis(1500);

/// In-process [`ArtifactApi`] returning fabricated data.
pub struct MockApi {
    delay_scale: f64,
    uploads: Mutex<HashMap<String, UploadReceipt>>,
    minted: Mutex<Vec<IssuedArtifact>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            delay_scale: 1.0,
            uploads: Mutex::new(HashMap::new()),
            minted: Mutex::new(Vec::new()),
        }
    }

    /// Scale the simulated delays; `0.0` disables them for tests.
    #[must_use]
    pub fn with_delay_scale(mut self, scale: f64) -> Self {
        self.delay_scale = scale;
        self
    }

    async fn simulate(&self, base: Duration) {
        let scaled = base.mul_f64(self.delay_scale);
        if !scaled.is_zero() {
            sleep(scaled).await;
        }
    }
}

fn random_hex_address() -> String {
    let mut bytes = [0u8; 20];
    thread_rng().fill(&mut bytes);
    let hex: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
    format!("0x{hex}")
}

fn random_content_address() -> String {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(28)
        .map(|byte| (byte as char).to_ascii_lowercase())
        .collect();
    format!("Qm{suffix}")
}

#[async_trait]
impl ArtifactApi for MockApi {
    async fn upload(
        &self,
        filename: &str,
        title: &str,
        _bytes: &[u8],
    ) -> Result<UploadReceipt, Error> {
        self.simulate(UPLOAD_DELAY).await;
        let receipt = UploadReceipt {
            file_id: Ulid::new().to_string(),
            filename: filename.to_string(),
            title: title.to_string(),
        };
        debug!(file_id = %receipt.file_id, "fabricated upload receipt");
        self.uploads
            .lock()
            .map_err(|_| Error::Api("mock state poisoned".to_string()))?
            .insert(receipt.file_id.clone(), receipt.clone());
        Ok(receipt)
    }

    async fn analyze(&self, file_id: &str) -> Result<AnalysisReport, Error> {
        self.simulate(ANALYZE_DELAY).await;
        let known = self
            .uploads
            .lock()
            .map_err(|_| Error::Api("mock state poisoned".to_string()))?
            .contains_key(file_id);
        if !known {
            return Err(Error::Api(format!("unknown file id: {file_id}")));
        }
        let score = f64::from(thread_rng().gen_range(0..30)) / 100.0;
        Ok(AnalysisReport {
            plagiarism_score: score,
            summary: format!(
                "Document is {:.0}% original with no significant overlapping sources.",
                (1.0 - score) * 100.0
            ),
            content_address: random_content_address(),
        })
    }

    async fn mint(&self, request: &MintRequest) -> Result<MintReceipt, Error> {
        self.simulate(MINT_DELAY).await;
        let receipt = MintReceipt {
            nft_id: Ulid::new().to_string(),
            tx_hash: random_hex_address(),
        };
        self.minted
            .lock()
            .map_err(|_| Error::Api("mock state poisoned".to_string()))?
            .push(IssuedArtifact {
                nft_id: receipt.nft_id.clone(),
                title: request.title.clone(),
                author: request.author.clone(),
                content_address: request.content_address.clone(),
                tx_hash: receipt.tx_hash.clone(),
                plagiarism_score: 0.0,
            });
        Ok(receipt)
    }

    async fn list_artifacts(&self) -> Result<Vec<IssuedArtifact>, Error> {
        self.simulate(LIST_DELAY).await;
        Ok(self
            .minted
            .lock()
            .map_err(|_| Error::Api("mock state poisoned".to_string()))?
            .clone())
    }

    async fn submit_feedback(&self, artifact_id: &str, _text: &str) -> Result<(), Error> {
        self.simulate(UPLOAD_DELAY).await;
        debug!(artifact_id, "fabricated feedback acknowledgement");
        Ok(())
    }

    async fn health(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::MockApi;
    use crate::api::{ArtifactApi, MintRequest};
    use anyhow::Result;

    fn api() -> MockApi {
        MockApi::new().with_delay_scale(0.0)
    }

    #[tokio::test]
    async fn upload_then_analyze_produces_bounded_score() -> Result<()> {
        let api = api();
        let receipt = api.upload("essay.pdf", "My Essay", b"contents").await?;
        let report = api.analyze(&receipt.file_id).await?;

        assert!((0.0..0.30).contains(&report.plagiarism_score));
        assert!(report.content_address.starts_with("Qm"));
        assert_eq!(report.content_address.len(), 30);
        Ok(())
    }

    #[tokio::test]
    async fn analyze_unknown_file_fails() {
        let api = api();
        assert!(api.analyze("missing").await.is_err());
    }

    #[tokio::test]
    async fn minted_artifacts_appear_in_listing() -> Result<()> {
        let api = api();
        let receipt = api
            .mint(&MintRequest {
                file_id: "f1".to_string(),
                title: "My Essay".to_string(),
                author: "Ada".to_string(),
                content_address: "QmAbc".to_string(),
            })
            .await?;

        assert!(receipt.tx_hash.starts_with("0x"));
        assert_eq!(receipt.tx_hash.len(), 42);

        let listed = api.list_artifacts().await?;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].nft_id, receipt.nft_id);
        Ok(())
    }
}
