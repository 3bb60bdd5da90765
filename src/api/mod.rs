//! Analysis and minting boundary.
//!
//! The auth core interoperates with an external backend that analyzes
//! uploaded documents for plagiarism and mints an NFT certificate for
//! originals. Only the call shapes are owned here; [`RestApi`] talks to a
//! real backend, [`MockApi`] fabricates the whole pipeline with fixed
//! delays and random values for demo use.

mod mock;
mod rest;

pub use mock::MockApi;
pub use rest::RestApi;

use crate::Error;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Receipt for an uploaded document awaiting analysis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub file_id: String,
    pub filename: String,
    pub title: String,
}

/// Result of the plagiarism analysis.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Fraction of matched content, `0.0..=1.0`.
    pub plagiarism_score: f64,
    pub summary: String,
    /// Content address of the stored document, e.g. an IPFS CID.
    pub content_address: String,
}

/// Metadata submitted for certificate minting.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MintRequest {
    pub file_id: String,
    pub title: String,
    pub author: String,
    pub content_address: String,
}

/// Receipt for a minted certificate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MintReceipt {
    pub nft_id: String,
    pub tx_hash: String,
}

/// A previously issued certificate, as listed by the backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IssuedArtifact {
    pub nft_id: String,
    pub title: String,
    pub author: String,
    pub content_address: String,
    pub tx_hash: String,
    pub plagiarism_score: f64,
}

/// Typed surface of the analysis/minting backend.
#[async_trait]
pub trait ArtifactApi: Send + Sync {
    async fn upload(&self, filename: &str, title: &str, bytes: &[u8])
    -> Result<UploadReceipt, Error>;
    async fn analyze(&self, file_id: &str) -> Result<AnalysisReport, Error>;
    async fn mint(&self, request: &MintRequest) -> Result<MintReceipt, Error>;
    async fn list_artifacts(&self) -> Result<Vec<IssuedArtifact>, Error>;
    async fn submit_feedback(&self, artifact_id: &str, text: &str) -> Result<(), Error>;
    /// Liveness probe; false on any transport failure.
    async fn health(&self) -> bool;
}
