//! Storage Providers
//!
//! Defines the provider trait and the in-process implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use super::file::StorageFile;
use super::types::{ProviderError, RootHash, UploadReceipt};

/// Storage provider trait
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Check if the provider can be used
    async fn is_available(&self) -> bool;

    /// Build the file's tree and submit it to the network
    async fn upload(&self, file: &StorageFile) -> Result<UploadReceipt, ProviderError>;

    /// Fetch the file identified by `root` into `dest`
    async fn download(
        &self,
        root: &RootHash,
        dest: &Path,
        verify_proof: bool,
    ) -> Result<(), ProviderError>;
}

/// In-process provider
///
/// Root hashes are SHA-256 digests of the content; nothing leaves the
/// process. Useful for local development and tests.
#[derive(Default)]
pub struct MemoryProvider {
    files: RwLock<HashMap<String, Vec<u8>>>,
    sequence: AtomicU64,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored files
    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

fn prefixed_digest(parts: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    format!("0x{}", hex::encode(hasher.finalize()))
}

#[async_trait]
impl StorageProvider for MemoryProvider {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn upload(&self, file: &StorageFile) -> Result<UploadReceipt, ProviderError> {
        let data = file
            .read_all()
            .await
            .map_err(|e| ProviderError::MerkleTree(format!("failed to read file: {}", e)))?;

        if data.is_empty() {
            return Err(ProviderError::MerkleTree(
                "cannot build a tree for an empty file".to_string(),
            ));
        }

        let root_hash = prefixed_digest(&[data.as_slice()]);
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let tx_hash = prefixed_digest(&[root_hash.as_bytes(), &sequence.to_be_bytes()[..]]);

        self.files.write().await.insert(root_hash.clone(), data);

        Ok(UploadReceipt { root_hash, tx_hash })
    }

    async fn download(
        &self,
        root: &RootHash,
        dest: &Path,
        _verify_proof: bool,
    ) -> Result<(), ProviderError> {
        let data = self
            .files
            .read()
            .await
            .get(root.as_str())
            .cloned()
            .ok_or_else(|| ProviderError::Retrieval(format!("file not found: {}", root)))?;

        tokio::fs::write(dest, data)
            .await
            .map_err(|e| ProviderError::Retrieval(format!("failed to write {}: {}", dest.display(), e)))
    }
}

/// Provider that fails every call, for exercising error paths
#[cfg(test)]
pub struct FailingProvider {
    pub error: ProviderError,
}

#[cfg(test)]
#[async_trait]
impl StorageProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn is_available(&self) -> bool {
        false
    }

    async fn upload(&self, _file: &StorageFile) -> Result<UploadReceipt, ProviderError> {
        Err(self.error.clone())
    }

    async fn download(
        &self,
        _root: &RootHash,
        dest: &Path,
        _verify_proof: bool,
    ) -> Result<(), ProviderError> {
        // Leave a partial file behind, as a real client may
        let _ = tokio::fs::write(dest, b"partial").await;
        Err(self.error.clone())
    }
}
