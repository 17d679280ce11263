//! Transfer Service
//!
//! Upload and download orchestration shared by the HTTP and CLI front-ends.

use std::path::Path;
use std::sync::Arc;

use super::file::StorageFile;
use super::provider::StorageProvider;
use super::types::{ProviderError, RootHash, TransferError, UploadResult};

/// Orchestrates transfers through a storage provider
#[derive(Clone)]
pub struct TransferService {
    provider: Arc<dyn StorageProvider>,
    verify_proof: bool,
}

impl TransferService {
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self {
            provider,
            verify_proof: true,
        }
    }

    /// Whether downloads ask the provider for proof verification
    pub fn with_verify_proof(mut self, verify_proof: bool) -> Self {
        self.verify_proof = verify_proof;
        self
    }

    pub fn provider(&self) -> &Arc<dyn StorageProvider> {
        &self.provider
    }

    /// Upload a local file
    pub async fn upload(&self, path: &Path) -> Result<UploadResult, TransferError> {
        let file = StorageFile::open(path).await?;

        tracing::info!(
            path = %path.display(),
            size = file.size(),
            provider = self.provider.name(),
            "Uploading file"
        );

        let receipt = self.provider.upload(&file).await.map_err(|e| match e {
            ProviderError::MerkleTree(msg) => TransferError::Indexing(msg),
            ProviderError::Submission(msg) | ProviderError::Retrieval(msg) => {
                TransferError::Upload(msg)
            }
            ProviderError::Unavailable(msg) => TransferError::Unavailable(msg),
        });
        drop(file);

        let receipt = receipt.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Upload failed");
            e
        })?;

        tracing::info!(
            root_hash = %receipt.root_hash,
            tx_hash = %receipt.tx_hash,
            "File uploaded"
        );

        Ok(receipt.into())
    }

    /// Download a file into `dest`
    ///
    /// The provider writes into a staging directory beside `dest`; only a
    /// complete retrieval is moved into place.
    pub async fn download(&self, root: &RootHash, dest: &Path) -> Result<(), TransferError> {
        let parent = match dest.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => std::env::current_dir()?,
        };
        tokio::fs::create_dir_all(&parent).await?;

        let staging = tempfile::Builder::new()
            .prefix(".zg-download-")
            .tempdir_in(&parent)?;
        let staged = staging.path().join(root.as_str());

        tracing::info!(
            root_hash = %root,
            dest = %dest.display(),
            verify_proof = self.verify_proof,
            provider = self.provider.name(),
            "Downloading file"
        );

        self.provider
            .download(root, &staged, self.verify_proof)
            .await
            .map_err(|e| {
                tracing::error!(root_hash = %root, error = %e, "Download failed");
                match e {
                    ProviderError::Unavailable(msg) => TransferError::Unavailable(msg),
                    other => TransferError::Download(other.to_string()),
                }
            })?;

        if !tokio::fs::try_exists(&staged).await? {
            return Err(TransferError::Download(format!(
                "no file was retrieved for {}",
                root
            )));
        }

        tokio::fs::rename(&staged, dest).await?;

        tracing::info!(root_hash = %root, dest = %dest.display(), "File downloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::provider::{FailingProvider, MemoryProvider};

    fn failing(error: ProviderError) -> TransferService {
        TransferService::new(Arc::new(FailingProvider { error }))
    }

    async fn write_file(dir: &tempfile::TempDir, data: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join("file.txt");
        tokio::fs::write(&path, data).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_upload_download_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let service = TransferService::new(Arc::new(MemoryProvider::new()));
        let path = write_file(&dir, b"0123456789").await;

        let result = service.upload(&path).await.unwrap();
        assert!(!result.root_hash.is_empty());
        assert!(!result.tx_hash.is_empty());

        let root: RootHash = result.root_hash.parse().unwrap();
        let dest = dir.path().join("downloads").join(root.as_str());
        service.download(&root, &dest).await.unwrap();

        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"0123456789");
    }

    #[tokio::test]
    async fn test_download_replaces_existing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let service = TransferService::new(Arc::new(MemoryProvider::new()));
        let path = write_file(&dir, b"fresh").await;
        let result = service.upload(&path).await.unwrap();

        let dest = dir.path().join("existing");
        tokio::fs::write(&dest, b"stale").await.unwrap();

        let root: RootHash = result.root_hash.parse().unwrap();
        service.download(&root, &dest).await.unwrap();
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn test_tree_failure_maps_to_indexing_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, b"data").await;
        let service = failing(ProviderError::MerkleTree("segment too large".into()));

        let err = service.upload(&path).await.unwrap_err();
        assert!(matches!(err, TransferError::Indexing(_)));
        assert_eq!(err.to_string(), "Error generating Merkle tree: segment too large");
    }

    #[tokio::test]
    async fn test_submission_failure_maps_to_upload_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, b"data").await;
        let service = failing(ProviderError::Submission("insufficient funds".into()));

        let err = service.upload(&path).await.unwrap_err();
        assert_eq!(err.to_string(), "Upload error: insufficient funds");
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = TransferService::new(Arc::new(MemoryProvider::new()));

        let err = service.upload(&dir.path().join("missing")).await.unwrap_err();
        assert!(matches!(err, TransferError::Io(_)));
    }

    #[tokio::test]
    async fn test_failed_download_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = failing(ProviderError::Retrieval("file not found".into()));
        let root: RootHash = format!("0x{}", "cd".repeat(32)).parse().unwrap();
        let dest = dir.path().join("out");

        let err = service.download(&root, &dest).await.unwrap_err();
        assert_eq!(err.to_string(), "Download error: file not found");
        assert!(!dest.exists());

        // Staging directory is gone as well
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }
}
