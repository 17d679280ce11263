//! Storage Types
//!
//! Root hashes, upload results and the error taxonomy for transfers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Content-derived identifier of an uploaded file
///
/// Always `0x` followed by 64 hex digits, which also makes it safe to use
/// as a file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RootHash(String);

impl RootHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RootHash {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| TransferError::InvalidRootHash(s.to_string()))?;
        if digits.len() != 64 || hex::decode(digits).is_err() {
            return Err(TransferError::InvalidRootHash(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for RootHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What a provider reports after a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub root_hash: String,
    pub tx_hash: String,
}

/// Upload outcome returned to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub root_hash: String,
    #[serde(rename = "transactionHash")]
    pub tx_hash: String,
}

impl From<UploadReceipt> for UploadResult {
    fn from(receipt: UploadReceipt) -> Self {
        Self {
            root_hash: receipt.root_hash,
            tx_hash: receipt.tx_hash,
        }
    }
}

/// Failures reported by a storage provider
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    /// Building the file's Merkle tree failed
    #[error("{0}")]
    MerkleTree(String),

    /// Uploading segments or submitting the transaction failed
    #[error("{0}")]
    Submission(String),

    /// Fetching the file back failed
    #[error("{0}")]
    Retrieval(String),

    /// The provider could not be reached or executed
    #[error("{0}")]
    Unavailable(String),
}

/// Transfer errors surfaced to front-ends
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Invalid root hash: {0}")]
    InvalidRootHash(String),

    #[error("Error generating Merkle tree: {0}")]
    Indexing(String),

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Download error: {0}")]
    Download(String),

    #[error("Storage client unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransferError {
    /// Whether the caller supplied bad input
    pub fn is_client_error(&self) -> bool {
        matches!(self, TransferError::InvalidRootHash(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "0x5d1c5a1f3b9e4c0b8a2f7e6d4c3b2a1908f7e6d5c4b3a2918f7e6d5c4b3a2910";

    #[test]
    fn test_root_hash_parse() {
        let root: RootHash = ROOT.parse().unwrap();
        assert_eq!(root.as_str(), ROOT);
        assert_eq!(root.to_string(), ROOT);
    }

    #[test]
    fn test_root_hash_rejects_garbage() {
        for bad in [
            "",
            "garbage",
            &ROOT[2..],
            &ROOT[..40],
            "0x../../etc/passwd",
            "0xzz1c5a1f3b9e4c0b8a2f7e6d4c3b2a1908f7e6d5c4b3a2918f7e6d5c4b3a2910",
        ] {
            let err = bad.parse::<RootHash>().unwrap_err();
            assert!(err.is_client_error(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_upload_result_json_shape() {
        let result = UploadResult::from(UploadReceipt {
            root_hash: ROOT.to_string(),
            tx_hash: "0xfeed".to_string(),
        });
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["rootHash"], ROOT);
        assert_eq!(json["transactionHash"], "0xfeed");
    }

    #[test]
    fn test_error_messages_keep_underlying_text() {
        assert_eq!(
            TransferError::Indexing("bad segment".into()).to_string(),
            "Error generating Merkle tree: bad segment"
        );
        assert_eq!(
            TransferError::Upload("insufficient funds".into()).to_string(),
            "Upload error: insufficient funds"
        );
        assert_eq!(
            TransferError::Download("file not found".into()).to_string(),
            "Download error: file not found"
        );
    }
}
