//! 0G Storage Client Provider
//!
//! Drives the `0g-storage-client` executable, which owns tree
//! construction, segment transport and transaction signing.
//!
//! ## Requirements
//!
//! - `0g-storage-client` must be installed (or `ZG_CLIENT_BIN` must point at it)
//!
//! The client logs through logrus, so the root and the transaction hash are
//! read back from fields such as `root=0x…` and `hash=0x…` in its output.

use std::path::Path;
use std::process::Stdio;
use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;

use crate::config::{NetworkConfig, PrivateKey};

use super::file::StorageFile;
use super::provider::StorageProvider;
use super::types::{ProviderError, RootHash, UploadReceipt};

/// Configuration for the client-binary provider
#[derive(Debug, Clone)]
pub struct ClientBinaryConfig {
    /// Path to the executable (default: "0g-storage-client" - uses PATH)
    pub binary_path: String,
    pub network: NetworkConfig,
    pub private_key: PrivateKey,
}

/// Provider backed by the `0g-storage-client` executable
pub struct ClientBinaryProvider {
    config: ClientBinaryConfig,
}

/// Root and transaction hashes found in client output
#[derive(Debug, Default, PartialEq, Eq)]
struct ClientOutput {
    root_hash: Option<String>,
    tx_hash: Option<String>,
}

fn root_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\broot(?:_?hash)?"?\s*[=:]\s*"?(0x[0-9a-f]{64})\b"#)
            .expect("root pattern is valid")
    })
}

fn tx_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)\b(?:tx_?hash|txhash|tx|hash)"?\s*[=:]\s*"?(0x[0-9a-f]{64})\b"#)
            .expect("tx pattern is valid")
    })
}

impl ClientOutput {
    /// Scan combined stdout/stderr; the last match of each field wins
    fn parse(text: &str) -> Self {
        let root_hash = root_pattern()
            .captures_iter(text)
            .last()
            .map(|c| c[1].to_string());

        let tx_hash = tx_pattern()
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .filter(|h| Some(h) != root_hash.as_ref())
            .last();

        Self { root_hash, tx_hash }
    }
}

/// Most useful line of a failed run: the last error-level line, else the last line
fn failure_summary(text: &str) -> String {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    lines
        .iter()
        .rev()
        .find(|l| {
            let lower = l.to_ascii_lowercase();
            lower.contains("level=error") || lower.contains("level=fatal") || lower.starts_with("error")
        })
        .or_else(|| lines.last())
        .map(|l| l.to_string())
        .unwrap_or_else(|| "client exited without output".to_string())
}

fn combined_output(output: &std::process::Output) -> String {
    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    if !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    text
}

/// Map a finished upload run onto a receipt or a classified failure
fn classify_upload(success: bool, text: &str) -> Result<UploadReceipt, ProviderError> {
    let parsed = ClientOutput::parse(text);

    if !success {
        let summary = failure_summary(text);
        // A root in the log means the tree was built before the failure
        return Err(match parsed.root_hash {
            Some(_) => ProviderError::Submission(summary),
            None => ProviderError::MerkleTree(summary),
        });
    }

    let root_hash = parsed.root_hash.ok_or_else(|| {
        ProviderError::MerkleTree("client output did not include a root hash".to_string())
    })?;
    let tx_hash = parsed.tx_hash.ok_or_else(|| {
        ProviderError::Submission("client output did not include a transaction hash".to_string())
    })?;

    Ok(UploadReceipt { root_hash, tx_hash })
}

impl ClientBinaryProvider {
    pub fn new(config: ClientBinaryConfig) -> Self {
        Self { config }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.config.binary_path);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    async fn run(&self, mut cmd: Command) -> Result<std::process::Output, ProviderError> {
        cmd.output().await.map_err(|e| {
            ProviderError::Unavailable(format!(
                "failed to run {}: {}",
                self.config.binary_path, e
            ))
        })
    }
}

#[async_trait]
impl StorageProvider for ClientBinaryProvider {
    fn name(&self) -> &'static str {
        "0g-storage-client"
    }

    async fn is_available(&self) -> bool {
        let result = Command::new(&self.config.binary_path)
            .arg("--help")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        matches!(result, Ok(status) if status.success())
    }

    async fn upload(&self, file: &StorageFile) -> Result<UploadReceipt, ProviderError> {
        let network = &self.config.network;

        let mut cmd = self.command();
        cmd.arg("upload")
            .arg("--url")
            .arg(&network.rpc_url)
            .arg("--contract")
            .arg(&network.flow_contract)
            .arg("--indexer")
            .arg(&network.indexer_rpc)
            .arg("--key")
            .arg(self.config.private_key.expose())
            .arg("--file")
            .arg(file.path());

        tracing::debug!(
            path = %file.path().display(),
            size = file.size(),
            indexer = %network.indexer_rpc,
            "Running storage client upload"
        );

        let output = self.run(cmd).await?;
        let text = combined_output(&output);
        tracing::trace!(output = %text, "Storage client upload finished");

        classify_upload(output.status.success(), &text)
    }

    async fn download(
        &self,
        root: &RootHash,
        dest: &Path,
        verify_proof: bool,
    ) -> Result<(), ProviderError> {
        let mut cmd = self.command();
        cmd.arg("download")
            .arg("--indexer")
            .arg(&self.config.network.indexer_rpc)
            .arg("--root")
            .arg(root.as_str())
            .arg("--file")
            .arg(dest);

        if verify_proof {
            cmd.arg("--proof");
        }

        tracing::debug!(root_hash = %root, dest = %dest.display(), "Running storage client download");

        let output = self.run(cmd).await?;
        let text = combined_output(&output);

        if !output.status.success() {
            return Err(ProviderError::Retrieval(failure_summary(&text)));
        }

        if !tokio::fs::try_exists(dest).await.unwrap_or(false) {
            return Err(ProviderError::Retrieval(
                "client reported success but wrote no file".to_string(),
            ));
        }

        Ok(())
    }
}
