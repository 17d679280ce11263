//! Command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;

use super::output::{print_field, print_info, print_success, spinner};
use crate::config::NetworkConfig;
use crate::storage::{RootHash, TransferService, UploadResult};

/// Directory used when `download` is given no `-o`
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

pub async fn upload(service: &TransferService, filepath: &Path) -> Result<UploadResult> {
    print_info(format!("Uploading file: {}", filepath.display()));

    let pb = spinner("Building Merkle tree and submitting to the network...");
    let result = service.upload(filepath).await;
    pb.finish_and_clear();

    let result = result.with_context(|| format!("Failed to upload {}", filepath.display()))?;

    print_success("File uploaded successfully");
    print_field("Root Hash", &result.root_hash);
    print_field("Transaction Hash", &result.tx_hash);

    Ok(result)
}

pub async fn download(
    service: &TransferService,
    roothash: &str,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let root: RootHash = roothash.parse()?;
    let output = output.unwrap_or_else(|| default_output(&root));

    print_info(format!("Downloading file with root hash: {}", root));

    let pb = spinner("Retrieving file from storage nodes...");
    let result = service.download(&root, &output).await;
    pb.finish_and_clear();

    result.with_context(|| format!("Failed to download {}", root))?;

    print_success(format!("File downloaded successfully to: {}", output.display()));
    Ok(output)
}

pub fn default_output(root: &RootHash) -> PathBuf {
    Path::new(DEFAULT_DOWNLOAD_DIR).join(root.as_str())
}

pub fn show_config(network: &NetworkConfig) {
    println!("{}", "Current configuration:".bold());
    for (label, value) in config_entries(network) {
        print_field(label, value);
    }
}

/// Labelled endpoint values printed by `config`
pub fn config_entries(network: &NetworkConfig) -> [(&'static str, &str); 3] {
    [
        ("RPC URL", network.rpc_url.as_str()),
        ("Flow Contract", network.flow_contract.as_str()),
        ("Indexer RPC", network.indexer_rpc.as_str()),
    ]
}
