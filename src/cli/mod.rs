//! Command-line front-end
//!
//! ```text
//! zg-storage -k <private_key> upload ./file.txt
//! zg-storage -k <private_key> download 0x… -o ./file.txt
//! zg-storage -k <private_key> config
//! ```

pub mod commands;
pub mod output;

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::{NetworkConfig, PrivateKey, DEFAULT_CLIENT_BIN};
use crate::storage::{ClientBinaryConfig, ClientBinaryProvider, TransferService};

#[derive(Parser, Debug)]
#[command(name = "zg-storage")]
#[command(about = "Upload and download files on 0G Storage")]
#[command(version)]
pub struct Cli {
    /// Private key used to sign storage transactions
    #[arg(short = 'k', long = "key", value_name = "PRIVATE_KEY")]
    pub key: String,

    /// EVM RPC endpoint (default: $RPC_URL or the testnet endpoint)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Indexer RPC endpoint (default: $INDEXER_RPC or the testnet indexer)
    #[arg(long)]
    pub indexer_rpc: Option<String>,

    /// Flow contract address (default: $FLOW_CONTRACT or the testnet contract)
    #[arg(long)]
    pub flow_contract: Option<String>,

    /// Path to the 0g-storage-client executable (default: $ZG_CLIENT_BIN)
    #[arg(long)]
    pub client_bin: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload a file
    Upload {
        /// File to upload
        filepath: PathBuf,
    },
    /// Download a file by root hash
    Download {
        /// Root hash of the file
        roothash: String,
        /// Output file (default: downloads/<roothash>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the network configuration in effect
    Config,
}

impl Cli {
    /// Network endpoints: flags first, then environment, then defaults
    pub fn network(&self) -> NetworkConfig {
        self.network_with(NetworkConfig::from_env())
    }

    fn network_with(&self, base: NetworkConfig) -> NetworkConfig {
        NetworkConfig {
            rpc_url: self.rpc_url.clone().unwrap_or(base.rpc_url),
            flow_contract: self.flow_contract.clone().unwrap_or(base.flow_contract),
            indexer_rpc: self.indexer_rpc.clone().unwrap_or(base.indexer_rpc),
        }
    }

    fn client_bin(&self) -> String {
        self.client_bin
            .clone()
            .or_else(|| env::var("ZG_CLIENT_BIN").ok().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_CLIENT_BIN.to_string())
    }
}

/// Run a parsed command line
pub async fn run(cli: Cli) -> Result<()> {
    let private_key = PrivateKey::parse(&cli.key).context("Invalid --key")?;
    let network = cli.network();

    match &cli.command {
        Command::Config => {
            commands::show_config(&network);
            Ok(())
        }
        Command::Upload { filepath } => {
            let service = client_service(&cli, network, private_key);
            commands::upload(&service, filepath).await.map(|_| ())
        }
        Command::Download { roothash, output } => {
            let service = client_service(&cli, network, private_key);
            commands::download(&service, roothash, output.clone()).await.map(|_| ())
        }
    }
}

fn client_service(cli: &Cli, network: NetworkConfig, private_key: PrivateKey) -> TransferService {
    let provider = ClientBinaryProvider::new(ClientBinaryConfig {
        binary_path: cli.client_bin(),
        network,
        private_key,
    });
    TransferService::new(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn test_parse_upload() {
        let cli = Cli::try_parse_from(["zg-storage", "-k", KEY, "upload", "./file.txt"]).unwrap();
        assert_eq!(cli.key, KEY);
        match cli.command {
            Command::Upload { filepath } => assert_eq!(filepath, PathBuf::from("./file.txt")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_download_with_output() {
        let cli = Cli::try_parse_from([
            "zg-storage", "--key", KEY, "download", "0xabc", "-o", "out.bin",
        ])
        .unwrap();
        match cli.command {
            Command::Download { roothash, output } => {
                assert_eq!(roothash, "0xabc");
                assert_eq!(output, Some(PathBuf::from("out.bin")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_key_is_required() {
        assert!(Cli::try_parse_from(["zg-storage", "config"]).is_err());
        assert!(Cli::try_parse_from(["zg-storage", "-k", KEY, "config"]).is_ok());
    }

    #[test]
    fn test_flags_override_network() {
        let cli = Cli::try_parse_from([
            "zg-storage",
            "-k",
            KEY,
            "--indexer-rpc",
            "http://127.0.0.1:5678",
            "config",
        ])
        .unwrap();

        let network = cli.network_with(NetworkConfig::default());
        assert_eq!(network.indexer_rpc, "http://127.0.0.1:5678");
        assert_eq!(network.rpc_url, NetworkConfig::default().rpc_url);
        assert_eq!(network.flow_contract, NetworkConfig::default().flow_contract);
    }

    #[tokio::test]
    async fn test_invalid_key_fails_before_any_command() {
        let cli = Cli::try_parse_from(["zg-storage", "-k", "nope", "config"]).unwrap();
        let err = run(cli).await.unwrap_err();
        assert!(err.to_string().contains("Invalid --key"));
    }
}
