//! Configuration management
//!
//! One options structure for every front-end. Values come from the process
//! environment (after `.env` is loaded), the CLI layers its flags on top.

use std::env;
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_RPC_URL: &str = "https://evmrpc-testnet.0g.ai/";
pub const DEFAULT_FLOW_CONTRACT: &str = "0x0460aA47b41a66694c0a73f667a1b795A5ED3556";
pub const DEFAULT_INDEXER_RPC: &str = "https://indexer-storage-testnet-standard.0g.ai";
pub const DEFAULT_CLIENT_BIN: &str = "0g-storage-client";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Private key not found in environment variables")]
    MissingPrivateKey,

    #[error("Invalid private key: expected 64 hex characters")]
    InvalidPrivateKey,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub network: NetworkConfig,
    pub client: ClientConfig,
    pub private_key: Option<PrivateKey>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub download_dir: PathBuf,
    pub max_upload_bytes: usize,
}

/// Network endpoints the storage SDK talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub rpc_url: String,
    pub flow_contract: String,
    pub indexer_rpc: String,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend: Backend,
    pub binary_path: String,
    pub verify_proof: bool,
}

/// Which storage provider implementation to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// The `0g-storage-client` executable
    Client,
    /// In-process store, for local development
    Memory,
}

/// Raw signer key, forwarded to the storage provider as-is
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if digits.len() != 64 || hex::decode(digits).is_err() {
            return Err(ConfigError::InvalidPrivateKey);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            flow_contract: DEFAULT_FLOW_CONTRACT.to_string(),
            indexer_rpc: DEFAULT_INDEXER_RPC.to_string(),
        }
    }
}

impl NetworkConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = NetworkConfig::default();

        NetworkConfig {
            rpc_url: var("RPC_URL").unwrap_or(defaults.rpc_url),
            flow_contract: var("FLOW_CONTRACT")
                .or_else(|| var("FLOW_CONTRACT_STANDARD"))
                .unwrap_or(defaults.flow_contract),
            indexer_rpc: var("INDEXER_RPC").unwrap_or(defaults.indexer_rpc),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                upload_dir: PathBuf::from("uploads"),
                download_dir: PathBuf::from("downloads"),
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            network: NetworkConfig::default(),
            client: ClientConfig {
                backend: Backend::Client,
                binary_path: DEFAULT_CLIENT_BIN.to_string(),
                verify_proof: true,
            },
            private_key: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(v) => parse_value("PORT", &v)?,
            None => defaults.server.port,
        };

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(v) => parse_value("MAX_UPLOAD_BYTES", &v)?,
            None => defaults.server.max_upload_bytes,
        };

        let backend = match var("STORAGE_BACKEND").as_deref().map(str::to_ascii_lowercase) {
            None => Backend::Client,
            Some(v) if v == "client" => Backend::Client,
            Some(v) if v == "memory" => Backend::Memory,
            Some(v) => {
                return Err(ConfigError::InvalidValue {
                    name: "STORAGE_BACKEND",
                    value: v,
                })
            }
        };

        let verify_proof = match var("DOWNLOAD_VERIFY_PROOF") {
            Some(v) => parse_value("DOWNLOAD_VERIFY_PROOF", &v)?,
            None => defaults.client.verify_proof,
        };

        let private_key = var("PRIVATE_KEY")
            .map(|v| PrivateKey::parse(&v))
            .transpose()?;

        Ok(Config {
            server: ServerConfig {
                host: var("SERVER_HOST").unwrap_or(defaults.server.host),
                port,
                upload_dir: var("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.server.upload_dir),
                download_dir: var("DOWNLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.server.download_dir),
                max_upload_bytes,
            },
            network: NetworkConfig::from_lookup(&var),
            client: ClientConfig {
                backend,
                binary_path: var("ZG_CLIENT_BIN").unwrap_or(defaults.client.binary_path),
                verify_proof,
            },
            private_key,
        })
    }

    /// The signer key, required by the HTTP service
    pub fn require_private_key(&self) -> Result<&PrivateKey, ConfigError> {
        self.private_key.as_ref().ok_or(ConfigError::MissingPrivateKey)
    }
}

fn parse_value<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY: &str = "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_environment_empty() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.network, NetworkConfig::default());
        assert_eq!(config.client.backend, Backend::Client);
        assert!(config.client.verify_proof);
        assert!(config.private_key.is_none());
        assert!(matches!(
            config.require_private_key(),
            Err(ConfigError::MissingPrivateKey)
        ));
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = Config::from_lookup(lookup(&[
            ("PORT", "8080"),
            ("RPC_URL", "http://localhost:8545"),
            ("FLOW_CONTRACT_STANDARD", "0xabc"),
            ("INDEXER_RPC", "http://localhost:5678"),
            ("STORAGE_BACKEND", "Memory"),
            ("DOWNLOAD_VERIFY_PROOF", "false"),
            ("PRIVATE_KEY", KEY),
        ]))
        .unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.network.rpc_url, "http://localhost:8545");
        assert_eq!(config.network.flow_contract, "0xabc");
        assert_eq!(config.network.indexer_rpc, "http://localhost:5678");
        assert_eq!(config.client.backend, Backend::Memory);
        assert!(!config.client.verify_proof);
        assert_eq!(config.require_private_key().unwrap().expose(), KEY);
    }

    #[test]
    fn test_flow_contract_prefers_primary_name() {
        let config = Config::from_lookup(lookup(&[
            ("FLOW_CONTRACT", "0x111"),
            ("FLOW_CONTRACT_STANDARD", "0x222"),
        ]))
        .unwrap();
        assert_eq!(config.network.flow_contract, "0x111");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            Config::from_lookup(lookup(&[("PORT", "eighty")])),
            Err(ConfigError::InvalidValue { name: "PORT", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("STORAGE_BACKEND", "s3")])),
            Err(ConfigError::InvalidValue { name: "STORAGE_BACKEND", .. })
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[("PRIVATE_KEY", "not-a-key")])),
            Err(ConfigError::InvalidPrivateKey)
        ));
    }

    #[test]
    fn test_private_key_accepts_bare_hex_and_redacts_debug() {
        let bare = KEY.trim_start_matches("0x");
        let key = PrivateKey::parse(bare).unwrap();
        assert_eq!(key.expose(), bare);
        assert_eq!(format!("{:?}", key), "PrivateKey(<redacted>)");
        assert!(PrivateKey::parse(&bare[..60]).is_err());
    }
}
