//! Storage Module
//!
//! Upload and download orchestration over a decentralized-storage SDK.
//! Content addressing, chunking and chain submission all live behind the
//! [`StorageProvider`] seam; this module only prepares inputs, calls the
//! provider and shapes its failures.
//!
//! Providers:
//! - `ClientBinaryProvider`: drives the `0g-storage-client` executable
//! - `MemoryProvider`: in-process store for local development and tests
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use zg_storage_gateway::storage::{MemoryProvider, TransferService};
//!
//! let service = TransferService::new(Arc::new(MemoryProvider::new()));
//! let result = service.upload("./file.txt".as_ref()).await?;
//! service.download(&result.root_hash.parse()?, "./copy.txt".as_ref()).await?;
//! ```

mod client;
mod file;
mod provider;
mod service;
mod types;

pub use client::{ClientBinaryConfig, ClientBinaryProvider};
pub use file::StorageFile;
pub use provider::{MemoryProvider, StorageProvider};
pub use service::TransferService;
pub use types::{ProviderError, RootHash, TransferError, UploadReceipt, UploadResult};
