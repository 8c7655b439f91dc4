//! Arweave Transport Layer
//!
//! The ledger-client seam consumed by the replication engine.
//!
//! This crate provides:
//! - [`client`]: the [`LedgerReader`] / [`LedgerClient`] / [`ChunkUploader`] traits
//!   and [`ApiConfig`]
//! - [`gateway`]: [`GatewayClient`], a read-only HTTP client for public gateways
//! - [`memory`]: [`MemoryLedger`], an in-process ledger implementing the full
//!   client contract (signing, chunked upload, mining)
//! - [`network`]: gateway endpoint resolution
//!
//! # Example
//!
//! ```ignore
//! use arlocal_transport::{GatewayClient, LedgerReader};
//!
//! let gateway = GatewayClient::arweave();
//! let tx = gateway.get_transaction("FGz4VCxU8_jsLeRth4aaJ586tcwgy96ot-3qD5wAFqw").await?;
//! let data = gateway.get_raw_data("FGz4VCxU8_jsLeRth4aaJ586tcwgy96ot-3qD5wAFqw").await?;
//! ```

pub mod client;
pub mod gateway;
pub mod memory;
pub mod network;
pub mod test_utils;

// Re-export main types for convenience
pub use client::{ApiConfig, ChunkUploader, LedgerClient, LedgerReader};
pub use gateway::GatewayClient;
pub use memory::{LedgerStats, MemoryLedger, MAX_CHUNK_SIZE};
