//! Port to the on-chain file registry.

use anyhow::Result;
use async_trait::async_trait;
use ethers::types::{Address, TransactionReceipt, H256, U256};

use crate::domain::types::FileRecord;

/// The contract surface the upload workflow depends on.
///
/// Implemented by the ethers binding; tests substitute their own to
/// drive the chain-failure paths without a node.
#[async_trait]
pub trait FileRegistry: Send + Sync {
    /// Records ownership of a content hash, paying the upload fee.
    async fn upload_file(&self, content_hash: H256, fee: U256) -> Result<TransactionReceipt>;

    /// Adds `grantee` to the hash's access list.
    async fn grant_access(&self, content_hash: H256, grantee: Address)
        -> Result<TransactionReceipt>;

    /// Removes `grantee` from the hash's access list.
    async fn revoke_access(
        &self,
        content_hash: H256,
        grantee: Address,
    ) -> Result<TransactionReceipt>;

    /// Reads the stored metadata for a hash.
    async fn get_file(&self, content_hash: H256) -> Result<FileRecord>;
}
