// Responsible for all communication with the GenomicDataStorage contract.

use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::types::{Address, TransactionReceipt, H256, U256};

use crate::domain::registry::FileRegistry;
use crate::domain::types::FileRecord;
use crate::infra::config;
use crate::infra::ethereum::wallet::{ChainSigner, WalletSession};

// The contract is fixed and already deployed; this is its callable
// surface. uploadFile reverts if the fee is insufficient or the hash is
// already recorded; grantAccess/revokeAccess revert unless the caller
// owns the hash; getFile reverts with "access denied" unless the caller
// is the owner or a grantee.
abigen!(
    GenomicDataStorage,
    r#"[
        function uploadFile(bytes32 contentHash) external payable
        function grantAccess(bytes32 contentHash, address grantee) external
        function revokeAccess(bytes32 contentHash, address grantee) external
        function getFile(bytes32 contentHash) external view returns (address owner, uint256 uploadedAt)
    ]"#
);

/// Typed handle to the deployed contract, bound to the session signer.
///
/// Every mutating operation sends a transaction and awaits one
/// confirmation before returning; nothing is idempotent and nothing is
/// retried. Resubmitting `upload_file` for a recorded hash reverts.
pub struct GenomicContract {
    inner: GenomicDataStorage<ChainSigner>,
}

impl GenomicContract {
    pub fn connect(session: &WalletSession) -> Result<Self> {
        let address = Address::from_str(&config::contract_address())
            .context("CONTRACT_ADDRESS is not a valid Ethereum address")?;
        Ok(Self {
            inner: GenomicDataStorage::new(address, session.client.clone()),
        })
    }

    pub fn address(&self) -> Address {
        self.inner.address()
    }
}

#[async_trait]
impl FileRegistry for GenomicContract {
    async fn upload_file(&self, content_hash: H256, fee: U256) -> Result<TransactionReceipt> {
        let call = self
            .inner
            .upload_file(content_hash.to_fixed_bytes())
            .value(fee);
        let pending = call
            .send()
            .await
            .context("uploadFile transaction rejected")?;
        pending
            .await
            .context("uploadFile confirmation failed")?
            .ok_or_else(|| anyhow!("uploadFile transaction dropped before it was mined"))
    }

    async fn grant_access(
        &self,
        content_hash: H256,
        grantee: Address,
    ) -> Result<TransactionReceipt> {
        let call = self
            .inner
            .grant_access(content_hash.to_fixed_bytes(), grantee);
        let pending = call
            .send()
            .await
            .context("grantAccess transaction rejected")?;
        pending
            .await
            .context("grantAccess confirmation failed")?
            .ok_or_else(|| anyhow!("grantAccess transaction dropped before it was mined"))
    }

    async fn revoke_access(
        &self,
        content_hash: H256,
        grantee: Address,
    ) -> Result<TransactionReceipt> {
        let call = self
            .inner
            .revoke_access(content_hash.to_fixed_bytes(), grantee);
        let pending = call
            .send()
            .await
            .context("revokeAccess transaction rejected")?;
        pending
            .await
            .context("revokeAccess confirmation failed")?
            .ok_or_else(|| anyhow!("revokeAccess transaction dropped before it was mined"))
    }

    async fn get_file(&self, content_hash: H256) -> Result<FileRecord> {
        let (owner, uploaded_at) = self
            .inner
            .get_file(content_hash.to_fixed_bytes())
            .call()
            .await
            .context("getFile call reverted")?;
        Ok(FileRecord { owner, uploaded_at })
    }
}
