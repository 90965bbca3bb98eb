//! Orchestrates the upload workflow: pin, hash, record on-chain.
//!
//! The three stages are strictly sequential. The one recovery behavior
//! is the compensation step: a failed chain submission triggers an unpin
//! of the already-pinned file, and if the unpin itself fails the CID is
//! appended to the orphan ledger so a pinned-but-unrecorded file can be
//! reconciled manually instead of leaking silently.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use ethers::types::{Address, TransactionReceipt, TxHash, H256, U256};
use ethers::utils::parse_ether;
use tokio::io::AsyncWriteExt;

use crate::crypto::hashing::{hash_cid, to_hex_prefixed};
use crate::domain::registry::FileRegistry;
use crate::domain::types::{Cid, FileRecord, OrphanRecord, UploadRequest};
use crate::infra::config;
use crate::infra::pinning::PinningClient;

/// Result of a completed upload.
///
/// The CID is part of the outcome because the contract stores only the
/// hash; if the caller drops the CID, the file can never be fetched back
/// from the pinning service.
#[derive(Debug)]
pub struct UploadOutcome {
    pub cid: Cid,
    pub content_hash: H256,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
}

pub struct UploadService<R: FileRegistry> {
    pinning: PinningClient,
    registry: R,
    fee: U256,
    orphan_ledger: OrphanLedger,
}

impl<R: FileRegistry> UploadService<R> {
    pub fn new(pinning: PinningClient, registry: R) -> Result<Self> {
        let fee = parse_ether(config::upload_fee_eth())
            .context("UPLOAD_FEE_ETH is not a valid ether amount")?;
        Ok(Self {
            pinning,
            registry,
            fee,
            orphan_ledger: OrphanLedger::new(config::orphan_ledger_path()),
        })
    }

    /// Replaces the configured orphan ledger.
    pub fn with_orphan_ledger(mut self, ledger: OrphanLedger) -> Self {
        self.orphan_ledger = ledger;
        self
    }

    /// Runs the full workflow for one file.
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadOutcome> {
        let display_name = request.name;
        let file_name = display_name
            .clone()
            .unwrap_or_else(|| "upload.bin".to_string());

        let cid = self
            .pinning
            .pin_file(request.bytes, &file_name, display_name.as_deref())
            .await
            .context("pinning stage failed")?;
        let content_hash = hash_cid(&cid);
        println!(
            "> Pinned {} as {} (content hash {})",
            file_name,
            cid,
            to_hex_prefixed(content_hash)
        );

        match self.registry.upload_file(content_hash, self.fee).await {
            Ok(receipt) => {
                println!(
                    "> uploadFile confirmed: tx {:#x}, block {:?}",
                    receipt.transaction_hash, receipt.block_number
                );
                Ok(UploadOutcome {
                    cid,
                    content_hash,
                    tx_hash: receipt.transaction_hash,
                    block_number: receipt.block_number.map(|n| n.as_u64()),
                })
            }
            Err(chain_err) => {
                self.compensate(&cid, content_hash, &chain_err).await;
                Err(chain_err
                    .context(format!("on-chain record failed for pinned CID {}", cid)))
            }
        }
    }

    /// Undoes the pin after a failed chain submission. If the unpin also
    /// fails, the CID goes to the orphan ledger.
    async fn compensate(&self, cid: &Cid, content_hash: H256, cause: &anyhow::Error) {
        match self.pinning.unpin(cid).await {
            Ok(()) => println!("> Compensation: unpinned {} after failed chain submission", cid),
            Err(unpin_err) => {
                eprintln!("> Compensation unpin of {} failed: {:#}", cid, unpin_err);
                if let Err(ledger_err) = self
                    .orphan_ledger
                    .record(cid, content_hash, &format!("{:#}", cause))
                    .await
                {
                    eprintln!(
                        "> Could not write orphan ledger entry for {}: {:#}",
                        cid, ledger_err
                    );
                }
            }
        }
    }

    pub async fn grant_access(
        &self,
        content_hash: H256,
        grantee: Address,
    ) -> Result<TransactionReceipt> {
        self.registry.grant_access(content_hash, grantee).await
    }

    pub async fn revoke_access(
        &self,
        content_hash: H256,
        grantee: Address,
    ) -> Result<TransactionReceipt> {
        self.registry.revoke_access(content_hash, grantee).await
    }

    pub async fn get_file(&self, content_hash: H256) -> Result<FileRecord> {
        self.registry.get_file(content_hash).await
    }
}

/// Append-only JSON-lines file of pinned CIDs with no on-chain record.
pub struct OrphanLedger {
    path: PathBuf,
}

impl OrphanLedger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub async fn record(&self, cid: &Cid, content_hash: H256, reason: &str) -> Result<()> {
        let entry = OrphanRecord {
            cid: cid.clone(),
            content_hash: to_hex_prefixed(content_hash),
            reason: reason.to_string(),
            recorded_at: Utc::now(),
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("could not open orphan ledger {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .await
            .with_context(|| format!("could not append to orphan ledger {}", self.path.display()))?;
        Ok(())
    }
}
