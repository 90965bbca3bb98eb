//! Core data types of the upload and access-grant workflow.

use chrono::{DateTime, Utc};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// A file handed to the upload workflow. Consumed exactly once by the
/// pinning stage; there is nothing to keep afterwards except the CID.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bytes: Vec<u8>,
    /// Optional display name forwarded to the pinning service metadata.
    pub name: Option<String>,
}

/// Content identifier issued by the pinning service.
///
/// Opaque and immutable once issued. This is a capability token: the
/// contract stores only its hash, so a lost CID makes the pinned file
/// unrecoverable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cid(pub String);

impl Cid {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Cid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-chain metadata for a recorded file, as returned by `getFile`.
#[derive(Debug, Clone, Serialize)]
pub struct FileRecord {
    pub owner: Address,
    pub uploaded_at: U256,
}

/// A pinned CID with no corresponding on-chain record.
///
/// Written to the orphan ledger when the chain submission failed and the
/// compensating unpin failed too, so the pin can be reconciled manually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanRecord {
    pub cid: Cid,
    pub content_hash: String,
    pub reason: String,
    pub recorded_at: DateTime<Utc>,
}
