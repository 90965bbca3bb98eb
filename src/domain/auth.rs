//! Signed-message wallet authentication.
//!
//! A server-side handler must never trust a bare address string supplied
//! by the client. Instead the relay issues a single-use challenge message
//! for an address, the wallet signs it (EIP-191 personal_sign), and the
//! relay verifies that the recovered signer matches the claimed address.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use ethers::types::{Address, Signature};
use rand::RngCore;
use tokio::sync::Mutex;

/// How long an issued challenge stays valid.
const CHALLENGE_TTL: std::time::Duration = std::time::Duration::from_secs(300);

struct Challenge {
    message: String,
    issued_at: DateTime<Utc>,
}

/// In-memory store of outstanding challenges, keyed by claimed address.
///
/// A challenge is consumed on the first verification attempt, successful
/// or not, so a captured signature cannot be replayed. The challenge
/// endpoint is unauthenticated, so `issue` also sweeps expired entries;
/// otherwise a client iterating fresh addresses would grow the map
/// without bound.
pub struct ChallengeStore {
    ttl: chrono::Duration,
    inner: Mutex<HashMap<Address, Challenge>>,
}

impl ChallengeStore {
    pub fn new() -> Self {
        Self::with_ttl(CHALLENGE_TTL)
    }

    /// Store with a custom challenge lifetime.
    pub fn with_ttl(ttl: std::time::Duration) -> Self {
        Self {
            ttl: chrono::Duration::milliseconds(ttl.as_millis() as i64),
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Issues a fresh challenge for `address`, replacing any outstanding
    /// one and evicting every expired entry.
    pub async fn issue(&self, address: Address) -> String {
        let mut nonce = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut nonce);
        let issued_at = Utc::now();
        let message = format!(
            "GenomicChain wallet verification\naddress: {:#x}\nnonce: {}\nissued-at: {}",
            address,
            hex::encode(nonce),
            issued_at.to_rfc3339()
        );
        let mut inner = self.inner.lock().await;
        inner.retain(|_, challenge| issued_at - challenge.issued_at <= self.ttl);
        inner.insert(
            address,
            Challenge {
                message: message.clone(),
                issued_at,
            },
        );
        message
    }

    /// Verifies that `signature` was produced over the outstanding
    /// challenge for `address` by the holder of that address's key.
    pub async fn verify(&self, address: Address, signature: &str) -> Result<()> {
        let challenge = {
            let mut inner = self.inner.lock().await;
            inner
                .remove(&address)
                .ok_or_else(|| anyhow!("no outstanding challenge for {:#x}", address))?
        };
        if Utc::now() - challenge.issued_at > self.ttl {
            return Err(anyhow!("challenge for {:#x} has expired", address));
        }
        let signature = Signature::from_str(signature.trim_start_matches("0x"))
            .context("signature is not valid 65-byte hex")?;
        signature
            .verify(challenge.message.as_str(), address)
            .with_context(|| format!("signature was not produced by {:#x}", address))?;
        Ok(())
    }

    /// Number of challenges currently awaiting verification.
    pub async fn outstanding(&self) -> usize {
        self.inner.lock().await.len()
    }
}

impl Default for ChallengeStore {
    fn default() -> Self {
        Self::new()
    }
}
