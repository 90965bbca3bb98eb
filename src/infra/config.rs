//! Centralized configuration (environment variables + defaults).

use std::path::PathBuf;
use std::time::Duration;

/// Bearer token for the pinning service (required).
///
/// This is the only place the credential lives. It must never be shipped
/// to a browser client; all pinning goes through the relay.
pub fn pinata_jwt() -> String {
    std::env::var("PINATA_JWT").expect("PINATA_JWT must be set")
}

/// Pinning service API base URL.
pub fn pinata_api_url() -> String {
    std::env::var("PINATA_API_URL").unwrap_or_else(|_| "https://api.pinata.cloud".to_string())
}

/// Ethereum JSON-RPC endpoint (required).
pub fn eth_rpc_url() -> String {
    std::env::var("ETH_RPC_URL").expect("ETH_RPC_URL must be set")
}

/// Deployed GenomicDataStorage contract address (required).
pub fn contract_address() -> String {
    std::env::var("CONTRACT_ADDRESS").expect("CONTRACT_ADDRESS must be set")
}

/// Path to the hex-encoded wallet private key file. Tilde-expanded.
pub fn wallet_key_file() -> String {
    std::env::var("WALLET_KEY_FILE")
        .unwrap_or_else(|_| "~/.config/genomic-chain/wallet.key".to_string())
}

/// Fee sent with every `uploadFile` transaction, in ether.
pub fn upload_fee_eth() -> String {
    std::env::var("UPLOAD_FEE_ETH").unwrap_or_else(|_| "0.1".to_string())
}

/// Timeout applied to every outbound HTTP request.
pub fn http_timeout() -> Duration {
    let secs = std::env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(30);
    Duration::from_secs(secs.max(1))
}

/// Directory where the relay spools uploads before forwarding them.
pub fn upload_tmp_dir() -> PathBuf {
    std::env::var("UPLOAD_TMP_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("genomic-chain-uploads"))
}

/// JSON-lines file recording pinned CIDs with no on-chain record.
pub fn orphan_ledger_path() -> PathBuf {
    std::env::var("ORPHAN_LEDGER_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("orphaned_cids.jsonl"))
}

/// Relay listen port.
pub fn port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(3001)
}
