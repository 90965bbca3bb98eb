// Responsible for the wallet key and the signer-bound RPC connection.

use std::sync::Arc;

use anyhow::{Context, Result};
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;

use crate::infra::config;

pub type ChainSigner = SignerMiddleware<Provider<Http>, LocalWallet>;

/// An explicit wallet/provider session, constructed once per process
/// from configuration and passed to every operation that needs to sign.
pub struct WalletSession {
    pub client: Arc<ChainSigner>,
    pub address: Address,
    pub chain_id: u64,
}

impl WalletSession {
    /// Connects to the configured RPC endpoint and loads the signing key.
    ///
    /// A missing key file or unreachable endpoint is a blocking
    /// precondition failure; the error message says what to fix.
    pub async fn connect() -> Result<Self> {
        let rpc_url = config::eth_rpc_url();
        let provider = Provider::<Http>::try_from(rpc_url.as_str())
            .with_context(|| format!("invalid ETH_RPC_URL: {}", rpc_url))?;
        let chain_id = provider
            .get_chainid()
            .await
            .with_context(|| format!("could not reach RPC endpoint {}", rpc_url))?
            .as_u64();

        let key_path = shellexpand::tilde(&config::wallet_key_file()).into_owned();
        let key_hex = std::fs::read_to_string(&key_path).with_context(|| {
            format!(
                "could not read wallet key file {} (put a hex-encoded private key there, or set WALLET_KEY_FILE)",
                key_path
            )
        })?;
        let wallet: LocalWallet = key_hex
            .trim()
            .trim_start_matches("0x")
            .parse()
            .with_context(|| format!("{} does not contain a valid hex private key", key_path))?;
        let wallet = wallet.with_chain_id(chain_id);
        let address = wallet.address();

        println!(
            "> Wallet session: address {:#x} on chain {}",
            address, chain_id
        );
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        Ok(Self {
            client,
            address,
            chain_id,
        })
    }
}
