pub mod contract;
pub mod wallet;

pub use contract::GenomicContract;
pub use wallet::WalletSession;
