pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::upload_service::{OrphanLedger, UploadOutcome, UploadService};
pub use crypto::hashing::{hash_cid, to_hex_prefixed};
pub use domain::auth::ChallengeStore;
pub use domain::registry::FileRegistry;
pub use domain::types::{Cid, FileRecord, OrphanRecord, UploadRequest};
pub use infra::ethereum::{GenomicContract, WalletSession};
pub use infra::pinning::PinningClient;
