// This file derives the fixed-width on-chain hash from a CID.

use ethers::types::H256;
use ethers::utils::keccak256;

use crate::domain::types::Cid;

/// Hashes a CID into the 32-byte digest the contract accepts.
///
/// CIDs are variable-length strings; the contract interface expects a
/// fixed-width `bytes32`. Pure and deterministic: the same CID always
/// yields the same hash. The CID itself is never stored on-chain, so
/// callers must retain it to fetch the file back from the pinning
/// service.
pub fn hash_cid(cid: &Cid) -> H256 {
    H256::from(keccak256(cid.as_str().as_bytes()))
}

/// Renders a digest in the 0x-prefixed lowercase hex form used in
/// transaction arguments and logs.
pub fn to_hex_prefixed(hash: H256) -> String {
    format!("0x{}", hex::encode(hash.as_bytes()))
}
