//! Signed-message authentication round-trip with a real local wallet:
//! a signature over the issued challenge verifies once, a wrong signer
//! is rejected, and a consumed or never-issued challenge fails.

use std::time::Duration;

use ethers::signers::{LocalWallet, Signer};
use genomic_chain::ChallengeStore;

#[tokio::test]
async fn signed_challenge_verifies_and_is_single_use() {
    let store = ChallengeStore::new();
    let wallet = LocalWallet::new(&mut rand::thread_rng());
    let address = wallet.address();

    let message = store.issue(address).await;
    let signature = wallet.sign_message(message.as_bytes()).await.unwrap();

    store
        .verify(address, &signature.to_string())
        .await
        .expect("signature over the challenge should verify");

    // The nonce is consumed; replaying the same signature fails.
    assert!(store.verify(address, &signature.to_string()).await.is_err());
}

#[tokio::test]
async fn wrong_signer_is_rejected() {
    let store = ChallengeStore::new();
    let claimed = LocalWallet::new(&mut rand::thread_rng());
    let impostor = LocalWallet::new(&mut rand::thread_rng());

    let message = store.issue(claimed.address()).await;
    let signature = impostor.sign_message(message.as_bytes()).await.unwrap();

    assert!(store
        .verify(claimed.address(), &signature.to_string())
        .await
        .is_err());
}

#[tokio::test]
async fn unknown_challenge_is_rejected() {
    let store = ChallengeStore::new();
    let wallet = LocalWallet::new(&mut rand::thread_rng());

    // Never issued a challenge for this address.
    let signature = wallet.sign_message(b"anything").await.unwrap();
    assert!(store
        .verify(wallet.address(), &signature.to_string())
        .await
        .is_err());
}

#[tokio::test]
async fn expired_challenge_is_rejected_even_with_valid_signature() {
    let store = ChallengeStore::with_ttl(Duration::from_millis(50));
    let wallet = LocalWallet::new(&mut rand::thread_rng());
    let address = wallet.address();

    let message = store.issue(address).await;
    let signature = wallet.sign_message(message.as_bytes()).await.unwrap();

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(store.verify(address, &signature.to_string()).await.is_err());
}

#[tokio::test]
async fn expired_entries_are_swept_on_issue() {
    let store = ChallengeStore::with_ttl(Duration::from_millis(50));
    let stale = LocalWallet::new(&mut rand::thread_rng());
    let fresh = LocalWallet::new(&mut rand::thread_rng());

    let stale_message = store.issue(stale.address()).await;
    assert_eq!(store.outstanding().await, 1);

    tokio::time::sleep(Duration::from_millis(150)).await;
    store.issue(fresh.address()).await;

    // Issuing for a different address evicted the expired entry.
    assert_eq!(store.outstanding().await, 1);
    let signature = stale.sign_message(stale_message.as_bytes()).await.unwrap();
    assert!(store
        .verify(stale.address(), &signature.to_string())
        .await
        .is_err());
}

#[tokio::test]
async fn garbage_signature_is_rejected() {
    let store = ChallengeStore::new();
    let wallet = LocalWallet::new(&mut rand::thread_rng());
    let address = wallet.address();

    store.issue(address).await;
    assert!(store.verify(address, "0xnot-a-signature").await.is_err());
}
