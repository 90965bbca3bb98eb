//! Compensation behavior of the upload workflow: a failed chain
//! submission triggers an unpin of the already-pinned file, and a
//! failed unpin leaves a parseable orphan ledger entry. The chain is
//! replaced by a registry stub that always reverts; the pinning service
//! by a mock upstream on a loopback port.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, post};
use axum::{Json, Router};
use ethers::types::{Address, TransactionReceipt, H256, U256};
use rand::RngCore;
use serde_json::json;

use genomic_chain::{
    Cid, FileRecord, FileRegistry, OrphanLedger, OrphanRecord, PinningClient, UploadRequest,
    UploadService,
};

const TEST_CID: &str = "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi";

#[derive(Clone)]
struct MockPinning {
    pin_bodies: Arc<Mutex<Vec<Vec<u8>>>>,
    unpinned: Arc<Mutex<Vec<String>>>,
    fail_unpin: bool,
}

async fn mock_pin_handler(
    State(mock): State<MockPinning>,
    body: axum::body::Bytes,
) -> (StatusCode, Json<serde_json::Value>) {
    mock.pin_bodies.lock().unwrap().push(body.to_vec());
    (StatusCode::OK, Json(json!({ "IpfsHash": TEST_CID })))
}

async fn mock_unpin_handler(
    State(mock): State<MockPinning>,
    Path(cid): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    mock.unpinned.lock().unwrap().push(cid);
    if mock.fail_unpin {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "unpin is down" })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "status": "unpinned" })))
    }
}

async fn start_mock_upstream(fail_unpin: bool) -> (String, MockPinning) {
    let mock = MockPinning {
        pin_bodies: Arc::new(Mutex::new(Vec::new())),
        unpinned: Arc::new(Mutex::new(Vec::new())),
        fail_unpin,
    };
    let router = Router::new()
        .route("/pinning/pinFileToIPFS", post(mock_pin_handler))
        .route("/pinning/unpin/:cid", delete(mock_unpin_handler))
        .with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{}", addr), mock)
}

/// Registry whose uploadFile always reverts; the other operations are
/// never reached in these tests.
struct RevertingRegistry;

#[async_trait]
impl FileRegistry for RevertingRegistry {
    async fn upload_file(&self, _content_hash: H256, _fee: U256) -> Result<TransactionReceipt> {
        Err(anyhow!("uploadFile reverted: insufficient fee"))
    }

    async fn grant_access(&self, _: H256, _: Address) -> Result<TransactionReceipt> {
        Err(anyhow!("not reachable in this test"))
    }

    async fn revoke_access(&self, _: H256, _: Address) -> Result<TransactionReceipt> {
        Err(anyhow!("not reachable in this test"))
    }

    async fn get_file(&self, _: H256) -> Result<FileRecord> {
        Err(anyhow!("not reachable in this test"))
    }
}

fn temp_ledger_path() -> PathBuf {
    let mut tag = [0u8; 8];
    rand::thread_rng().fill_bytes(&mut tag);
    std::env::temp_dir().join(format!("orphan-ledger-{}.jsonl", hex::encode(tag)))
}

fn fasta_request() -> UploadRequest {
    UploadRequest {
        bytes: b">seq1\nACGTACGTACGT\n".to_vec(),
        name: Some("genome.fasta".to_string()),
    }
}

#[tokio::test]
async fn chain_failure_triggers_unpin_of_pinned_cid() {
    let (upstream, mock) = start_mock_upstream(false).await;
    let ledger_path = temp_ledger_path();
    let service = UploadService::new(
        PinningClient::new(&upstream, "test-jwt").unwrap(),
        RevertingRegistry,
    )
    .unwrap()
    .with_orphan_ledger(OrphanLedger::new(ledger_path.clone()));

    let err = service.upload(fasta_request()).await.unwrap_err();
    assert!(format!("{:#}", err).contains(TEST_CID));

    // The pinned CID was compensated by an unpin.
    assert_eq!(
        mock.unpinned.lock().unwrap().as_slice(),
        [TEST_CID.to_string()]
    );

    // The display name rode along as pinning metadata.
    let bodies = mock.pin_bodies.lock().unwrap();
    let pin_body = String::from_utf8_lossy(&bodies[0]);
    assert!(pin_body.contains("pinataMetadata"));
    assert!(pin_body.contains("genome.fasta"));

    // Unpin succeeded, so nothing went to the ledger.
    assert!(tokio::fs::metadata(&ledger_path).await.is_err());
}

#[tokio::test]
async fn failed_unpin_writes_orphan_ledger_entry() {
    let (upstream, mock) = start_mock_upstream(true).await;
    let ledger_path = temp_ledger_path();
    let service = UploadService::new(
        PinningClient::new(&upstream, "test-jwt").unwrap(),
        RevertingRegistry,
    )
    .unwrap()
    .with_orphan_ledger(OrphanLedger::new(ledger_path.clone()));

    assert!(service.upload(fasta_request()).await.is_err());
    assert_eq!(mock.unpinned.lock().unwrap().len(), 1);

    let contents = tokio::fs::read_to_string(&ledger_path).await.unwrap();
    let records: Vec<OrphanRecord> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].cid, Cid(TEST_CID.to_string()));
    assert!(records[0].reason.contains("insufficient fee"));

    tokio::fs::remove_file(&ledger_path).await.unwrap();
}
