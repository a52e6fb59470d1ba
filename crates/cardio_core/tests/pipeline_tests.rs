//! Deterministic pipeline tests.
//!
//! These use fake providers and stores injected through the
//! `AnalysisProvider` / `RecordStore` traits to verify the orchestration
//! contract without any network calls.

use async_trait::async_trait;
use cardio_core::error::{ProviderError, StoreError};
use cardio_core::pipeline::Pipeline;
use cardio_core::provider::AnalysisProvider;
use cardio_core::records::{FileRecordStore, RecordStore};
use cardio_core::scorer;
use cardio_core::storage::JsonStore;
use cardio_core::types::{
    AnalysisResult, Gender, NewReading, RiskLevel, User, VitalsInput, VitalsReading,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use uuid::Uuid;

// ============================================================================
// Fixtures
// ============================================================================

fn test_user() -> User {
    User {
        id: Uuid::new_v4(),
        username: "testuser".to_string(),
        age: Some(30),
        gender: Some(Gender::Other),
    }
}

fn healthy_input() -> VitalsInput {
    VitalsInput {
        age: 25,
        gender: Gender::Female,
        heart_rate: 72,
        systolic_bp: 115,
        diastolic_bp: 75,
    }
}

fn critical_input() -> VitalsInput {
    VitalsInput {
        age: 72,
        gender: Gender::Male,
        heart_rate: 130,
        systolic_bp: 165,
        diastolic_bp: 102,
    }
}

fn remote_result() -> AnalysisResult {
    AnalysisResult {
        risk_level: RiskLevel::High,
        summary: "Remote model assessment.".to_string(),
        recommendations: vec![
            "See a cardiologist".to_string(),
            "Reduce sodium".to_string(),
            "Monitor daily".to_string(),
        ],
        anomalies: vec!["Tachycardia detected".to_string()],
    }
}

fn file_store() -> (tempfile::TempDir, Arc<FileRecordStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileRecordStore::new(JsonStore::open(dir.path()).unwrap()));
    (dir, store)
}

// ============================================================================
// Fake collaborators
// ============================================================================

/// Always answers with a fixed result and records what it was asked.
struct FixedProvider {
    result: AnalysisResult,
    seen: Mutex<Vec<VitalsReading>>,
}

impl FixedProvider {
    fn new(result: AnalysisResult) -> Self {
        Self {
            result,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl AnalysisProvider for FixedProvider {
    async fn analyze(&self, reading: &VitalsReading) -> Result<AnalysisResult, ProviderError> {
        self.seen.lock().unwrap().push(reading.clone());
        Ok(self.result.clone())
    }
}

/// Always fails, counting attempts.
struct DownProvider {
    calls: AtomicUsize,
}

impl DownProvider {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AnalysisProvider for DownProvider {
    async fn analyze(&self, _reading: &VitalsReading) -> Result<AnalysisResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ProviderError::Request("connection refused".to_string()))
    }
}

/// Blocks until released, so tests can observe the in-flight state.
struct GatedProvider {
    gate: Notify,
    succeed: bool,
}

impl GatedProvider {
    fn new(succeed: bool) -> Self {
        Self {
            gate: Notify::new(),
            succeed,
        }
    }
}

#[async_trait]
impl AnalysisProvider for GatedProvider {
    async fn analyze(&self, _reading: &VitalsReading) -> Result<AnalysisResult, ProviderError> {
        self.gate.notified().await;
        if self.succeed {
            Ok(remote_result())
        } else {
            Err(ProviderError::Request("gated failure".to_string()))
        }
    }
}

/// Store whose writes always fail.
struct OfflineStore;

impl RecordStore for OfflineStore {
    fn add_record(&self, _reading: NewReading) -> Result<VitalsReading, StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk offline",
        )))
    }

    fn records_for(&self, _user_id: &Uuid) -> Result<Vec<VitalsReading>, StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk offline",
        )))
    }
}

// ============================================================================
// Success branch
// ============================================================================

/// The remote result is surfaced verbatim; the local score is discarded.
#[tokio::test]
async fn test_success_uses_remote_result_verbatim() {
    let (_dir, store) = file_store();
    let provider = Arc::new(FixedProvider::new(remote_result()));
    let pipeline = Pipeline::new(store, provider);
    let user = test_user();

    // Healthy vitals score Low locally, so a High result proves the
    // remote answer was not blended or overridden.
    assert_eq!(scorer::score(&healthy_input()), RiskLevel::Low);
    let result = pipeline.submit(&user, healthy_input()).await.unwrap();
    assert_eq!(result, remote_result());
}

/// The provider receives the persisted record, id included.
#[tokio::test]
async fn test_remote_call_gets_persisted_record() {
    let (_dir, store) = file_store();
    let provider = Arc::new(FixedProvider::new(remote_result()));
    let pipeline = Pipeline::new(store.clone(), provider.clone());
    let user = test_user();

    pipeline.submit(&user, healthy_input()).await.unwrap();

    let seen = provider.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let persisted = store.records_for(&user.id).unwrap();
    assert_eq!(seen[0], persisted[0]);
    assert_eq!(seen[0].user_id, user.id);
}

/// The published record list reflects the just-persisted reading.
#[tokio::test]
async fn test_success_republishes_history() {
    let (_dir, store) = file_store();
    let provider = Arc::new(FixedProvider::new(remote_result()));
    let pipeline = Pipeline::new(store, provider);
    let user = test_user();

    assert!(pipeline.records().is_empty());
    pipeline.submit(&user, critical_input()).await.unwrap();

    let records = pipeline.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].systolic_bp, 165);
}

// ============================================================================
// Fallback branch
// ============================================================================

/// Identical vitals with the provider down always synthesize the same
/// fallback, equal to the local scorer's output.
#[tokio::test]
async fn test_fallback_is_deterministic() {
    let (_dir, store) = file_store();
    let provider = Arc::new(DownProvider::new());
    let pipeline = Pipeline::new(store, provider);
    let user = test_user();

    let first = pipeline.submit(&user, critical_input()).await.unwrap();
    let second = pipeline.submit(&user, critical_input()).await.unwrap();

    assert_eq!(first.risk_level, scorer::score(&critical_input()));
    assert_eq!(first, second);
}

/// The record is persisted even when remote analysis fails.
#[tokio::test]
async fn test_record_persisted_before_remote_failure() {
    let (_dir, store) = file_store();
    let provider = Arc::new(DownProvider::new());
    let pipeline = Pipeline::new(store.clone(), provider.clone());
    let user = test_user();

    pipeline.submit(&user, healthy_input()).await.unwrap();

    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.records_for(&user.id).unwrap().len(), 1);
    assert_eq!(pipeline.records().len(), 1);
}

/// End-to-end: severe vitals, remote unavailable. BP +3, HR +2, age
/// 1+1 = 7 total, so the fallback must carry High and flag the anomaly.
#[tokio::test]
async fn test_fallback_high_risk_scenario() {
    let (_dir, store) = file_store();
    let pipeline = Pipeline::new(store, Arc::new(DownProvider::new()));
    let user = test_user();

    let result = pipeline.submit(&user, critical_input()).await.unwrap();

    assert_eq!(result.risk_level, RiskLevel::High);
    assert!(!result.anomalies.is_empty());
    assert!(!result.summary.is_empty());
    assert_eq!(result.recommendations.len(), 2);
}

/// End-to-end: healthy vitals, remote unavailable. Every weight is zero,
/// so the fallback is Low with no anomalies.
#[tokio::test]
async fn test_fallback_low_risk_scenario() {
    let (_dir, store) = file_store();
    let pipeline = Pipeline::new(store, Arc::new(DownProvider::new()));
    let user = test_user();

    let result = pipeline.submit(&user, healthy_input()).await.unwrap();

    assert_eq!(result.risk_level, RiskLevel::Low);
    assert!(result.anomalies.is_empty());
}

// ============================================================================
// Store failure
// ============================================================================

/// A persistence failure aborts the submission before any remote call
/// and leaves the busy flag cleared.
#[tokio::test]
async fn test_store_failure_skips_remote_and_clears_busy() {
    let provider = Arc::new(DownProvider::new());
    let pipeline = Pipeline::new(Arc::new(OfflineStore), provider.clone());
    let user = test_user();

    let result = pipeline.submit(&user, healthy_input()).await;

    assert!(result.is_err());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    assert!(!pipeline.busy());
}

// ============================================================================
// Record ordering
// ============================================================================

/// Records with timestamps t1 < t2 < t3 publish as t3, t2, t1.
#[tokio::test]
async fn test_published_records_most_recent_first() {
    let (_dir, store) = file_store();
    let user = test_user();

    for timestamp in [100, 300, 200] {
        store
            .add_record(NewReading {
                user_id: user.id,
                age: 30,
                gender: Gender::Other,
                heart_rate: 75,
                systolic_bp: 120,
                diastolic_bp: 80,
                timestamp,
            })
            .unwrap();
    }

    let pipeline = Pipeline::new(store, Arc::new(DownProvider::new()));
    pipeline.refresh_records(&user.id).unwrap();

    let timestamps: Vec<i64> = pipeline.records().iter().map(|r| r.timestamp).collect();
    assert_eq!(timestamps, vec![300, 200, 100]);
}

// ============================================================================
// Busy lifecycle
// ============================================================================

async fn wait_for_busy(pipeline: &Pipeline) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while !pipeline.busy() {
        assert!(Instant::now() < deadline, "pipeline never became busy");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// Busy is observable during remote analysis and cleared after the
/// success branch resolves.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_busy_lifecycle_success_branch() {
    let (_dir, store) = file_store();
    let provider = Arc::new(GatedProvider::new(true));
    let pipeline = Arc::new(Pipeline::new(store, provider.clone()));
    let user = test_user();

    assert!(!pipeline.busy());

    let handle = tokio::spawn({
        let pipeline = pipeline.clone();
        let user = user.clone();
        async move { pipeline.submit(&user, healthy_input()).await }
    });

    wait_for_busy(&pipeline).await;
    provider.gate.notify_one();

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.risk_level, RiskLevel::High);
    assert!(!pipeline.busy());
}

/// Busy is cleared after the fallback branch too.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_busy_lifecycle_fallback_branch() {
    let (_dir, store) = file_store();
    let provider = Arc::new(GatedProvider::new(false));
    let pipeline = Arc::new(Pipeline::new(store, provider.clone()));
    let user = test_user();

    let handle = tokio::spawn({
        let pipeline = pipeline.clone();
        let user = user.clone();
        async move { pipeline.submit(&user, healthy_input()).await }
    });

    wait_for_busy(&pipeline).await;
    provider.gate.notify_one();

    let result = handle.await.unwrap().unwrap();
    assert_eq!(result.risk_level, RiskLevel::Low);
    assert!(!pipeline.busy());
}
