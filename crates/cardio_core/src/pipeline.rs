//! Reconciliation orchestrator.
//!
//! Sequences local scoring, persistence, and remote analysis into one
//! pipeline call:
//!
//! score (local, held) -> persist -> remote analyze -> reconcile -> refresh
//!
//! On remote success the provider result is used verbatim and the local
//! score is discarded; on any remote failure the local score is synthesized
//! into a fallback result. The persisted record always exists before the
//! remote call is attempted.

use crate::error::StoreError;
use crate::provider::AnalysisProvider;
use crate::records::RecordStore;
use crate::scorer;
use crate::types::{AnalysisResult, NewReading, RiskLevel, User, VitalsInput, VitalsReading};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

/// The pipeline with its injected collaborators.
pub struct Pipeline {
    store: Arc<dyn RecordStore>,
    provider: Arc<dyn AnalysisProvider>,
    busy: AtomicBool,
    records: RwLock<Vec<VitalsReading>>,
}

impl Pipeline {
    pub fn new(store: Arc<dyn RecordStore>, provider: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            store,
            provider,
            busy: AtomicBool::new(false),
            records: RwLock::new(Vec::new()),
        }
    }

    /// True while a submission is in flight. Callers are expected not to
    /// submit again until it clears; the pipeline itself neither queues
    /// nor rejects concurrent calls.
    pub fn busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// The most recently published record list, most recent first.
    pub fn records(&self) -> Vec<VitalsReading> {
        self.records.read().unwrap().clone()
    }

    /// Re-read and republish the user's record list.
    pub fn refresh_records(&self, user_id: &Uuid) -> Result<(), StoreError> {
        let latest = self.store.records_for(user_id)?;
        *self.records.write().unwrap() = latest;
        Ok(())
    }

    /// Run one reading through the full pipeline.
    ///
    /// Every successful submission yields exactly one `AnalysisResult`;
    /// remote failure is only visible through the result's content. A
    /// persistence failure aborts before remote analysis and propagates.
    pub async fn submit(
        &self,
        user: &User,
        input: VitalsInput,
    ) -> Result<AnalysisResult, StoreError> {
        self.busy.store(true, Ordering::SeqCst);

        // Held as the fallback candidate only, never blended.
        let local_risk = scorer::score(&input);

        let reading = NewReading {
            user_id: user.id,
            age: input.age,
            gender: input.gender,
            heart_rate: input.heart_rate,
            systolic_bp: input.systolic_bp,
            diastolic_bp: input.diastolic_bp,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        // The remote call's input is the persisted record, not the raw
        // input, so this must complete first.
        let record = match self.store.add_record(reading) {
            Ok(record) => record,
            Err(e) => {
                self.busy.store(false, Ordering::SeqCst);
                return Err(e);
            }
        };

        let result = match self.provider.analyze(&record).await {
            Ok(result) => {
                info!("remote analysis accepted for record {}", record.id);
                result
            }
            Err(e) => {
                warn!("remote analysis failed, falling back to local score: {}", e);
                fallback_result(local_risk)
            }
        };

        // The record is durable and the result valid at this point; a
        // failed re-read keeps the previously published list.
        if let Err(e) = self.refresh_records(&user.id) {
            warn!("history refresh failed: {}", e);
        }

        self.busy.store(false, Ordering::SeqCst);
        Ok(result)
    }
}

/// Synthesize a result from the local score when the provider is
/// unavailable. Fires uniformly for every category of remote failure.
fn fallback_result(local_risk: RiskLevel) -> AnalysisResult {
    AnalysisResult {
        risk_level: local_risk,
        summary: "Analyzed with the local deterministic threshold model.".to_string(),
        recommendations: vec![
            "Ensure your device has internet access for full AI insights.".to_string(),
            "Consult a doctor for abnormal readings.".to_string(),
        ],
        anomalies: if local_risk > RiskLevel::Low {
            vec!["Elevated vitals detected by local baseline".to_string()]
        } else {
            Vec::new()
        },
    }
}
