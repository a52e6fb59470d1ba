//! Local deterministic risk scorer.
//!
//! Additive weighted scoring over standard heart-disease risk thresholds,
//! then bucketing into the three risk levels. Pure and total: defined for
//! every input, no side effects, no failure modes.

use crate::types::{RiskLevel, VitalsInput};

/// Score a raw vitals reading.
///
/// The blood-pressure and heart-rate branch chains are mutually exclusive,
/// most severe first; the two age clauses are additive and may co-apply.
/// The threshold table shown to users documents the same boundaries, so the
/// branch order must not change.
pub fn score(vitals: &VitalsInput) -> RiskLevel {
    let mut risk_score = 0u32;

    // Blood pressure weighting
    if vitals.systolic_bp >= 160 || vitals.diastolic_bp >= 100 {
        risk_score += 3;
    } else if vitals.systolic_bp >= 140 || vitals.diastolic_bp >= 90 {
        risk_score += 2;
    } else if vitals.systolic_bp >= 130 || vitals.diastolic_bp >= 85 {
        risk_score += 1;
    }

    // Heart rate weighting (tachycardia / bradycardia)
    if vitals.heart_rate > 120 || vitals.heart_rate < 50 {
        risk_score += 2;
    } else if vitals.heart_rate > 100 || vitals.heart_rate < 60 {
        risk_score += 1;
    }

    // Age factor
    if vitals.age > 65 {
        risk_score += 1;
    }
    if vitals.age > 50 && vitals.systolic_bp > 130 {
        risk_score += 1;
    }

    if risk_score >= 4 {
        RiskLevel::High
    } else if risk_score >= 2 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
