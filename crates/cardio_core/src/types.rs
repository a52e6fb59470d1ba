//! Core data model: vitals readings, risk levels, analysis results, users.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Self-reported gender, as collected by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("unknown gender '{}' (male/female/other)", s)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
            Gender::Other => write!(f, "other"),
        }
    }
}

/// Ordered cardiovascular risk classification.
///
/// The ordering is total: `Low < Medium < High`. Any code path deriving a
/// level from vitals must be monotonic — worsening a single vital while
/// holding the others fixed never lowers the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskLevel {
    Low = 0,
    Medium = 1,
    High = 2,
}

impl RiskLevel {
    /// Wire value used by the remote provider contract (0/1/2).
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for RiskLevel {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RiskLevel::Low),
            1 => Ok(RiskLevel::Medium),
            2 => Ok(RiskLevel::High),
            other => Err(other),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low Risk"),
            RiskLevel::Medium => write!(f, "Medium Risk"),
            RiskLevel::High => write!(f, "High Risk"),
        }
    }
}

/// Raw vitals as accepted at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VitalsInput {
    pub age: u32,
    pub gender: Gender,
    /// Heart rate in BPM.
    pub heart_rate: u32,
    /// Systolic blood pressure in mmHg.
    pub systolic_bp: u32,
    /// Diastolic blood pressure in mmHg.
    pub diastolic_bp: u32,
}

/// A vitals reading before the store has assigned it an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReading {
    pub user_id: Uuid,
    pub age: u32,
    pub gender: Gender,
    pub heart_rate: u32,
    pub systolic_bp: u32,
    pub diastolic_bp: u32,
    /// Epoch milliseconds at submission time.
    pub timestamp: i64,
}

/// A persisted vitals reading. Immutable once created; the id is assigned
/// by the record store and is unique within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsReading {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: u32,
    pub gender: Gender,
    pub heart_rate: u32,
    pub systolic_bp: u32,
    pub diastolic_bp: u32,
    pub timestamp: i64,
}

/// The single result the rest of the system consumes for a reading.
///
/// Built fresh per submission, never persisted, never mutated after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub risk_level: RiskLevel,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub anomalies: Vec<String>,
}

/// An authenticated user, with credential material already stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Unique, case-sensitive.
    pub username: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
}
