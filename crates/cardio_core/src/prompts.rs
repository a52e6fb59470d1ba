//! Fixed directives and prompt builders for the remote analysis provider.

use crate::types::VitalsReading;

/// System directive sent with every analysis request. The provider must
/// answer with a JSON object carrying exactly the four result fields.
pub const SYSTEM_PROMPT: &str = "\
You are an expert cardiovascular health analysis AI integrated into an academic research project.
Your goal is to analyze patient vitals and categorize cardiovascular risk.

IMPORTANT: This is for educational purposes only. You must include a disclaimer that this is NOT a medical diagnosis.

Input: Age, Gender, Heart Rate (BPM), Systolic BP, Diastolic BP.
Output: JSON format only.

Return an object with:
- riskLevel: number (0 for Low Risk, 1 for Medium Risk, 2 for High Risk)
- summary: A brief explanation of the risk assessment.
- recommendations: An array of 3 actionable health tips based on the data.
- anomalies: An array of any identified irregular patterns (e.g., \"Tachycardia detected\", \"Stage 1 Hypertension\").

Risk Criteria Guidance:
- Low (0): HR 60-100, BP < 120/80
- Medium (1): Elevated HR (>100 or <60), BP 120-139/80-89
- High (2): HR > 120, BP >= 140/90 or extreme values.
";

/// Natural-language description of a persisted reading, used as the user
/// message of the analysis request.
pub fn describe_reading(reading: &VitalsReading) -> String {
    format!(
        "Analyze the following data:\n\
         Age: {}\n\
         Gender: {}\n\
         Heart Rate: {} BPM\n\
         Blood Pressure: {}/{} mmHg",
        reading.age,
        reading.gender,
        reading.heart_rate,
        reading.systolic_bp,
        reading.diastolic_bp
    )
}
