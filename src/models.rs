use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: u32,
    pub diastolic: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    pub heart_rate: u32,
    pub blood_pressure: BloodPressure,
    pub temperature: f64,
    pub oxygen_saturation: u32,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportType {
    #[serde(rename = "Blood Test")]
    BloodTest,
    #[serde(rename = "ECG")]
    Ecg,
    Prescription,
    #[serde(rename = "Medical Report")]
    MedicalReport,
    #[serde(rename = "Voice Report")]
    VoiceReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: i64,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub date: String,
    pub status: String,
    pub summary: String,

    // Uploaded file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_prescription: Option<bool>,

    // Voice transcription
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_voice_report: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complaints: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_transcript: Option<String>,
}

impl Report {
    /// A report with only the common fields set. The id is assigned by the store.
    pub fn new(
        report_type: ReportType,
        date: impl Into<String>,
        status: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            report_type,
            date: date.into(),
            status: status.into(),
            summary: summary.into(),
            file_path: None,
            file_name: None,
            content_type: None,
            file_size: None,
            is_prescription: None,
            is_voice_report: false,
            patient_name: None,
            complaints: None,
            diagnosis: None,
            notes: None,
            prescription: None,
            raw_transcript: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    pub id: i64,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub next_dose: String,
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prescription_report_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Consultation {
    pub id: i64,
    pub doctor: String,
    pub specialty: String,
    pub date: String,
    pub status: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarMood {
    pub mood: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Request / response bodies
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct StructuredData {
    pub patient_name: Option<String>,
    pub complaints: Option<String>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub prescription: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoiceReportRequest {
    pub transcript: Option<String>,
    #[serde(default)]
    pub structured_data: Option<StructuredData>,
}

#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    pub mood: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MoodResponse {
    pub success: bool,
    pub mood: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub report: Report,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication: Option<Medication>,
}

#[derive(Debug, Serialize)]
pub struct VoiceReportResponse {
    pub success: bool,
    pub message: String,
    pub report: Report,
}

#[derive(Debug, Serialize)]
pub struct ReportsResponse {
    pub reports: Vec<Report>,
}

#[derive(Debug, Serialize)]
pub struct MedicationsResponse {
    pub medications: Vec<Medication>,
}

#[derive(Debug, Serialize)]
pub struct ConsultationsResponse {
    pub consultations: Vec<Consultation>,
}

#[derive(Debug, Serialize)]
pub struct HealthSummary {
    pub overall_status: String,
    pub vitals: Vitals,
    pub total_reports: usize,
    pub active_medications: usize,
    pub upcoming_consultations: usize,
    pub avatar_mood: String,
    pub last_updated: DateTime<Utc>,
}
