//! In-memory health record store.
//!
//! Everything lives in process memory and is re-seeded on restart. Lists are
//! append-only; ids come from per-list atomic counters so concurrent writers
//! never hand out the same id.

use crate::models::{
    AvatarMood, Consultation, HealthSummary, Medication, Report, ReportType, Vitals,
};
use crate::vitals;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

pub const DEFAULT_MOOD: &str = "calm";

pub struct HealthStore {
    baseline: Vitals,
    reports: RwLock<Vec<Report>>,
    medications: RwLock<Vec<Medication>>,
    consultations: RwLock<Vec<Consultation>>,
    mood: RwLock<AvatarMood>,
    next_report_id: AtomicI64,
    next_medication_id: AtomicI64,
}

impl HealthStore {
    /// Store populated with the demo patient's records.
    pub fn seeded() -> Self {
        Self::with_records(seed_reports(), seed_medications(), seed_consultations())
    }

    pub fn with_records(
        reports: Vec<Report>,
        medications: Vec<Medication>,
        consultations: Vec<Consultation>,
    ) -> Self {
        let next_report_id = reports.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let next_medication_id = medications.iter().map(|m| m.id).max().unwrap_or(0) + 1;

        Self {
            baseline: vitals::baseline(),
            reports: RwLock::new(reports),
            medications: RwLock::new(medications),
            consultations: RwLock::new(consultations),
            mood: RwLock::new(AvatarMood {
                mood: DEFAULT_MOOD.to_string(),
                timestamp: Utc::now(),
            }),
            next_report_id: AtomicI64::new(next_report_id),
            next_medication_id: AtomicI64::new(next_medication_id),
        }
    }

    /// Fresh jittered reading. The baseline itself is left untouched.
    pub fn vitals(&self) -> Vitals {
        vitals::jitter(&self.baseline, &mut rand::thread_rng())
    }

    pub async fn reports(&self) -> Vec<Report> {
        self.reports.read().await.clone()
    }

    pub async fn report(&self, id: i64) -> Option<Report> {
        self.reports.read().await.iter().find(|r| r.id == id).cloned()
    }

    /// Assign the next id to `report`, append it and return the stored copy.
    ///
    /// The id is taken under the write lock so list order matches id order.
    pub async fn add_report(&self, mut report: Report) -> Report {
        let mut reports = self.reports.write().await;
        report.id = self.next_report_id.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            "Adding report {} ({:?}): {}",
            report.id,
            report.report_type,
            report.summary
        );
        reports.push(report.clone());
        report
    }

    pub async fn medications(&self) -> Vec<Medication> {
        self.medications.read().await.clone()
    }

    pub async fn add_medication(&self, mut medication: Medication) -> Medication {
        let mut medications = self.medications.write().await;
        medication.id = self.next_medication_id.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Adding medication {}: {}", medication.id, medication.name);
        medications.push(medication.clone());
        medication
    }

    pub async fn consultations(&self) -> Vec<Consultation> {
        self.consultations.read().await.clone()
    }

    pub async fn mood(&self) -> AvatarMood {
        self.mood.read().await.clone()
    }

    pub async fn set_mood(&self, mood: String) -> AvatarMood {
        let mut current = self.mood.write().await;
        tracing::info!("Avatar mood: {} -> {}", current.mood, mood);
        *current = AvatarMood {
            mood,
            timestamp: Utc::now(),
        };
        current.clone()
    }

    pub async fn summary(&self) -> HealthSummary {
        let vitals = self.vitals();
        let total_reports = self.reports.read().await.len();
        let active_medications = self
            .medications
            .read()
            .await
            .iter()
            .filter(|m| m.status == "Active")
            .count();
        let upcoming_consultations = self
            .consultations
            .read()
            .await
            .iter()
            .filter(|c| c.status == "Scheduled")
            .count();
        let avatar_mood = self.mood.read().await.mood.clone();

        HealthSummary {
            overall_status: "Good".to_string(),
            vitals,
            total_reports,
            active_medications,
            upcoming_consultations,
            avatar_mood,
            last_updated: Utc::now(),
        }
    }
}

// ============================================================================
// Seed data
// ============================================================================

fn seed_reports() -> Vec<Report> {
    let mut blood = Report::new(
        ReportType::BloodTest,
        "2024-01-15",
        "Normal",
        "Complete blood count within normal ranges",
    );
    blood.id = 1;

    let mut ecg = Report::new(
        ReportType::Ecg,
        "2024-01-10",
        "Normal",
        "Normal sinus rhythm, no abnormalities detected",
    );
    ecg.id = 2;

    let mut prescription = Report::new(
        ReportType::Prescription,
        "2024-01-05",
        "Active",
        "Vitamin D supplement, 1000 IU daily",
    );
    prescription.id = 3;

    vec![blood, ecg, prescription]
}

fn seed_medications() -> Vec<Medication> {
    vec![
        Medication {
            id: 1,
            name: "Vitamin D".to_string(),
            dosage: "1000 IU".to_string(),
            frequency: "Once daily".to_string(),
            next_dose: "08:00 AM".to_string(),
            status: "Active".to_string(),
            prescription_file: None,
            prescription_report_id: None,
            added_date: None,
        },
        Medication {
            id: 2,
            name: "Omega-3".to_string(),
            dosage: "500 mg".to_string(),
            frequency: "Twice daily".to_string(),
            next_dose: "12:00 PM".to_string(),
            status: "Active".to_string(),
            prescription_file: None,
            prescription_report_id: None,
            added_date: None,
        },
    ]
}

fn seed_consultations() -> Vec<Consultation> {
    vec![
        Consultation {
            id: 1,
            doctor: "Dr. Sarah Johnson".to_string(),
            specialty: "General Physician".to_string(),
            date: "2024-01-20".to_string(),
            status: "Scheduled".to_string(),
            notes: "Annual health checkup".to_string(),
        },
        Consultation {
            id: 2,
            doctor: "Dr. Michael Chen".to_string(),
            specialty: "Cardiologist".to_string(),
            date: "2024-01-10".to_string(),
            status: "Completed".to_string(),
            notes: "ECG review, all normal".to_string(),
        },
        Consultation {
            id: 3,
            doctor: "Dr. Priya Patel".to_string(),
            specialty: "Nutritionist".to_string(),
            date: "2024-02-02".to_string(),
            status: "Scheduled".to_string(),
            notes: "Diet plan follow-up".to_string(),
        },
    ]
}
