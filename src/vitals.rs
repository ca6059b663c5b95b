//! Simulated vitals.
//!
//! The store keeps one baseline reading; every read produces a fresh copy with
//! heart rate and temperature jittered so the UI looks alive.

use crate::models::{BloodPressure, Vitals};
use rand::Rng;

pub const HEART_RATE_RANGE: std::ops::RangeInclusive<u32> = 68..=76;
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 98.2..=98.8;

pub fn baseline() -> Vitals {
    Vitals {
        heart_rate: 72,
        blood_pressure: BloodPressure {
            systolic: 120,
            diastolic: 80,
        },
        temperature: 98.6,
        oxygen_saturation: 98,
        last_updated: chrono::Utc::now(),
    }
}

/// Copy `base` with a random heart rate and temperature, stamped with the current time.
pub fn jitter<R: Rng + ?Sized>(base: &Vitals, rng: &mut R) -> Vitals {
    let temperature = rng.gen_range(TEMPERATURE_RANGE);

    Vitals {
        heart_rate: rng.gen_range(HEART_RATE_RANGE),
        temperature: round_tenth(temperature),
        last_updated: chrono::Utc::now(),
        ..base.clone()
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
