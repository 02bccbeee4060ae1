use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::report::{AngleUnit, DistanceUnit, ErrorReport};

/// Descriptive statistics of a set of error values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorStatistics {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation, `0` for fewer than two values.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl ErrorStatistics {
    /// Returns `None` if `values` is empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };
        Some(Self {
            count,
            mean,
            std_dev,
            min: sorted[0],
            max: sorted[count - 1],
            median,
        })
    }
}

/// Statistics of one published batch of [`ErrorReport`]s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub stamp: SystemTime,
    pub translation: ErrorStatistics,
    pub rotation: ErrorStatistics,
    pub distance_unit: DistanceUnit,
    pub angle_unit: AngleUnit,
}

impl ErrorSummary {
    /// Returns `None` if `reports` is empty.
    pub fn from_reports(stamp: SystemTime, reports: &[ErrorReport]) -> Option<Self> {
        let first = reports.first()?;
        let translations: Vec<_> = reports.iter().map(|r| r.translation_distance).collect();
        let rotations: Vec<_> = reports.iter().map(|r| r.rotation.magnitude()).collect();
        Some(Self {
            stamp,
            translation: ErrorStatistics::from_values(&translations)?,
            rotation: ErrorStatistics::from_values(&rotations)?,
            distance_unit: first.distance_unit,
            angle_unit: first.angle_unit,
        })
    }
}
