//! Result data types.

use serde::{Deserialize, Serialize};
use tb_fcirc::{FCircRecord, LabeledElement, SerumValidity};

pub type RunId = String;

pub const STATUS_OK: &str = "ok";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunManifest {
    pub run_id: RunId,
    pub study_name: String,
    pub timestamp: String,
    pub calculator_version: String,
    pub record_count: usize,
    pub failed_count: usize,
}

impl RunManifest {
    /// Manifest stamped with the current UTC time.
    pub fn new(
        run_id: RunId,
        study_name: &str,
        calculator_version: &str,
        rows: &[FCircRow],
    ) -> Self {
        Self {
            run_id,
            study_name: study_name.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            calculator_version: calculator_version.to_string(),
            record_count: rows.len(),
            failed_count: rows.iter().filter(|r| !r.is_ok()).count(),
        }
    }
}

/// Flat, export-ready FCirc record.
///
/// Rates are `None` when the triple was not computable; `status` then holds
/// the reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FCircRow {
    pub serum_sample: String,
    pub animal: String,
    pub tracer: String,
    pub element: LabeledElement,
    #[serde(default)]
    pub time_collected_min: Option<f64>,
    pub rd_per_gram: Option<f64>,
    pub ra_per_gram: Option<f64>,
    pub rd_avg_per_gram: Option<f64>,
    pub ra_avg_per_gram: Option<f64>,
    pub rd: Option<f64>,
    pub ra: Option<f64>,
    pub rd_avg: Option<f64>,
    pub ra_avg: Option<f64>,
    pub status: String,
    pub is_last: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub validity_issues: Vec<String>,
}

impl FCircRow {
    pub fn from_record(
        record: &FCircRecord,
        animal: &str,
        time_collected_min: Option<f64>,
        validity: &SerumValidity,
    ) -> Self {
        let rates = record.rates();
        Self {
            serum_sample: record.key.serum_sample.clone(),
            animal: animal.to_string(),
            tracer: record.key.tracer.clone(),
            element: record.key.element,
            time_collected_min,
            rd_per_gram: rates.map(|r| r.rd_per_gram),
            ra_per_gram: rates.map(|r| r.ra_per_gram),
            rd_avg_per_gram: rates.map(|r| r.rd_avg_per_gram),
            ra_avg_per_gram: rates.map(|r| r.ra_avg_per_gram),
            rd: rates.map(|r| r.rd),
            ra: rates.map(|r| r.ra),
            rd_avg: rates.map(|r| r.rd_avg),
            ra_avg: rates.map(|r| r.ra_avg),
            status: match record.error() {
                Some(err) => err.to_string(),
                None => STATUS_OK.to_string(),
            },
            is_last: validity.is_last,
            validity_issues: validity.issues.iter().map(|i| i.to_string()).collect(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    /// The eight rates in export order.
    pub fn rates(&self) -> [Option<f64>; 8] {
        [
            self.rd_per_gram,
            self.ra_per_gram,
            self.rd_avg_per_gram,
            self.ra_avg_per_gram,
            self.rd,
            self.ra,
            self.rd_avg,
            self.ra_avg,
        ]
    }
}
