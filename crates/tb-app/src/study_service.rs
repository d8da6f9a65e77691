//! Study loading, validation, and introspection.

use std::path::Path;
use tb_study::schema::Study;

use crate::error::{AppError, AppResult};

/// Summary of a serum sample for listing.
#[derive(Debug, Clone)]
pub struct SampleSummary {
    pub id: String,
    pub animal_id: String,
    pub time_collected_min: Option<f64>,
    pub tracer_count: usize,
    pub measurement_count: usize,
}

/// Load, migrate and validate a study (`.json` as JSON, otherwise YAML).
pub fn load_study(path: &Path) -> AppResult<Study> {
    if !path.exists() {
        return Err(AppError::FileRead {
            what: "study",
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    Ok(tb_study::load(path)?)
}

/// Validate study structure.
pub fn validate_study(study: &Study) -> AppResult<()> {
    tb_study::validate_study(study)?;

    if study.serum_samples.is_empty() {
        return Err(AppError::Validation(
            "Study must have at least one serum sample".to_string(),
        ));
    }

    Ok(())
}

/// List all serum samples in the study with summaries.
pub fn list_samples(study: &Study) -> Vec<SampleSummary> {
    study
        .serum_samples
        .iter()
        .map(|sample| {
            let mut tracers: Vec<&str> = sample
                .measurements
                .iter()
                .map(|m| m.tracer.as_str())
                .collect();
            tracers.sort_unstable();
            tracers.dedup();
            SampleSummary {
                id: sample.id.clone(),
                animal_id: sample.animal_id.clone(),
                time_collected_min: sample.time_collected_min,
                tracer_count: tracers.len(),
                measurement_count: sample.measurements.len(),
            }
        })
        .collect()
}
