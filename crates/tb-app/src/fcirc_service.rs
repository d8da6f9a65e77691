//! FCirc run execution and caching service.

use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;
use tb_core::units::minutes;
use tb_fcirc::{
    ElementFluxInput, PeakGroupLabeling, SampleFluxInput, SerumValidity, TracerFluxInput,
    assess_serum_validity, compute_batch_fcirc, compute_batch_fcirc_sequential,
};
use tb_results::{FCircRow, RunManifest, RunStore, compute_run_id};
use tb_study::schema::{AnimalDef, MeasurementSource, SerumSampleDef, Study, TracerDef};
use tracing::{debug, info};

use crate::config::FCircConfig;
use crate::error::{AppError, AppResult};
use crate::study_service;

/// Request to compute (or load) the FCirc table of a study.
pub struct FCircRequest<'a> {
    pub study_path: &'a Path,
    pub config: FCircConfig,
}

/// Response from an FCirc run.
#[derive(Debug, Clone)]
pub struct FCircResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub rows: Vec<FCircRow>,
    pub loaded_from_cache: bool,
    pub elapsed_s: f64,
}

/// Compute the study's FCirc table, or load it from the run cache.
pub fn ensure_fcirc_run(request: &FCircRequest) -> AppResult<FCircResponse> {
    let started = Instant::now();
    let config = &request.config;
    config.validate()?;

    let study = study_service::load_study(request.study_path)?;
    study_service::validate_study(&study)?;

    let run_id = compute_run_id(&study, &config.fingerprint(), &config.calculator_version);
    let store = RunStore::for_study(request.study_path)?;

    if config.use_cache && store.has_run(&run_id) {
        info!(%run_id, "loading cached FCirc run");
        let manifest = store.load_manifest(&run_id)?;
        let rows = store.load_rows(&run_id)?;
        return Ok(FCircResponse {
            run_id,
            manifest,
            rows,
            loaded_from_cache: true,
            elapsed_s: started.elapsed().as_secs_f64(),
        });
    }

    let rows = compute_rows(&study, config)?;
    let manifest = RunManifest::new(
        run_id.clone(),
        &study.name,
        &config.calculator_version,
        &rows,
    );
    store.save_run(&manifest, &rows)?;
    info!(
        %run_id,
        records = manifest.record_count,
        failed = manifest.failed_count,
        "FCirc run saved"
    );

    Ok(FCircResponse {
        run_id,
        manifest,
        rows,
        loaded_from_cache: false,
        elapsed_s: started.elapsed().as_secs_f64(),
    })
}

/// One row per (serum sample, tracer, labeled element) of the study.
pub fn compute_rows(study: &Study, config: &FCircConfig) -> AppResult<Vec<FCircRow>> {
    let inputs = build_flux_inputs(study)?;
    let records = if config.parallel {
        compute_batch_fcirc(&inputs)
    } else {
        compute_batch_fcirc_sequential(&inputs)
    };

    let assessed = assess_samples(study, config);
    records
        .iter()
        .map(|record| -> AppResult<FCircRow> {
            let (sample, validity) = assessed
                .get(record.key.serum_sample.as_str())
                .ok_or_else(|| {
                    AppError::Results(format!(
                        "no serum sample '{}' for computed record",
                        record.key.serum_sample
                    ))
                })?;
            Ok(FCircRow::from_record(
                record,
                &sample.animal_id,
                sample.time_collected_min,
                validity,
            ))
        })
        .collect()
}

fn assess_samples<'a>(
    study: &'a Study,
    config: &FCircConfig,
) -> HashMap<&'a str, (&'a SerumSampleDef, SerumValidity)> {
    let threshold = config.steady_state_threshold();
    study
        .serum_samples
        .iter()
        .map(|sample| {
            let peers: Vec<_> = study
                .samples_for_animal(&sample.animal_id)
                .filter(|peer| peer.id != sample.id)
                .map(|peer| peer.time_collected_min.map(minutes))
                .collect();
            let validity =
                assess_serum_validity(sample.time_collected_min.map(minutes), &peers, threshold);
            if !validity.is_valid() {
                debug!(sample = %sample.id, issues = validity.issues.len(), "serum sample flagged");
            }
            (sample.id.as_str(), (sample, validity))
        })
        .collect()
}

/// Gather calculator inputs for every serum sample.
///
/// Every labeled element of every tracer in the animal's infusate gets an
/// entry, measured or not; unmeasured ones surface as missing measurements.
pub fn build_flux_inputs(study: &Study) -> AppResult<Vec<SampleFluxInput>> {
    study
        .serum_samples
        .iter()
        .map(|sample| -> AppResult<SampleFluxInput> {
            let animal = study.animal(&sample.animal_id).ok_or_else(|| {
                AppError::Validation(format!(
                    "serum sample '{}' references unknown animal '{}'",
                    sample.id, sample.animal_id
                ))
            })?;
            let tracers = animal
                .infusate
                .iter()
                .map(|tracer| tracer_input(animal, tracer, sample))
                .collect::<AppResult<Vec<_>>>()?;
            Ok(SampleFluxInput {
                serum_sample: sample.id.clone(),
                body_weight_g: animal.body_weight_g,
                tracers,
            })
        })
        .collect()
}

fn tracer_input(
    animal: &AnimalDef,
    tracer: &TracerDef,
    sample: &SerumSampleDef,
) -> AppResult<TracerFluxInput> {
    let infusion_rate = tracer.infusion_rate.ok_or_else(|| {
        AppError::Validation(format!(
            "animal '{}' tracer '{}' has no infusion rate",
            animal.id, tracer.compound
        ))
    })?;

    let elements = tracer
        .labels
        .iter()
        .map(|label| {
            let measurement = sample
                .measurements
                .iter()
                .find(|m| m.tracer == tracer.compound && m.element == label.element);
            match measurement.map(|m| &m.source) {
                None => ElementFluxInput::fractions(label.element, None, None),
                Some(MeasurementSource::Fractions {
                    fraction,
                    enrichment_fraction,
                }) => ElementFluxInput::fractions(label.element, *fraction, *enrichment_fraction),
                Some(MeasurementSource::PeakGroup {
                    atom_count,
                    isotopomers,
                }) => ElementFluxInput::peak_group(
                    PeakGroupLabeling {
                        element: label.element,
                        atom_count: *atom_count,
                        isotopomers: isotopomers.clone(),
                    },
                    label.count,
                ),
            }
        })
        .collect();

    Ok(TracerFluxInput {
        compound: tracer.compound.clone(),
        infusion_rate,
        tracer_concentration: tracer.concentration,
        elements,
    })
}

/// List cached runs of the study, newest first.
pub fn list_runs(study_path: &Path) -> AppResult<Vec<RunManifest>> {
    let study = study_service::load_study(study_path)?;
    let store = RunStore::for_study(study_path)?;
    Ok(store.list_runs(&study.name)?)
}

/// Load a cached run's manifest and rows.
pub fn load_run(study_path: &Path, run_id: &str) -> AppResult<(RunManifest, Vec<FCircRow>)> {
    let store = RunStore::for_study(study_path)?;
    let manifest = store.load_manifest(run_id)?;
    let rows = store.load_rows(run_id)?;
    Ok((manifest, rows))
}
