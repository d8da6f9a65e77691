//! Shared application service layer for TraceBase FCirc.
//!
//! Loads studies, gathers calculator inputs for every serum sample, runs the
//! FCirc batch and caches the resulting tables. The CLI is a thin shell over
//! this crate.

pub mod config;
pub mod error;
pub mod fcirc_service;
pub mod query;
pub mod study_service;

pub use config::FCircConfig;
pub use error::{AppError, AppResult};
pub use fcirc_service::{
    FCircRequest, FCircResponse, build_flux_inputs, compute_rows, ensure_fcirc_run, list_runs,
    load_run,
};
pub use query::{RunSummary, summarize_rows};
pub use study_service::{SampleSummary, list_samples, load_study, validate_study};
