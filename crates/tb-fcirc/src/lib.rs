//! tb-fcirc: circulatory flux (FCirc) calculations for isotope-tracing studies.
//!
//! Contains:
//! - calculator (Ra, Rd, Ra_avg, Rd_avg for one sample/tracer/element)
//! - element (labeled element symbols)
//! - labeling (intact and enrichment fractions from isotopomer peak data)
//! - validity (steady-state checks on serum samples)
//! - driver (one record per tracer/element, batch evaluation)

pub mod calculator;
pub mod driver;
pub mod element;
pub mod labeling;
pub mod validity;

pub use calculator::{FluxInputs, FluxRates, compute_fcirc};
pub use driver::{
    ElementFluxInput, FCircKey, FCircRecord, LabelingSource, SampleFluxInput, TracerFluxInput,
    compute_batch_fcirc, compute_batch_fcirc_sequential, compute_sample_fcirc,
};
pub use element::{ElementParseError, LabeledElement};
pub use labeling::{Isotopomer, LabelingFractions, PeakGroupLabeling};
pub use validity::{SerumValidity, ValidityIssue, assess_serum_validity};

use tb_core::TbError;

pub type FCircResult<T> = Result<T, FCircError>;

/// Why a single FCirc triple could not be computed.
///
/// Every variant is scoped to one (sample, tracer, element) computation;
/// batch callers record it and move on.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FCircError {
    #[error("Invalid input: {what} ({detail})")]
    InvalidInput { what: &'static str, detail: String },

    #[error("Division by zero: {what} is zero, rate is not computable")]
    DivisionByZero { what: &'static str },

    #[error("Missing measurement: {what}")]
    MissingMeasurement { what: &'static str },
}

impl FCircError {
    pub fn invalid(what: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidInput {
            what,
            detail: detail.into(),
        }
    }
}

impl From<TbError> for FCircError {
    fn from(err: TbError) -> Self {
        match err {
            TbError::NonFinite { what, value } => {
                Self::invalid(what, format!("non-finite value {value}"))
            }
            TbError::NotPositive { what, value } => {
                Self::invalid(what, format!("must be positive, got {value}"))
            }
            TbError::OutOfUnitInterval { what, value } => {
                Self::invalid(what, format!("must lie within (0, 1], got {value}"))
            }
        }
    }
}
