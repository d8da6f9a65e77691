//! Circulatory flux for one serum sample, tracer and labeled element.
//!
//! Rates on the intact-tracer basis divide by the intact labeling fraction;
//! the atom-averaged rates divide by the enrichment fraction. Whole-animal
//! rates are the per-gram rates scaled by body weight.

use crate::{FCircError, FCircResult};
use serde::{Deserialize, Serialize};
use tb_core::{ensure_finite, ensure_positive, ensure_unit_interval};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FluxInputs {
    /// nmol/min/g
    pub infusion_rate: f64,
    /// Serum concentration of the tracer, units consistent with `infusion_rate`.
    pub tracer_concentration: f64,
    /// Intact-tracer labeling fraction in serum, (0, 1].
    pub fraction: f64,
    /// Atom-averaged enrichment fraction, (0, 1].
    pub enrichment_fraction: f64,
    /// Body weight in grams; whole-animal rates multiply by exactly this.
    pub body_weight_g: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluxRates {
    pub rd_per_gram: f64,
    pub ra_per_gram: f64,
    pub rd_avg_per_gram: f64,
    pub ra_avg_per_gram: f64,
    pub rd: f64,
    pub ra: f64,
    pub rd_avg: f64,
    pub ra_avg: f64,
}

impl FluxRates {
    /// Field names paired with values, in export order.
    pub fn named_values(&self) -> [(&'static str, f64); 8] {
        [
            ("rd_per_gram", self.rd_per_gram),
            ("ra_per_gram", self.ra_per_gram),
            ("rd_avg_per_gram", self.rd_avg_per_gram),
            ("ra_avg_per_gram", self.ra_avg_per_gram),
            ("rd", self.rd),
            ("ra", self.ra),
            ("rd_avg", self.rd_avg),
            ("ra_avg", self.ra_avg),
        ]
    }
}

/// Compute Rd, Ra, Rd_avg and Ra_avg, per gram and whole animal.
///
/// Inputs are checked in order: infusion rate, tracer concentration, body
/// weight, fraction, enrichment fraction. The first failing check is
/// returned. A zero fraction is `DivisionByZero`; anything else outside
/// (0, 1] is `InvalidInput`.
pub fn compute_fcirc(inputs: &FluxInputs) -> FCircResult<FluxRates> {
    let infusion_rate = ensure_positive(inputs.infusion_rate, "infusion_rate")?;
    let tracer_concentration = ensure_positive(inputs.tracer_concentration, "tracer_concentration")?;
    let body_weight_g = ensure_positive(inputs.body_weight_g, "body_weight_g")?;
    let fraction = ensure_labeling_denominator(inputs.fraction, "fraction")?;
    let enrichment_fraction =
        ensure_labeling_denominator(inputs.enrichment_fraction, "enrichment_fraction")?;

    let rd_per_gram = infusion_rate * tracer_concentration / fraction;
    let ra_per_gram = rd_per_gram - infusion_rate * tracer_concentration;
    // Quadratic in tracer_concentration, as published.
    let rd_avg_per_gram =
        tracer_concentration * infusion_rate * tracer_concentration / enrichment_fraction;
    let ra_avg_per_gram =
        rd_avg_per_gram - infusion_rate * tracer_concentration / enrichment_fraction;

    let rates = FluxRates {
        rd_per_gram,
        ra_per_gram,
        rd_avg_per_gram,
        ra_avg_per_gram,
        rd: rd_per_gram * body_weight_g,
        ra: ra_per_gram * body_weight_g,
        rd_avg: rd_avg_per_gram * body_weight_g,
        ra_avg: ra_avg_per_gram * body_weight_g,
    };

    for (what, value) in rates.named_values() {
        ensure_finite(value, what)
            .map_err(|_| FCircError::invalid(what, format!("computed rate overflowed to {value}")))?;
    }

    Ok(rates)
}

fn ensure_labeling_denominator(value: f64, what: &'static str) -> FCircResult<f64> {
    if value == 0.0 {
        return Err(FCircError::DivisionByZero { what });
    }
    Ok(ensure_unit_interval(value, what)?)
}
