//! Study validation logic.
//!
//! Checks structure and references only. Numeric values the calculator judges
//! for itself (fractions, rates, concentrations) are left for it to report per
//! sample, tracer and element.

use crate::schema::{AnimalDef, MeasurementSource, SerumSampleDef, Study};
use std::collections::{HashMap, HashSet};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_study(study: &Study) -> Result<(), ValidationError> {
    if study.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: study.version,
        });
    }

    let mut animals: HashMap<&str, &AnimalDef> = HashMap::new();
    for animal in &study.animals {
        if animals.insert(animal.id.as_str(), animal).is_some() {
            return Err(ValidationError::DuplicateId {
                id: animal.id.clone(),
                context: "animals".to_string(),
            });
        }
        validate_animal(animal)?;
    }

    let mut sample_ids = HashSet::new();
    for sample in &study.serum_samples {
        if !sample_ids.insert(&sample.id) {
            return Err(ValidationError::DuplicateId {
                id: sample.id.clone(),
                context: "serum_samples".to_string(),
            });
        }
        let animal = animals.get(sample.animal_id.as_str()).ok_or_else(|| {
            ValidationError::MissingReference {
                id: sample.animal_id.clone(),
                context: format!("serum sample '{}' animal_id", sample.id),
            }
        })?;
        validate_sample(sample, animal)?;
    }

    Ok(())
}

fn validate_animal(animal: &AnimalDef) -> Result<(), ValidationError> {
    if !animal.body_weight_g.is_finite() || animal.body_weight_g <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: format!("animal '{}' body_weight_g", animal.id),
            value: animal.body_weight_g.to_string(),
            reason: "must be positive and finite".to_string(),
        });
    }

    let mut compounds = HashSet::new();
    for tracer in &animal.infusate {
        if !compounds.insert(&tracer.compound) {
            return Err(ValidationError::DuplicateId {
                id: tracer.compound.clone(),
                context: format!("animal '{}' infusate", animal.id),
            });
        }

        if tracer.infusion_rate.is_none() {
            return Err(ValidationError::InvalidValue {
                field: format!("animal '{}' tracer '{}' infusion_rate", animal.id, tracer.compound),
                value: "none".to_string(),
                reason: "every tracer needs an infusion rate".to_string(),
            });
        }

        let mut elements = HashSet::new();
        for label in &tracer.labels {
            if !elements.insert(label.element) {
                return Err(ValidationError::DuplicateId {
                    id: label.element.to_string(),
                    context: format!("tracer '{}' labels", tracer.compound),
                });
            }
            if label.count == 0 {
                return Err(ValidationError::InvalidValue {
                    field: format!("tracer '{}' {} label count", tracer.compound, label.element),
                    value: label.count.to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        }
    }

    Ok(())
}

fn validate_sample(sample: &SerumSampleDef, animal: &AnimalDef) -> Result<(), ValidationError> {
    if let Some(t) = sample.time_collected_min {
        if !t.is_finite() || t < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("serum sample '{}' time_collected_min", sample.id),
                value: t.to_string(),
                reason: "must be finite and non-negative".to_string(),
            });
        }
    }

    let mut seen = HashSet::new();
    for m in &sample.measurements {
        let context = format!("serum sample '{}' measurement", sample.id);
        let tracer = animal
            .tracer(&m.tracer)
            .ok_or_else(|| ValidationError::MissingReference {
                id: m.tracer.clone(),
                context: format!("{context} tracer (animal '{}' infusate)", animal.id),
            })?;
        let Some(label_count) = tracer.label_count(m.element) else {
            return Err(ValidationError::MissingReference {
                id: m.element.to_string(),
                context: format!("{context} element (tracer '{}' labels)", tracer.compound),
            });
        };
        if !seen.insert((m.tracer.as_str(), m.element)) {
            return Err(ValidationError::DuplicateId {
                id: format!("{} {}", m.tracer, m.element),
                context: format!("serum sample '{}' measurements", sample.id),
            });
        }

        if let MeasurementSource::PeakGroup { atom_count, .. } = &m.source {
            if label_count > *atom_count {
                return Err(ValidationError::InvalidValue {
                    field: format!("{context} {} {} atom_count", m.tracer, m.element),
                    value: atom_count.to_string(),
                    reason: format!("tracer labels {label_count} atoms"),
                });
            }
        }
    }

    Ok(())
}
