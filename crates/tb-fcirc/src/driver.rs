//! One FCirc record per (serum sample, tracer, labeled element).
//!
//! Records are never merged across elements or tracers. Within a sample they
//! are ordered by tracer compound, then element; batches keep sample order.

use crate::calculator::{FluxInputs, FluxRates, compute_fcirc};
use crate::element::LabeledElement;
use crate::labeling::{LabelingFractions, PeakGroupLabeling};
use crate::{FCircError, FCircResult};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use tracing::{debug, warn};

/// Where a tracer element's labeling fractions come from.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelingSource {
    Fractions {
        fraction: Option<f64>,
        enrichment_fraction: Option<f64>,
    },
    /// Derived here, so derivation failures stay scoped to this element.
    PeakGroup {
        peak_group: PeakGroupLabeling,
        tracer_label_count: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementFluxInput {
    pub element: LabeledElement,
    pub labeling: LabelingSource,
}

impl ElementFluxInput {
    pub fn fractions(
        element: LabeledElement,
        fraction: Option<f64>,
        enrichment_fraction: Option<f64>,
    ) -> Self {
        Self {
            element,
            labeling: LabelingSource::Fractions {
                fraction,
                enrichment_fraction,
            },
        }
    }

    pub fn peak_group(peak_group: PeakGroupLabeling, tracer_label_count: u32) -> Self {
        Self {
            element: peak_group.element,
            labeling: LabelingSource::PeakGroup {
                peak_group,
                tracer_label_count,
            },
        }
    }

    /// The calculator denominators, from the measurement or its peak group.
    pub fn labeling_fractions(&self) -> FCircResult<LabelingFractions> {
        match &self.labeling {
            LabelingSource::Fractions {
                fraction,
                enrichment_fraction,
            } => Ok(LabelingFractions {
                fraction: fraction.ok_or(FCircError::MissingMeasurement { what: "fraction" })?,
                enrichment_fraction: enrichment_fraction.ok_or(
                    FCircError::MissingMeasurement {
                        what: "enrichment_fraction",
                    },
                )?,
            }),
            LabelingSource::PeakGroup {
                peak_group,
                tracer_label_count,
            } => {
                if peak_group.element != self.element {
                    return Err(FCircError::invalid(
                        "peak group",
                        format!(
                            "labels {} but the measurement is for {}",
                            peak_group.element, self.element
                        ),
                    ));
                }
                peak_group.labeling_fractions(*tracer_label_count)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TracerFluxInput {
    pub compound: String,
    pub infusion_rate: f64,
    pub tracer_concentration: f64,
    pub elements: Vec<ElementFluxInput>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleFluxInput {
    pub serum_sample: String,
    pub body_weight_g: f64,
    pub tracers: Vec<TracerFluxInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FCircKey {
    pub serum_sample: String,
    pub tracer: String,
    pub element: LabeledElement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FCircRecord {
    pub key: FCircKey,
    pub outcome: FCircResult<FluxRates>,
}

impl FCircRecord {
    pub fn rates(&self) -> Option<&FluxRates> {
        self.outcome.as_ref().ok()
    }

    pub fn error(&self) -> Option<&FCircError> {
        self.outcome.as_ref().err()
    }
}

enum Slot<'a> {
    Single(&'a TracerFluxInput, &'a ElementFluxInput),
    Duplicate,
}

/// Compute every tracer/element combination of one serum sample.
pub fn compute_sample_fcirc(sample: &SampleFluxInput) -> Vec<FCircRecord> {
    let mut slots: BTreeMap<(&str, LabeledElement), Slot<'_>> = BTreeMap::new();
    for tracer in &sample.tracers {
        for measurement in &tracer.elements {
            match slots.entry((tracer.compound.as_str(), measurement.element)) {
                Entry::Vacant(v) => {
                    v.insert(Slot::Single(tracer, measurement));
                }
                Entry::Occupied(mut o) => {
                    o.insert(Slot::Duplicate);
                }
            }
        }
    }

    slots
        .into_iter()
        .map(|((compound, element), slot)| {
            let outcome = match slot {
                Slot::Single(tracer, measurement) => {
                    compute_triple(sample.body_weight_g, tracer, measurement)
                }
                Slot::Duplicate => Err(FCircError::invalid(
                    "measurement",
                    "duplicate tracer/element measurement for sample",
                )),
            };
            if let Err(err) = &outcome {
                warn!(
                    sample = %sample.serum_sample,
                    tracer = compound,
                    element = %element,
                    "FCirc not computable: {err}"
                );
            }
            FCircRecord {
                key: FCircKey {
                    serum_sample: sample.serum_sample.clone(),
                    tracer: compound.to_string(),
                    element,
                },
                outcome,
            }
        })
        .collect()
}

fn compute_triple(
    body_weight_g: f64,
    tracer: &TracerFluxInput,
    measurement: &ElementFluxInput,
) -> FCircResult<FluxRates> {
    let LabelingFractions {
        fraction,
        enrichment_fraction,
    } = measurement.labeling_fractions()?;
    compute_fcirc(&FluxInputs {
        infusion_rate: tracer.infusion_rate,
        tracer_concentration: tracer.tracer_concentration,
        fraction,
        enrichment_fraction,
        body_weight_g,
    })
}

/// Evaluate samples in parallel; output order matches input sample order.
pub fn compute_batch_fcirc(samples: &[SampleFluxInput]) -> Vec<FCircRecord> {
    debug!(samples = samples.len(), "computing FCirc batch (parallel)");
    let per_sample: Vec<Vec<FCircRecord>> = samples.par_iter().map(compute_sample_fcirc).collect();
    per_sample.into_iter().flatten().collect()
}

pub fn compute_batch_fcirc_sequential(samples: &[SampleFluxInput]) -> Vec<FCircRecord> {
    debug!(samples = samples.len(), "computing FCirc batch (sequential)");
    samples.iter().flat_map(compute_sample_fcirc).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(element: LabeledElement, fraction: f64, enrichment: f64) -> ElementFluxInput {
        ElementFluxInput::fractions(element, Some(fraction), Some(enrichment))
    }

    fn tracer(compound: &str, elements: Vec<ElementFluxInput>) -> TracerFluxInput {
        TracerFluxInput {
            compound: compound.to_string(),
            infusion_rate: 10.0,
            tracer_concentration: 2.0,
            elements,
        }
    }

    #[test]
    fn two_elements_give_two_records() {
        let sample = SampleFluxInput {
            serum_sample: "s1".to_string(),
            body_weight_g: 20.0,
            tracers: vec![tracer(
                "glutamine",
                vec![
                    element(LabeledElement::N, 0.4, 0.3),
                    element(LabeledElement::C, 0.5, 0.25),
                ],
            )],
        };
        let records = compute_sample_fcirc(&sample);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].key.element, LabeledElement::C);
        assert_eq!(records[1].key.element, LabeledElement::N);
        assert_ne!(records[0].rates(), records[1].rates());
    }

    #[test]
    fn order_is_tracer_then_element() {
        let sample = SampleFluxInput {
            serum_sample: "s1".to_string(),
            body_weight_g: 20.0,
            tracers: vec![
                tracer("valine", vec![element(LabeledElement::C, 0.5, 0.5)]),
                tracer(
                    "glutamine",
                    vec![
                        element(LabeledElement::N, 0.5, 0.5),
                        element(LabeledElement::C, 0.5, 0.5),
                    ],
                ),
            ],
        };
        let keys: Vec<(String, LabeledElement)> = compute_sample_fcirc(&sample)
            .into_iter()
            .map(|r| (r.key.tracer, r.key.element))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("glutamine".to_string(), LabeledElement::C),
                ("glutamine".to_string(), LabeledElement::N),
                ("valine".to_string(), LabeledElement::C),
            ]
        );
    }

    #[test]
    fn failures_do_not_abort_the_sample() {
        let sample = SampleFluxInput {
            serum_sample: "s1".to_string(),
            body_weight_g: 20.0,
            tracers: vec![
                tracer("alanine", vec![element(LabeledElement::C, 0.0, 0.2)]),
                tracer(
                    "glucose",
                    vec![ElementFluxInput::fractions(
                        LabeledElement::C,
                        Some(0.5),
                        None,
                    )],
                ),
                tracer("lactate", vec![element(LabeledElement::C, 0.5, 0.25)]),
            ],
        };
        let records = compute_sample_fcirc(&sample);
        assert_eq!(records.len(), 3);
        assert!(matches!(
            records[0].error(),
            Some(FCircError::DivisionByZero { what: "fraction" })
        ));
        assert!(matches!(
            records[1].error(),
            Some(FCircError::MissingMeasurement {
                what: "enrichment_fraction"
            })
        ));
        assert!(records[2].rates().is_some());
    }

    #[test]
    fn duplicate_measurements_collapse_to_one_error_record() {
        let sample = SampleFluxInput {
            serum_sample: "s1".to_string(),
            body_weight_g: 20.0,
            tracers: vec![tracer(
                "glucose",
                vec![
                    element(LabeledElement::C, 0.5, 0.25),
                    element(LabeledElement::C, 0.6, 0.3),
                ],
            )],
        };
        let records = compute_sample_fcirc(&sample);
        assert_eq!(records.len(), 1);
        assert!(matches!(
            records[0].error(),
            Some(FCircError::InvalidInput { .. })
        ));
    }

    #[test]
    fn peak_group_errors_stay_with_their_element() {
        use crate::labeling::Isotopomer;

        let carbon = PeakGroupLabeling {
            element: LabeledElement::C,
            atom_count: 5,
            isotopomers: vec![Isotopomer {
                labeled_count: 0,
                corrected_abundance: 0.0,
            }],
        };
        let sample = SampleFluxInput {
            serum_sample: "s1".to_string(),
            body_weight_g: 20.0,
            tracers: vec![tracer(
                "glutamine",
                vec![
                    ElementFluxInput::peak_group(carbon, 5),
                    element(LabeledElement::N, 0.5, 0.25),
                ],
            )],
        };
        let records = compute_sample_fcirc(&sample);
        assert_eq!(records.len(), 2);
        assert!(matches!(
            records[0].error(),
            Some(FCircError::DivisionByZero { .. })
        ));
        assert!(records[1].rates().is_some());
    }

    #[test]
    fn mismatched_peak_group_element_is_invalid() {
        let nitrogen = PeakGroupLabeling {
            element: LabeledElement::N,
            atom_count: 2,
            isotopomers: vec![],
        };
        let mut input = ElementFluxInput::peak_group(nitrogen, 2);
        input.element = LabeledElement::C;
        assert!(matches!(
            input.labeling_fractions(),
            Err(FCircError::InvalidInput { .. })
        ));
    }

    #[test]
    fn parallel_batch_matches_sequential() {
        let samples: Vec<SampleFluxInput> = (0..32)
            .map(|i| SampleFluxInput {
                serum_sample: format!("s{i:02}"),
                body_weight_g: 18.0 + i as f64,
                tracers: vec![
                    tracer("glucose", vec![element(LabeledElement::C, 0.5, 0.25)]),
                    tracer(
                        "glutamine",
                        vec![
                            element(LabeledElement::C, 0.3, 0.2),
                            element(LabeledElement::N, 0.0, 0.2),
                        ],
                    ),
                ],
            })
            .collect();
        let parallel = compute_batch_fcirc(&samples);
        let sequential = compute_batch_fcirc_sequential(&samples);
        assert_eq!(parallel.len(), 96);
        assert_eq!(parallel, sequential);
        assert_eq!(parallel[0].key.serum_sample, "s00");
        assert_eq!(parallel[95].key.serum_sample, "s31");
    }
}
