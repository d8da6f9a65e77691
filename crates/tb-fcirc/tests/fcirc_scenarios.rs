use tb_core::{Tolerances, nearly_equal};
use tb_fcirc::*;

fn close(a: f64, b: f64) -> bool {
    nearly_equal(a, b, Tolerances::default())
}

#[test]
fn documented_scenario_through_the_driver() {
    let sample = SampleFluxInput {
        serum_sample: "serum-1".to_string(),
        body_weight_g: 20.0,
        tracers: vec![TracerFluxInput {
            compound: "lactate".to_string(),
            infusion_rate: 10.0,
            tracer_concentration: 2.0,
            elements: vec![ElementFluxInput::fractions(
                LabeledElement::C,
                Some(0.5),
                Some(0.25),
            )],
        }],
    };

    let records = compute_sample_fcirc(&sample);
    assert_eq!(records.len(), 1);
    let rates = records[0].rates().expect("rates should compute");
    assert_eq!(rates.rd_per_gram, 40.0);
    assert_eq!(rates.ra_per_gram, 20.0);
    assert_eq!(rates.rd_avg_per_gram, 160.0);
    assert_eq!(rates.ra_avg_per_gram, 80.0);
    assert_eq!(rates.rd, 800.0);
    assert_eq!(rates.ra, 400.0);
    assert_eq!(rates.rd_avg, 3200.0);
    assert_eq!(rates.ra_avg, 1600.0);
}

#[test]
fn whole_animal_rates_are_exact_multiples_of_body_weight() {
    let mut mismatches = Vec::new();
    for step in 1..=2000 {
        let bw = f64::from(step) / 10.0;
        let sample = SampleFluxInput {
            serum_sample: format!("serum-{step}"),
            body_weight_g: bw,
            tracers: vec![TracerFluxInput {
                compound: "lactate".to_string(),
                infusion_rate: 10.0,
                tracer_concentration: 2.0,
                elements: vec![ElementFluxInput::fractions(
                    LabeledElement::C,
                    Some(0.5),
                    Some(0.25),
                )],
            }],
        };
        let records = compute_sample_fcirc(&sample);
        let rates = records[0].rates().unwrap();
        if rates.rd != rates.rd_per_gram * bw
            || rates.ra != rates.ra_per_gram * bw
            || rates.rd_avg != rates.rd_avg_per_gram * bw
            || rates.ra_avg != rates.ra_avg_per_gram * bw
        {
            mismatches.push(bw);
        }
    }
    assert!(mismatches.is_empty(), "inexact at {mismatches:?}");
}

#[test]
fn peak_group_labeling_feeds_the_calculator() {
    let carbon = PeakGroupLabeling {
        element: LabeledElement::C,
        atom_count: 5,
        isotopomers: vec![
            Isotopomer {
                labeled_count: 0,
                corrected_abundance: 600.0,
            },
            Isotopomer {
                labeled_count: 5,
                corrected_abundance: 400.0,
            },
        ],
    };
    let nitrogen = PeakGroupLabeling {
        element: LabeledElement::N,
        atom_count: 2,
        isotopomers: vec![
            Isotopomer {
                labeled_count: 0,
                corrected_abundance: 500.0,
            },
            Isotopomer {
                labeled_count: 2,
                corrected_abundance: 500.0,
            },
        ],
    };

    let elements = vec![
        ElementFluxInput::peak_group(nitrogen, 2),
        ElementFluxInput::peak_group(carbon, 5),
    ];

    let sample = SampleFluxInput {
        serum_sample: "serum-2".to_string(),
        body_weight_g: 25.0,
        tracers: vec![TracerFluxInput {
            compound: "glutamine".to_string(),
            infusion_rate: 0.1,
            tracer_concentration: 100.0,
            elements,
        }],
    };

    let records = compute_sample_fcirc(&sample);
    assert_eq!(records.len(), 2, "one record per labeled element");
    let c = records[0].rates().unwrap();
    let n = records[1].rates().unwrap();
    // C: fraction 0.4, N: fraction 0.5
    assert!(close(c.rd_per_gram, 0.1 * 100.0 / 0.4));
    assert!(close(n.rd_per_gram, 0.1 * 100.0 / 0.5));
}
