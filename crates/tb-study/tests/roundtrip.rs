use tb_fcirc::{Isotopomer, LabeledElement};
use tb_study::schema::*;
use tb_study::{load_json, load_yaml, save_json, save_yaml, validate_study};

fn sample_study() -> Study {
    Study {
        version: 2,
        name: "Roundtrip Study".to_string(),
        animals: vec![AnimalDef {
            id: "a1".to_string(),
            body_weight_g: 24.0,
            infusion_rate: None,
            infusate: vec![TracerDef {
                compound: "glutamine".to_string(),
                concentration: 150.0,
                infusion_rate: Some(0.08),
                labels: vec![
                    LabelDef {
                        element: LabeledElement::C,
                        count: 5,
                    },
                    LabelDef {
                        element: LabeledElement::N,
                        count: 2,
                    },
                ],
            }],
        }],
        serum_samples: vec![SerumSampleDef {
            id: "s1".to_string(),
            animal_id: "a1".to_string(),
            time_collected_min: Some(150.0),
            measurements: vec![
                MeasurementDef {
                    tracer: "glutamine".to_string(),
                    element: LabeledElement::C,
                    source: MeasurementSource::Fractions {
                        fraction: Some(0.25),
                        enrichment_fraction: Some(0.4),
                    },
                },
                MeasurementDef {
                    tracer: "glutamine".to_string(),
                    element: LabeledElement::N,
                    source: MeasurementSource::PeakGroup {
                        atom_count: 2,
                        isotopomers: vec![
                            Isotopomer {
                                labeled_count: 0,
                                corrected_abundance: 700.0,
                            },
                            Isotopomer {
                                labeled_count: 2,
                                corrected_abundance: 300.0,
                            },
                        ],
                    },
                },
            ],
        }],
    }
}

#[test]
fn roundtrip_yaml_empty_study() {
    let study = Study {
        version: 2,
        name: "Empty Study".to_string(),
        animals: vec![],
        serum_samples: vec![],
    };

    validate_study(&study).unwrap();

    let path = std::env::temp_dir().join("tb_study_roundtrip_empty.yaml");
    save_yaml(&path, &study).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(study, loaded);
}

#[test]
fn roundtrip_yaml_full_study() {
    let study = sample_study();
    validate_study(&study).unwrap();

    let path = std::env::temp_dir().join("tb_study_roundtrip_full.yaml");
    save_yaml(&path, &study).unwrap();
    let loaded = load_yaml(&path).unwrap();

    assert_eq!(study, loaded);
}

#[test]
fn roundtrip_json_full_study() {
    let study = sample_study();

    let path = std::env::temp_dir().join("tb_study_roundtrip_full.json");
    save_json(&path, &study).unwrap();
    let loaded = load_json(&path).unwrap();

    assert_eq!(study, loaded);
}

#[test]
fn load_dispatches_on_extension() {
    let study = sample_study();
    let dir = std::env::temp_dir();

    let json_path = dir.join("tb_study_dispatch.json");
    save_json(&json_path, &study).unwrap();
    assert_eq!(tb_study::load(&json_path).unwrap(), study);

    let yaml_path = dir.join("tb_study_dispatch.yml");
    save_yaml(&yaml_path, &study).unwrap();
    assert_eq!(tb_study::load(&yaml_path).unwrap(), study);
}

#[test]
fn save_picks_format_from_extension() {
    let study = sample_study();
    let path = std::env::temp_dir().join("tb_study_save_dispatch.json");
    tb_study::save(&path, &study).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let decoded: tb_study::Study = serde_json::from_str(&raw).unwrap();
    assert_eq!(decoded, study);
    assert_eq!(
        tb_study::StudyFormat::from_path(std::path::Path::new("study.YML")),
        tb_study::StudyFormat::Yaml
    );
}

#[test]
fn invalid_study_is_not_written() {
    let mut study = sample_study();
    study.animals[0].body_weight_g = 0.0;
    let path = std::env::temp_dir().join("tb_study_invalid_not_written.yaml");
    let _ = std::fs::remove_file(&path);

    let err = tb_study::save(&path, &study).unwrap_err();
    assert!(matches!(err, tb_study::StudyError::Validation(_)));
    assert!(!path.exists());
}

#[test]
fn yaml_with_v1_layout_is_migrated_on_load() {
    let yaml = r#"
version: 1
name: Legacy
animals:
  - id: a1
    body_weight_g: 20.0
    infusion_rate: 0.1
    infusate:
      - compound: glucose
        concentration: 200.0
        labels:
          - { element: C, count: 6 }
serum_samples: []
"#;
    let path = std::env::temp_dir().join("tb_study_legacy_v1.yaml");
    std::fs::write(&path, yaml).unwrap();

    let loaded = load_yaml(&path).unwrap();
    assert_eq!(loaded.version, tb_study::LATEST_VERSION);
    assert_eq!(loaded.animals[0].infusate[0].infusion_rate, Some(0.1));
}
