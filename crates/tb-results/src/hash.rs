//! Content-based hashing for run IDs.

use sha2::{Digest, Sha256};
use tb_study::schema::Study;

/// Same study, configuration and calculator version always hash to the same ID.
pub fn compute_run_id(study: &Study, config_fingerprint: &str, calculator_version: &str) -> String {
    let mut hasher = Sha256::new();

    let study_json = serde_json::to_string(study).unwrap_or_default();
    for field in [study_json.as_str(), config_fingerprint, calculator_version] {
        update_field(&mut hasher, field);
    }

    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Length-prefixed so adjacent fields cannot trade bytes.
fn update_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use tb_study::schema::*;

    fn study(name: &str, body_weight_g: f64) -> Study {
        Study {
            version: 2,
            name: name.to_string(),
            animals: vec![AnimalDef {
                id: "a1".to_string(),
                body_weight_g,
                infusion_rate: None,
                infusate: vec![],
            }],
            serum_samples: vec![],
        }
    }

    #[test]
    fn hash_stability() {
        let s = study("Test", 25.0);
        let hash1 = compute_run_id(&s, "cfg", "v1");
        let hash2 = compute_run_id(&s, "cfg", "v1");
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let base = compute_run_id(&study("Test", 25.0), "cfg", "v1");
        assert_ne!(base, compute_run_id(&study("Test", 26.0), "cfg", "v1"));
        assert_ne!(base, compute_run_id(&study("Test", 25.0), "cfg2", "v1"));
        assert_ne!(base, compute_run_id(&study("Test", 25.0), "cfg", "v2"));
    }

    #[test]
    fn field_boundaries_are_part_of_the_id() {
        let s = study("Test", 25.0);
        let a = compute_run_id(&s, "steady_state_threshold_min=15", "0.1.0");
        let b = compute_run_id(&s, "steady_state_threshold_min=150", ".1.0");
        assert_ne!(a, b);
    }
}
