//! Labeling fractions derived from a serum peak group's isotopomers.
//!
//! Each isotopomer carries the number of labeled atoms of one element and its
//! natural-abundance-corrected abundance. Fractions are abundances normalized
//! by the peak group total.

use crate::element::LabeledElement;
use crate::{FCircError, FCircResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Isotopomer {
    pub labeled_count: u32,
    pub corrected_abundance: f64,
}

/// One element's isotopomer distribution for a tracer compound in a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakGroupLabeling {
    pub element: LabeledElement,
    /// Atoms of `element` in the compound formula.
    pub atom_count: u32,
    pub isotopomers: Vec<Isotopomer>,
}

/// The two calculator denominators for one tracer/element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelingFractions {
    pub fraction: f64,
    pub enrichment_fraction: f64,
}

impl PeakGroupLabeling {
    pub fn total_abundance(&self) -> FCircResult<f64> {
        let mut total = 0.0;
        for iso in &self.isotopomers {
            if !iso.corrected_abundance.is_finite() || iso.corrected_abundance < 0.0 {
                return Err(FCircError::invalid(
                    "corrected_abundance",
                    format!("must be finite and non-negative, got {}", iso.corrected_abundance),
                ));
            }
            if iso.labeled_count > self.atom_count {
                return Err(FCircError::invalid(
                    "labeled_count",
                    format!(
                        "{} labeled {} atoms exceeds {} in formula",
                        iso.labeled_count, self.element, self.atom_count
                    ),
                ));
            }
            total += iso.corrected_abundance;
        }
        if total == 0.0 {
            return Err(FCircError::DivisionByZero {
                what: "total corrected abundance",
            });
        }
        Ok(total)
    }

    /// Fraction of the peak group in each isotopomer, in input order.
    pub fn fractions(&self) -> FCircResult<Vec<f64>> {
        let total = self.total_abundance()?;
        Ok(self
            .isotopomers
            .iter()
            .map(|iso| iso.corrected_abundance / total)
            .collect())
    }

    /// Fraction of the pool still carrying the tracer's full label.
    ///
    /// Zero when no isotopomer with `tracer_label_count` labeled atoms was
    /// observed.
    pub fn intact_fraction(&self, tracer_label_count: u32) -> FCircResult<f64> {
        self.ensure_atoms()?;
        if tracer_label_count > self.atom_count {
            return Err(FCircError::invalid(
                "tracer label count",
                format!(
                    "{tracer_label_count} exceeds {} {} atoms in formula",
                    self.atom_count, self.element
                ),
            ));
        }
        let fractions = self.fractions()?;
        Ok(self
            .isotopomers
            .iter()
            .zip(fractions)
            .filter(|(iso, _)| iso.labeled_count == tracer_label_count)
            .map(|(_, f)| f)
            .sum())
    }

    /// Atom-averaged enrichment: sum(fraction * labeled_count) / atom_count.
    pub fn enrichment_fraction(&self) -> FCircResult<f64> {
        self.ensure_atoms()?;
        let fractions = self.fractions()?;
        let labeled_atoms: f64 = self
            .isotopomers
            .iter()
            .zip(fractions)
            .map(|(iso, f)| f * f64::from(iso.labeled_count))
            .sum();
        Ok(labeled_atoms / f64::from(self.atom_count))
    }

    pub fn labeling_fractions(&self, tracer_label_count: u32) -> FCircResult<LabelingFractions> {
        Ok(LabelingFractions {
            fraction: self.intact_fraction(tracer_label_count)?,
            enrichment_fraction: self.enrichment_fraction()?,
        })
    }

    fn ensure_atoms(&self) -> FCircResult<()> {
        if self.atom_count == 0 {
            return Err(FCircError::DivisionByZero { what: "atom_count" });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tb_core::{Tolerances, nearly_equal};

    fn glucose_c(isotopomers: &[(u32, f64)]) -> PeakGroupLabeling {
        PeakGroupLabeling {
            element: LabeledElement::C,
            atom_count: 6,
            isotopomers: isotopomers
                .iter()
                .map(|&(labeled_count, corrected_abundance)| Isotopomer {
                    labeled_count,
                    corrected_abundance,
                })
                .collect(),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        nearly_equal(a, b, Tolerances::default())
    }

    #[test]
    fn fully_labeled_pool_is_intact_and_enriched() {
        let pg = glucose_c(&[(0, 0.0), (6, 1000.0)]);
        assert!(close(pg.intact_fraction(6).unwrap(), 1.0));
        assert!(close(pg.enrichment_fraction().unwrap(), 1.0));
    }

    #[test]
    fn mixed_pool() {
        // M+0: 50%, M+3: 25%, M+6: 25%
        let pg = glucose_c(&[(0, 500.0), (3, 250.0), (6, 250.0)]);
        assert!(close(pg.intact_fraction(6).unwrap(), 0.25));
        // (0.25*3 + 0.25*6) / 6 = 0.375
        assert!(close(pg.enrichment_fraction().unwrap(), 0.375));

        let both = pg.labeling_fractions(6).unwrap();
        assert!(close(both.fraction, 0.25));
        assert!(close(both.enrichment_fraction, 0.375));
    }

    #[test]
    fn missing_tracer_isotopomer_gives_zero_intact_fraction() {
        let pg = glucose_c(&[(0, 800.0), (2, 200.0)]);
        assert_eq!(pg.intact_fraction(6).unwrap(), 0.0);
    }

    #[test]
    fn empty_or_zero_abundance_is_division_by_zero() {
        let empty = glucose_c(&[]);
        assert!(matches!(
            empty.fractions(),
            Err(FCircError::DivisionByZero { .. })
        ));
        let zeros = glucose_c(&[(0, 0.0), (6, 0.0)]);
        assert!(matches!(
            zeros.enrichment_fraction(),
            Err(FCircError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn zero_atom_count_is_division_by_zero() {
        let mut pg = glucose_c(&[(0, 1.0)]);
        pg.atom_count = 0;
        assert_eq!(
            pg.enrichment_fraction(),
            Err(FCircError::DivisionByZero { what: "atom_count" })
        );
    }

    #[test]
    fn bad_isotopomers_are_invalid() {
        let negative = glucose_c(&[(0, -1.0), (6, 10.0)]);
        assert!(matches!(
            negative.fractions(),
            Err(FCircError::InvalidInput { .. })
        ));
        let too_many = glucose_c(&[(7, 10.0)]);
        assert!(matches!(
            too_many.fractions(),
            Err(FCircError::InvalidInput { .. })
        ));
        let pg = glucose_c(&[(6, 10.0)]);
        assert!(matches!(
            pg.intact_fraction(8),
            Err(FCircError::InvalidInput { .. })
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use tb_core::{Tolerances, nearly_equal};

    proptest! {
        #[test]
        fn fractions_sum_to_one(abundances in prop::collection::vec(0.0_f64..1.0e6, 1..8)) {
            let pg = PeakGroupLabeling {
                element: LabeledElement::C,
                atom_count: 8,
                isotopomers: abundances
                    .iter()
                    .enumerate()
                    .map(|(i, &a)| Isotopomer { labeled_count: i as u32, corrected_abundance: a })
                    .collect(),
            };
            if let Ok(fractions) = pg.fractions() {
                let sum: f64 = fractions.iter().sum();
                let tol = Tolerances { abs: 1e-9, rel: 1e-9 };
                prop_assert!(nearly_equal(sum, 1.0, tol));
                let enrichment = pg.enrichment_fraction().unwrap();
                prop_assert!((0.0..=1.0 + 1e-12).contains(&enrichment));
            }
        }
    }
}
