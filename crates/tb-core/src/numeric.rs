use crate::{TbError, TbResult};

/// Scalar type for rates, concentrations and labeling fractions.
pub type Real = f64;

/// Absolute and relative tolerance for comparing computed rates.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> TbResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(TbError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> TbResult<Real> {
    ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(TbError::NotPositive { what, value: v })
    }
}

/// Finite and within the closed interval [0, 1].
///
/// Zero is accepted here; callers that divide by the value decide what a zero
/// fraction means for them.
pub fn ensure_unit_interval(v: Real, what: &'static str) -> TbResult<Real> {
    ensure_finite(v, what)?;
    if (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(TbError::OutOfUnitInterval { what, value: v })
    }
}
