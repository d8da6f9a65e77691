// tb-core/src/units.rs
//
// Body weight is carried as plain grams; only collection time goes through uom.

use uom::si::f64::Time as UomTime;

// Public canonical unit type (SI, f64)
pub type Time = UomTime;

/// Serum collection time, measured from the start of infusion.
#[inline]
pub fn minutes(v: f64) -> Time {
    use uom::si::time::minute;
    Time::new::<minute>(v)
}

#[inline]
pub fn as_minutes(t: Time) -> f64 {
    use uom::si::time::minute;
    t.get::<minute>()
}
