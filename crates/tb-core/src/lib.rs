//! tb-core: shared foundation for the TraceBase FCirc workspace.
//!
//! Contains:
//! - units (uom time type + constructors for collection time)
//! - numeric (Real + tolerances + range guards)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{TbError, TbResult};
pub use numeric::*;
pub use units::*;
