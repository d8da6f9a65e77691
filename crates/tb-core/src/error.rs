use thiserror::Error;

pub type TbResult<T> = Result<T, TbError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TbError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("{what} must be positive, got {value}")]
    NotPositive { what: &'static str, value: f64 },

    #[error("{what} must lie within [0, 1], got {value}")]
    OutOfUnitInterval { what: &'static str, value: f64 },
}
