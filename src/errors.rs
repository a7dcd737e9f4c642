// schismrs-mld/src/errors.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum MldOptionsError {
    #[error("Unitialized field on MldOptionsBuilder: {0}")]
    UninitializedFieldError(String),
    #[error("{0} must be finite and >= 0, but got {1}")]
    InvalidThreshold(&'static str, f64),
    #[error("error_tolerance must be finite and > 0, but got {0}")]
    InvalidErrorTolerance(f64),
    #[error("reference_pressure must be finite, but got {0}")]
    InvalidReferencePressure(f64),
    #[error("tcutoff_lower ({0}) must be smaller than tcutoff_upper ({1})")]
    InvalidTemperatureCutoffs(f64, f64),
    #[error("dcutoff must be finite, but got {0}")]
    InvalidDensityCutoff(f64),
    #[error("At least one metric must be enabled")]
    NoMetrics,
}

#[derive(Error, Debug, PartialEq)]
pub enum ProfileError {
    #[error("Unitialized field on ProfileBuilder: {0}")]
    UninitializedFieldError(String),
    #[error("pressure has {0} samples but {1} has {2}")]
    LengthMismatch(usize, &'static str, usize),
}

#[derive(Error, Debug)]
pub enum MldError {
    #[error(transparent)]
    ProfileError(#[from] ProfileError),
    #[error(transparent)]
    MldOptionsError(#[from] MldOptionsError),
}

#[derive(Error, Debug)]
pub enum ProfileReadError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("Could not parse {0:?} as a number on line {1}")]
    ParseError(String, u64),
    #[error(transparent)]
    ProfileError(#[from] ProfileError),
}
