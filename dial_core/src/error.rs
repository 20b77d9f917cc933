use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum DialError {
    #[error("hardware error: {0}")]
    Hardware(String),
    #[error("hardware fault: {0}")]
    HardwareFault(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("observation failed: {0}")]
    Observation(#[from] ObservationError),
    #[error("io error: {0}")]
    Io(String),
}

/// Failure to obtain a numeric reading from the weather service.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ObservationError {
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("malformed payload: {0}")]
    Payload(String),
    #[error("metric {0:?} not present in observation")]
    MissingMetric(String),
    #[error("metric {metric:?} has non-numeric value {raw:?}")]
    Parse { metric: String, raw: String },
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("missing coil driver")]
    MissingCoils,
    #[error("missing button panel")]
    MissingButtons,
    #[error("missing observation source")]
    MissingSource,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
