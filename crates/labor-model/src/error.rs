use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("invalid county code '{0}': expected up to 3 digits")]
    InvalidCountyCode(String),
    #[error("invalid state code '{0}': expected up to 2 digits")]
    InvalidStateCode(String),
    #[error("invalid series id '{value}': {reason}")]
    InvalidSeriesId { value: String, reason: &'static str },
    #[error("unknown indicator suffix '{0}'")]
    UnknownIndicator(String),
    #[error("unknown month '{0}'")]
    UnknownMonth(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
