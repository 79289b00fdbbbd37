//! Errors raised while building a material model.

use crate::parameters::Parameter;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigurationError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A required material parameter was not supplied.
    #[error("missing material parameter `{0}`")]
    MissingParameter(Parameter),

    /// A material parameter is present but outside its admissible range.
    #[error("invalid material parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: Parameter,
        value: f64,
        reason: &'static str,
    },
}
