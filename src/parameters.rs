use crate::error::{ConfigurationError, Result};

use std::collections::HashMap;
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Names of all material parameters understood by the models of this crate.
/// The string form is the key used in parameter maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Parameter {
    Density,
    YoungsModulus,
    PoissonRatio,
    // Mohr-Coulomb
    Friction,
    Dilation,
    Cohesion,
    ResidualFriction,
    ResidualDilation,
    ResidualCohesion,
    PeakEpds,
    CritEpds,
    TensionCutoff,
    Porosity,
    // Bingham
    #[strum(to_string = "tau0")]
    Tau0,
    Mu,
    CriticalShearRate,
}

/// Looks up a required parameter.
pub fn get_parameter(parameters: &HashMap<String, f64>, name: Parameter) -> Result<f64> {
    parameters
        .get(name.as_ref())
        .copied()
        .ok_or(ConfigurationError::MissingParameter(name))
}

/// Logs every key of `parameters` that `expected` does not list.
pub fn warn_unused(parameters: &HashMap<String, f64>, expected: &[Parameter]) {
    for key in parameters.keys() {
        let known = Parameter::from_str(key)
            .map(|name| expected.contains(&name))
            .unwrap_or(false);
        if !known {
            log::warn!("ignoring material parameter `{}`", key);
        }
    }
}

pub(crate) fn ensure(name: Parameter, value: f64, ok: bool, reason: &'static str) -> Result<()> {
    if ok && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidParameter {
            name,
            value,
            reason,
        })
    }
}

/// Shared checks for the elastic constants and the density.
pub(crate) fn validate_elastic(density: f64, youngs_modulus: f64, poisson_ratio: f64) -> Result<()> {
    ensure(Parameter::Density, density, density > 0.0, "must be positive")?;
    ensure(
        Parameter::YoungsModulus,
        youngs_modulus,
        youngs_modulus > 0.0,
        "must be positive",
    )?;
    ensure(
        Parameter::PoissonRatio,
        poisson_ratio,
        poisson_ratio > -1.0 && poisson_ratio < 0.5,
        "must lie in (-1, 0.5)",
    )
}
