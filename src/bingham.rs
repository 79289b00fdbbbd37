use crate::consts::MIN_CRITICAL_SHEAR_RATE;
use crate::error::Result;
use crate::interfaces::{ConstitutiveModel, ParticleState, SOLID_PHASE};
use crate::linear_elasticity::bulk_modulus;
use crate::parameters::{ensure, get_parameter, validate_elastic, warn_unused, Parameter};
use crate::stress_strain::dirac_delta;

use nalgebra::SVector;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinghamParameters {
    pub density: f64,
    pub youngs_modulus: f64,
    pub poisson_ratio: f64,
    /// Yield stress.
    pub tau0: f64,
    /// Plastic viscosity.
    pub mu: f64,
    /// Shear rate below which the fluid is treated as rigid.
    pub critical_shear_rate: f64,
}

impl BinghamParameters {
    pub const NAMES: [Parameter; 6] = [
        Parameter::Density,
        Parameter::YoungsModulus,
        Parameter::PoissonRatio,
        Parameter::Tau0,
        Parameter::Mu,
        Parameter::CriticalShearRate,
    ];

    pub fn from_map(parameters: &HashMap<String, f64>) -> Result<Self> {
        warn_unused(parameters, &Self::NAMES);
        Ok(Self {
            density: get_parameter(parameters, Parameter::Density)?,
            youngs_modulus: get_parameter(parameters, Parameter::YoungsModulus)?,
            poisson_ratio: get_parameter(parameters, Parameter::PoissonRatio)?,
            tau0: get_parameter(parameters, Parameter::Tau0)?,
            mu: get_parameter(parameters, Parameter::Mu)?,
            critical_shear_rate: get_parameter(parameters, Parameter::CriticalShearRate)?,
        })
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        Self::NAMES
            .iter()
            .zip([
                self.density,
                self.youngs_modulus,
                self.poisson_ratio,
                self.tau0,
                self.mu,
                self.critical_shear_rate,
            ])
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        validate_elastic(self.density, self.youngs_modulus, self.poisson_ratio)?;
        ensure(Parameter::Tau0, self.tau0, self.tau0 >= 0.0, "must not be negative")?;
        ensure(Parameter::Mu, self.mu, self.mu >= 0.0, "must not be negative")?;
        ensure(
            Parameter::CriticalShearRate,
            self.critical_shear_rate,
            self.critical_shear_rate >= 0.0,
            "must not be negative",
        )
    }
}

/// Bingham fluid. The deviatoric stress follows from the particle's strain
/// rate through an apparent viscosity, the pressure is taken from the
/// particle as is.
///
/// Only the plane strain (`DIM == 2`) and 3D variants exist:
///
/// ```compile_fail
/// use mpm_materials::{Bingham, BinghamParameters};
///
/// let parameters = BinghamParameters {
///     density: 1000.0,
///     youngs_modulus: 1e6,
///     poisson_ratio: 0.3,
///     tau0: 50.0,
///     mu: 10.0,
///     critical_shear_rate: 1e-6,
/// };
/// let _ = Bingham::<7>::from_parameters(parameters);
/// ```
#[derive(Debug, Clone)]
pub struct Bingham<const DIM: usize> {
    parameters: BinghamParameters,
    bulk_modulus: f64,
}

pub type Bingham2D = Bingham<2>;
pub type Bingham3D = Bingham<3>;

impl<const DIM: usize> Bingham<DIM> {
    const SUPPORTED_DIM: () = assert!(
        DIM == 2 || DIM == 3,
        "Bingham is defined for DIM 2 or 3"
    );

    pub fn from_parameters(parameters: BinghamParameters) -> Result<Self> {
        let () = Self::SUPPORTED_DIM;
        parameters.validate()?;
        let k = bulk_modulus(parameters.youngs_modulus, parameters.poisson_ratio);
        log::debug!("Bingham {}D material: K = {}, {:?}", DIM, k, parameters);
        Ok(Self {
            parameters,
            bulk_modulus: k,
        })
    }

    pub fn material_parameters(&self) -> &BinghamParameters {
        &self.parameters
    }

    pub fn bulk_modulus(&self) -> f64 {
        self.bulk_modulus
    }

    /// Pressure of the fluid for a given volumetric strain.
    pub fn thermodynamic_pressure(&self, volumetric_strain: f64) -> f64 {
        -self.bulk_modulus * volumetric_strain
    }

    pub fn apparent_viscosity(&self, shear_rate: f64) -> f64 {
        let critical = self.parameters.critical_shear_rate.max(MIN_CRITICAL_SHEAR_RATE);
        if shear_rate * shear_rate > critical * critical {
            2.0 * (self.parameters.tau0 / shear_rate + self.parameters.mu)
        } else {
            0.0
        }
    }

    pub fn fluid_stress<P: ParticleState>(&self, particle: &P) -> SVector<f64, 6> {
        let mut rate = particle.strain_rate(SOLID_PHASE);
        for i in 3..6 {
            rate[i] *= 2.0;
        }
        let shear = rate.fixed_rows::<3>(3);
        let shear_rate = (2.0 * (rate.dot(&rate) + shear.dot(&shear))).sqrt();

        let viscosity = self.apparent_viscosity(shear_rate);
        let mut tau = viscosity * rate;

        // von Mises check on the in-plane normal components
        let tau_normal = tau.fixed_rows::<DIM>(0);
        if 0.5 * tau_normal.dot(&tau_normal) < self.parameters.tau0 * self.parameters.tau0 {
            tau.fill(0.0);
        }
        log::trace!("Bingham shear rate {}, apparent viscosity {}", shear_rate, viscosity);

        -particle.pressure(SOLID_PHASE) * dirac_delta::<DIM>() + tau
    }
}

impl<const DIM: usize> ConstitutiveModel for Bingham<DIM> {
    fn new(parameters: &HashMap<String, f64>) -> Result<Self> {
        Self::from_parameters(BinghamParameters::from_map(parameters)?)
    }

    /// The incoming stress and strain increment are not used, the state
    /// comes entirely from the particle.
    fn compute_stress<P: ParticleState>(
        &self,
        _stress: &SVector<f64, 6>,
        _del_strain: &SVector<f64, 6>,
        particle: &P,
    ) -> SVector<f64, 6> {
        self.fluid_stress(particle)
    }

    fn density(&self) -> f64 {
        self.parameters.density
    }

    fn parameters(&self) -> HashMap<String, f64> {
        self.parameters.to_map()
    }
}
