use crate::consts::{guard_denominator, SMALL_DENOMINATOR};
use crate::error::Result;
use crate::interfaces::{ConstitutiveModel, ParticleState};
use crate::linear_elasticity::{bulk_modulus, elastic_compliance, elastic_stiffness, shear_modulus};
use crate::parameters::{ensure, get_parameter, validate_elastic, warn_unused, Parameter};
use crate::softening::{PlasticState, SofteningLaw};
use crate::stress_strain::StressInvariants;
use crate::yield_surface::{is_yielding, yield_function, FlowGradients};

use nalgebra::{SMatrix, SVector};
use std::collections::HashMap;

/// Material constants of the Mohr-Coulomb model. Angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MohrCoulombParameters {
    pub density: f64,
    pub youngs_modulus: f64,
    pub poisson_ratio: f64,
    pub friction: f64,
    pub dilation: f64,
    pub cohesion: f64,
    pub residual_friction: f64,
    pub residual_dilation: f64,
    pub residual_cohesion: f64,
    /// Accumulated plastic deviatoric strain at which softening starts.
    pub peak_epds: f64,
    /// Accumulated plastic deviatoric strain at which the residual strength is reached.
    pub crit_epds: f64,
    pub tension_cutoff: f64,
    pub porosity: f64,
}

impl MohrCoulombParameters {
    pub const NAMES: [Parameter; 13] = [
        Parameter::Density,
        Parameter::YoungsModulus,
        Parameter::PoissonRatio,
        Parameter::Friction,
        Parameter::Dilation,
        Parameter::Cohesion,
        Parameter::ResidualFriction,
        Parameter::ResidualDilation,
        Parameter::ResidualCohesion,
        Parameter::PeakEpds,
        Parameter::CritEpds,
        Parameter::TensionCutoff,
        Parameter::Porosity,
    ];

    pub fn from_map(parameters: &HashMap<String, f64>) -> Result<Self> {
        warn_unused(parameters, &Self::NAMES);
        Ok(Self {
            density: get_parameter(parameters, Parameter::Density)?,
            youngs_modulus: get_parameter(parameters, Parameter::YoungsModulus)?,
            poisson_ratio: get_parameter(parameters, Parameter::PoissonRatio)?,
            friction: get_parameter(parameters, Parameter::Friction)?,
            dilation: get_parameter(parameters, Parameter::Dilation)?,
            cohesion: get_parameter(parameters, Parameter::Cohesion)?,
            residual_friction: get_parameter(parameters, Parameter::ResidualFriction)?,
            residual_dilation: get_parameter(parameters, Parameter::ResidualDilation)?,
            residual_cohesion: get_parameter(parameters, Parameter::ResidualCohesion)?,
            peak_epds: get_parameter(parameters, Parameter::PeakEpds)?,
            crit_epds: get_parameter(parameters, Parameter::CritEpds)?,
            tension_cutoff: get_parameter(parameters, Parameter::TensionCutoff)?,
            porosity: get_parameter(parameters, Parameter::Porosity)?,
        })
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        Self::NAMES
            .iter()
            .zip([
                self.density,
                self.youngs_modulus,
                self.poisson_ratio,
                self.friction,
                self.dilation,
                self.cohesion,
                self.residual_friction,
                self.residual_dilation,
                self.residual_cohesion,
                self.peak_epds,
                self.crit_epds,
                self.tension_cutoff,
                self.porosity,
            ])
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        validate_elastic(self.density, self.youngs_modulus, self.poisson_ratio)?;
        for (name, angle) in [
            (Parameter::Friction, self.friction),
            (Parameter::Dilation, self.dilation),
            (Parameter::ResidualFriction, self.residual_friction),
            (Parameter::ResidualDilation, self.residual_dilation),
        ] {
            ensure(name, angle, (0.0..90.0).contains(&angle), "must lie in [0, 90) degrees")?;
        }
        ensure(Parameter::Cohesion, self.cohesion, self.cohesion >= 0.0, "must not be negative")?;
        ensure(
            Parameter::ResidualCohesion,
            self.residual_cohesion,
            self.residual_cohesion >= 0.0,
            "must not be negative",
        )?;
        ensure(Parameter::PeakEpds, self.peak_epds, self.peak_epds >= 0.0, "must not be negative")?;
        ensure(
            Parameter::CritEpds,
            self.crit_epds,
            self.crit_epds >= self.peak_epds,
            "must not be smaller than peak_epds",
        )?;
        ensure(Parameter::TensionCutoff, self.tension_cutoff, true, "must be finite")?;
        ensure(
            Parameter::Porosity,
            self.porosity,
            (0.0..1.0).contains(&self.porosity),
            "must lie in [0, 1)",
        )
    }
}

/// Result of a single Mohr-Coulomb stress update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressUpdate {
    pub stress: SVector<f64, 6>,
    /// Plastic part of the strain increment (engineering shear).
    pub plastic_strain: SVector<f64, 6>,
    pub multiplier: f64,
    pub yielding_now: bool,
    pub yielding_trial: bool,
}

/// Mohr-Coulomb solid with non-associated flow and strain softening,
/// integrated with an explicit elastic predictor and a single plastic
/// corrector.
///
/// `DIM == 2` is the plane strain variant. Other dimensions are rejected
/// at compile time:
///
/// ```compile_fail
/// use mpm_materials::{MohrCoulomb, MohrCoulombParameters};
///
/// let parameters = MohrCoulombParameters {
///     density: 2000.0,
///     youngs_modulus: 1e6,
///     poisson_ratio: 0.3,
///     friction: 30.0,
///     dilation: 0.0,
///     cohesion: 1000.0,
///     residual_friction: 30.0,
///     residual_dilation: 0.0,
///     residual_cohesion: 1000.0,
///     peak_epds: 0.0,
///     crit_epds: 0.0,
///     tension_cutoff: 0.0,
///     porosity: 0.0,
/// };
/// let _ = MohrCoulomb::<1>::from_parameters(parameters);
/// ```
#[derive(Debug, Clone)]
pub struct MohrCoulomb<const DIM: usize> {
    parameters: MohrCoulombParameters,
    bulk_modulus: f64,
    shear_modulus: f64,
    softening: SofteningLaw,
    elastic_stiffness: SMatrix<f64, 6, 6>,
    elastic_compliance: SMatrix<f64, 6, 6>,
}

pub type MohrCoulomb2D = MohrCoulomb<2>;
pub type MohrCoulomb3D = MohrCoulomb<3>;

impl<const DIM: usize> MohrCoulomb<DIM> {
    const SUPPORTED_DIM: () = assert!(
        DIM == 2 || DIM == 3,
        "MohrCoulomb is defined for DIM 2 or 3"
    );

    pub fn from_parameters(parameters: MohrCoulombParameters) -> Result<Self> {
        let () = Self::SUPPORTED_DIM;
        parameters.validate()?;
        let k = bulk_modulus(parameters.youngs_modulus, parameters.poisson_ratio);
        let g = shear_modulus(parameters.youngs_modulus, parameters.poisson_ratio);
        let softening = SofteningLaw {
            peak: PlasticState {
                friction: parameters.friction.to_radians(),
                dilation: parameters.dilation.to_radians(),
                cohesion: parameters.cohesion,
            },
            residual: PlasticState {
                friction: parameters.residual_friction.to_radians(),
                dilation: parameters.residual_dilation.to_radians(),
                cohesion: parameters.residual_cohesion,
            },
            peak_epds: parameters.peak_epds,
            crit_epds: parameters.crit_epds,
        };
        log::debug!("Mohr-Coulomb {}D material: K = {}, G = {}, {:?}", DIM, k, g, softening);
        Ok(Self {
            parameters,
            bulk_modulus: k,
            shear_modulus: g,
            softening,
            elastic_stiffness: elastic_stiffness(k, g),
            elastic_compliance: elastic_compliance(k, g),
        })
    }

    pub fn material_parameters(&self) -> &MohrCoulombParameters {
        &self.parameters
    }

    pub fn bulk_modulus(&self) -> f64 {
        self.bulk_modulus
    }

    pub fn shear_modulus(&self) -> f64 {
        self.shear_modulus
    }

    pub fn elastic_stiffness(&self) -> &SMatrix<f64, 6, 6> {
        &self.elastic_stiffness
    }

    pub fn softening_law(&self) -> &SofteningLaw {
        &self.softening
    }

    /// Stress after the strain increment `del_strain`. Softening is not
    /// tracked here, the peak strength always applies.
    pub fn elastoplastic_stress(
        &self,
        stress: &SVector<f64, 6>,
        del_strain: &SVector<f64, 6>,
    ) -> SVector<f64, 6> {
        self.update_stress(stress, del_strain, 0.0).stress
    }

    /// Full stress update for a point that has accumulated `epds` of
    /// equivalent plastic deviatoric strain. The caller owns that
    /// accumulator and may advance it with
    /// [`crate::softening::equivalent_plastic_deviatoric_strain`] of the
    /// returned plastic strain.
    pub fn update_stress(
        &self,
        stress: &SVector<f64, 6>,
        del_strain: &SVector<f64, 6>,
        epds: f64,
    ) -> StressUpdate {
        let state = self.softening.plastic_state(epds);
        let d = &self.elastic_stiffness;
        let d_del_strain = d * del_strain;

        let invariants = StressInvariants::new::<DIM>(stress);
        let yield_value = yield_function(&invariants, &state);
        let yielding_now = is_yielding(yield_value);
        let grads = FlowGradients::new::<DIM>(&invariants, &state);
        let d_dp = d * grads.dp_dsigma;
        let lambda = grads.df_dsigma.dot(&d_del_strain)
            / guard_denominator(grads.df_dsigma.dot(&d_dp) + grads.softening, SMALL_DENOMINATOR);

        let trial_stress = stress + d_del_strain;
        let trial_invariants = StressInvariants::new::<DIM>(&trial_stress);
        let trial_yield_value = yield_function(&trial_invariants, &state);
        let yielding_trial = is_yielding(trial_yield_value);
        let trial_grads = FlowGradients::new::<DIM>(&trial_invariants, &state);
        let lambda_trial = trial_yield_value
            / guard_denominator(
                trial_grads.df_dsigma.dot(&(d * trial_grads.dp_dsigma)) + trial_grads.softening,
                SMALL_DENOMINATOR,
            );

        // unloading from the surface is elastic
        let multiplier = if yielding_now {
            lambda
        } else if yielding_trial {
            lambda_trial
        } else {
            0.0
        }
        .max(0.0);
        if multiplier != 0.0 {
            log::trace!(
                "plastic correction: F = {}, F_trial = {}, multiplier = {}",
                yield_value,
                trial_yield_value,
                multiplier
            );
        }

        // the correction always points along the start-of-step potential gradient
        let new_stress = trial_stress - multiplier * d_dp;

        let mut plastic_strain = del_strain - self.elastic_compliance * (new_stress - stress);
        if DIM == 2 {
            plastic_strain[4] = 0.0;
            plastic_strain[5] = 0.0;
        }

        StressUpdate {
            stress: new_stress,
            plastic_strain,
            multiplier,
            yielding_now,
            yielding_trial,
        }
    }
}

impl<const DIM: usize> ConstitutiveModel for MohrCoulomb<DIM> {
    fn new(parameters: &HashMap<String, f64>) -> Result<Self> {
        Self::from_parameters(MohrCoulombParameters::from_map(parameters)?)
    }

    fn compute_stress<P: ParticleState>(
        &self,
        stress: &SVector<f64, 6>,
        del_strain: &SVector<f64, 6>,
        _particle: &P,
    ) -> SVector<f64, 6> {
        self.update_stress(stress, del_strain, 0.0).stress
    }

    fn density(&self) -> f64 {
        self.parameters.density
    }

    fn parameters(&self) -> HashMap<String, f64> {
        self.parameters.to_map()
    }
}
