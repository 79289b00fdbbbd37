//! Mohr-Coulomb yield function and its gradients in Haigh-Westergaard
//! coordinates `(epsilon, rho, theta)`.
//!
//! The yield function is
//! $F = \sqrt{3/2}\,\rho\left[\frac{\sin(\theta+\pi/3)}{\sqrt 3\cos\phi} + \frac{\cos(\theta+\pi/3)\tan\phi}{3}\right] + \frac{\epsilon}{3}\tan\phi - c$.
//! Plastic flow follows a non-associated potential whose deviatoric section
//! is rounded with the Menetrey-Willam shape factor, so the flow direction
//! stays defined on the corners of the Mohr-Coulomb hexagon.

use crate::consts::{
    guard_denominator, MAX_ECCENTRICITY, MERIDIONAL_ECCENTRICITY,
    MIN_ECCENTRICITY, R_MW_DENOMINATOR_FLOOR, R_MW_RADICAND_FLOOR, SMALL_DENOMINATOR, SQRT_3,
    SYM_ID_6, YIELD_TOLERANCE,
};
use crate::softening::PlasticState;
use crate::stress_strain::StressInvariants;
use nalgebra::{SVector, Vector3};
use std::f64::consts::FRAC_PI_3;

const SQRT_3_2: f64 = 1.224744871391589;

pub fn yield_function(invariants: &StressInvariants, state: &PlasticState) -> f64 {
    let phi = state.friction;
    let angle = invariants.theta + FRAC_PI_3;
    SQRT_3_2
        * invariants.rho
        * (angle.sin() / (SQRT_3 * phi.cos()) + angle.cos() * phi.tan() / 3.0)
        + invariants.epsilon / 3.0 * phi.tan()
        - state.cohesion
}

pub fn is_yielding(yield_value: f64) -> bool {
    yield_value > YIELD_TOLERANCE
}

/// Rounded plastic potential whose gradient is [`FlowGradients::dp_dsigma`].
pub fn flow_potential(invariants: &StressInvariants, state: &PlasticState) -> f64 {
    let shape = DeviatoricShape::new(state.friction, invariants.theta);
    let omega = potential_omega(invariants, state, shape.r_mw);
    omega.sqrt() + invariants.epsilon * state.dilation.tan() / SQRT_3
}

/// Stress gradients of the yield function and the plastic potential.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowGradients {
    pub df_dsigma: SVector<f64, 6>,
    pub dp_dsigma: SVector<f64, 6>,
    /// Coupling between softening and plastic flow in the multiplier
    /// denominator. No coupling model exists yet, so this is always zero.
    pub softening: f64,
}

impl FlowGradients {
    pub fn new<const DIM: usize>(invariants: &StressInvariants, state: &PlasticState) -> Self {
        let grad = InvariantGradients::new::<DIM>(invariants);
        let rho = invariants.rho;

        let phi = state.friction;
        let angle = invariants.theta + FRAC_PI_3;
        let df_depsilon = phi.tan() / 3.0;
        let df_drho =
            SQRT_3_2 * (angle.sin() / (SQRT_3 * phi.cos()) + angle.cos() * phi.tan() / 3.0);
        let df_dtheta = SQRT_3_2
            * rho
            * (angle.cos() / (SQRT_3 * phi.cos()) - angle.sin() * phi.tan() / 3.0);

        let shape = DeviatoricShape::new(phi, invariants.theta);
        let sqrt_omega = potential_omega(invariants, state, shape.r_mw).sqrt();
        let dp_depsilon = state.dilation.tan() / SQRT_3;
        let dp_drho = 1.5 * shape.r_mw * shape.r_mw * rho / sqrt_omega;
        let dp_dtheta = 1.5 * shape.r_mw * rho * rho * shape.dr_mw_dtheta / sqrt_omega;

        Self {
            df_dsigma: grad.combine(df_depsilon, df_drho, df_dtheta),
            dp_dsigma: grad.combine(dp_depsilon, dp_drho, dp_dtheta),
            softening: 0.0,
        }
    }
}

fn potential_omega(invariants: &StressInvariants, state: &PlasticState, r_mw: f64) -> f64 {
    let cohesive = MERIDIONAL_ECCENTRICITY * state.cohesion * state.dilation.tan();
    let shear = SQRT_3_2 * r_mw * invariants.rho;
    let omega = cohesive * cohesive + shear * shear;
    if omega.abs() < SMALL_DENOMINATOR {
        SMALL_DENOMINATOR
    } else {
        omega
    }
}

/// Gradients of `epsilon`, `rho` and `theta` with respect to the stress.
struct InvariantGradients {
    depsilon: SVector<f64, 6>,
    drho: SVector<f64, 6>,
    dtheta: SVector<f64, 6>,
}

impl InvariantGradients {
    fn new<const DIM: usize>(invariants: &StressInvariants) -> Self {
        let mut s = invariants.deviatoric;
        if DIM == 2 {
            s[4] = 0.0;
            s[5] = 0.0;
        }
        let j2 = invariants.j2;

        let depsilon = SYM_ID_6 / SQRT_3;

        let rho_inv = if invariants.rho.abs() > f64::EPSILON {
            1.0 / invariants.rho
        } else {
            1.0
        };
        let drho = s * rho_inv;

        // derivatives of the Lode parameter R = cos(3 theta)
        let (j2_pow_15, j2_pow_25) = if j2.abs() < SMALL_DENOMINATOR {
            (SMALL_DENOMINATOR, SMALL_DENOMINATOR)
        } else {
            (j2.powf(1.5), j2.powf(2.5))
        };
        let dr_dj2 = -2.25 * SQRT_3 * invariants.j3 / j2_pow_25;
        let dr_dj3 = 1.5 * SQRT_3 / j2_pow_15;

        let row_x = Vector3::new(s[0], s[3], s[5]);
        let row_y = Vector3::new(s[3], s[1], s[4]);
        let row_z = Vector3::new(s[5], s[4], s[2]);
        let two_thirds_j2 = 2.0 / 3.0 * j2;
        let dj3_dsigma = SVector::<f64, 6>::new(
            row_x.dot(&row_x) - two_thirds_j2,
            row_y.dot(&row_y) - two_thirds_j2,
            row_z.dot(&row_z) - two_thirds_j2,
            row_x.dot(&row_y),
            row_y.dot(&row_z),
            row_x.dot(&row_z),
        );

        let dtheta = lode_angle_derivative(invariants.lode_parameter())
            * (dr_dj2 * s + dr_dj3 * dj3_dsigma);

        let mut grads = Self {
            depsilon,
            drho,
            dtheta,
        };
        if DIM == 2 {
            for g in [&mut grads.depsilon, &mut grads.drho, &mut grads.dtheta] {
                g[4] = 0.0;
                g[5] = 0.0;
            }
        }
        grads
    }

    fn combine(&self, d_epsilon: f64, d_rho: f64, d_theta: f64) -> SVector<f64, 6> {
        d_epsilon * self.depsilon + d_rho * self.drho + d_theta * self.dtheta
    }
}

/// `d theta / d R` for the unclamped Lode parameter `R`. On the corners of
/// the deviatoric section `1 - R^2` vanishes and is replaced by the guard.
fn lode_angle_derivative(lode_parameter: f64) -> f64 {
    // rounding can push R just past +-1
    let r = lode_parameter.clamp(-1.0, 1.0);
    -1.0 / (3.0 * guard_denominator(1.0 - r * r, SMALL_DENOMINATOR).sqrt())
}

/// Menetrey-Willam shape factor of the rounded deviatoric section and its
/// derivative with respect to the Lode angle.
struct DeviatoricShape {
    r_mw: f64,
    dr_mw_dtheta: f64,
}

impl DeviatoricShape {
    fn new(friction: f64, theta: f64) -> Self {
        let e = ((3.0 - friction.sin()) / (3.0 + friction.sin()))
            .clamp(MIN_ECCENTRICITY, MAX_ECCENTRICITY);
        let (sin_t, cos_t) = theta.sin_cos();
        let a = 1.0 - e * e;
        let b = 2.0 * e - 1.0;

        let radicand = (4.0 * a * cos_t * cos_t + 5.0 * e * e - 4.0 * e).max(R_MW_RADICAND_FLOOR);
        let root = radicand.sqrt();
        let numerator = 4.0 * a * cos_t * cos_t + b * b;
        let denominator = guard_denominator(2.0 * a * cos_t + b * root, R_MW_DENOMINATOR_FLOOR);

        let dnumerator = -8.0 * a * cos_t * sin_t;
        let dradicand = -8.0 * a * cos_t * sin_t;
        let ddenominator = -2.0 * a * sin_t + b * dradicand / (2.0 * root);

        Self {
            r_mw: numerator / denominator,
            dr_mw_dtheta: (dnumerator * denominator - numerator * ddenominator)
                / (denominator * denominator),
        }
    }
}
