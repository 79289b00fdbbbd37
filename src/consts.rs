use nalgebra::{SMatrix, SVector};

pub const SQRT_3: f64 = 1.7320508075688772;

pub const SYM_ID_6: SVector<f64, 6> = SVector::<f64, 6>::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0);

pub const SYM_ID_6_OUTER_SYM_ID_6: SMatrix<f64, 6, 6> = SMatrix::<f64, 6, 6>::new(
    1., 1., 1., 0., 0., 0.,
    1., 1., 1., 0., 0., 0.,
    1., 1., 1., 0., 0., 0.,
    0., 0., 0., 0., 0., 0.,
    0., 0., 0., 0., 0., 0.,
    0., 0., 0., 0., 0., 0.,
);

/// Diagonal weights turning a shear modulus into the isotropic Voigt stiffness
/// (tensorial normal strains, engineering shear strains).
pub const VOIGT_SHEAR_WEIGHTS: SMatrix<f64, 6, 6> = SMatrix::<f64, 6, 6>::new(
    2., 0., 0., 0., 0., 0.,
    0., 2., 0., 0., 0., 0.,
    0., 0., 2., 0., 0., 0.,
    0., 0., 0., 1., 0., 0.,
    0., 0., 0., 0., 1., 0.,
    0., 0., 0., 0., 0., 1.,
);

// Numeric guards of the Mohr-Coulomb evaluator. The values are part of the
// model's observable behaviour and must not be tuned.

/// A stress state yields when the yield function exceeds this value.
pub const YIELD_TOLERANCE: f64 = 1.0e-22;
/// Fallback for powers of J2 and for raw denominators close to zero.
pub const SMALL_DENOMINATOR: f64 = 1.0e-22;
/// Bound of the Lode parameter before the inverse cosine.
pub const LODE_PARAMETER_BOUND: f64 = 0.99;
/// Eccentricity range of the rounded flow potential.
pub const MIN_ECCENTRICITY: f64 = 0.501;
pub const MAX_ECCENTRICITY: f64 = 1.0;
/// Floor of the Menetrey-Willam denominator.
pub const R_MW_DENOMINATOR_FLOOR: f64 = 1.0e-3;
/// Floor of the Menetrey-Willam radicand.
pub const R_MW_RADICAND_FLOOR: f64 = 1.0e-10;
/// Meridional eccentricity of the hyperbolic flow potential.
pub const MERIDIONAL_ECCENTRICITY: f64 = 0.1;
/// Floor of the Bingham critical shear rate.
pub const MIN_CRITICAL_SHEAR_RATE: f64 = 1.0e-15;

/// Keeps `value` away from zero: inside `(-floor, floor)` it is replaced by
/// `floor` carrying the sign of `value`.
#[inline]
pub fn guard_denominator(value: f64, floor: f64) -> f64 {
    if value.abs() < floor {
        floor.copysign(value)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_keeps_regular_values() {
        assert_eq!(guard_denominator(2.5, 1e-3), 2.5);
        assert_eq!(guard_denominator(-2.5, 1e-3), -2.5);
    }

    #[test]
    fn guard_replaces_small_values_with_signed_floor() {
        assert_eq!(guard_denominator(1e-9, 1e-3), 1e-3);
        assert_eq!(guard_denominator(-1e-9, 1e-3), -1e-3);
        assert_eq!(guard_denominator(0.0, 1e-22), 1e-22);
    }
}
