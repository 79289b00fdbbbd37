use crate::consts::{SYM_ID_6_OUTER_SYM_ID_6, VOIGT_SHEAR_WEIGHTS};
use nalgebra::SMatrix;

pub fn bulk_modulus(youngs_modulus: f64, poisson_ratio: f64) -> f64 {
    youngs_modulus / (3.0 * (1.0 - 2.0 * poisson_ratio))
}

pub fn shear_modulus(youngs_modulus: f64, poisson_ratio: f64) -> f64 {
    youngs_modulus / (2.0 * (1.0 + poisson_ratio))
}

/// Isotropic stiffness mapping a Voigt strain (engineering shear) onto a
/// Voigt stress: `K + 4G/3` on the normal diagonal, `K - 2G/3` between
/// normal components and `G` on the shear diagonal.
pub fn elastic_stiffness(bulk_modulus: f64, shear_modulus: f64) -> SMatrix<f64, 6, 6> {
    let lambda = bulk_modulus - 2.0 / 3.0 * shear_modulus;
    SYM_ID_6_OUTER_SYM_ID_6 * lambda + VOIGT_SHEAR_WEIGHTS * shear_modulus
}

/// Exact inverse of [`elastic_stiffness`].
pub fn elastic_compliance(bulk_modulus: f64, shear_modulus: f64) -> SMatrix<f64, 6, 6> {
    let c = 1.0 / (9.0 * bulk_modulus) - 1.0 / (6.0 * shear_modulus);
    let mut compliance = SYM_ID_6_OUTER_SYM_ID_6 * c;
    for i in 0..3 {
        compliance[(i, i)] += 0.5 / shear_modulus;
        compliance[(i + 3, i + 3)] = 1.0 / shear_modulus;
    }
    compliance
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn moduli_from_youngs_modulus_and_poisson_ratio() {
        assert_relative_eq!(bulk_modulus(1e6, 0.3), 1e6 / 1.2, max_relative = 1e-12);
        assert_relative_eq!(shear_modulus(1e6, 0.3), 1e6 / 2.6, max_relative = 1e-12);
        assert_relative_eq!(bulk_modulus(2e5, 0.0), 2e5 / 3.0, max_relative = 1e-12);
    }

    #[test]
    fn stiffness_has_isotropic_structure() {
        for (e, nu) in [(1e6, 0.3), (2.1e11, 0.25), (50.0, -0.2), (1e7, 0.49)] {
            let k = bulk_modulus(e, nu);
            let g = shear_modulus(e, nu);
            let d = elastic_stiffness(k, g);
            assert_eq!(d, d.transpose());
            let a1 = k + 4.0 / 3.0 * g;
            let a2 = k - 2.0 / 3.0 * g;
            for i in 0..3 {
                assert_relative_eq!(d[(i, i)], a1, max_relative = 1e-12);
                assert_relative_eq!(d[(i + 3, i + 3)], g, max_relative = 1e-12);
                for j in 0..3 {
                    if i != j {
                        assert_relative_eq!(d[(i, j)], a2, max_relative = 1e-12);
                    }
                    assert_eq!(d[(i, j + 3)], 0.0);
                    assert_eq!(d[(i + 3, j)], 0.0);
                    if i != j {
                        assert_eq!(d[(i + 3, j + 3)], 0.0);
                    }
                }
            }
        }
    }

    #[test]
    fn compliance_inverts_stiffness() {
        let k = bulk_modulus(1e6, 0.3);
        let g = shear_modulus(1e6, 0.3);
        let product = elastic_compliance(k, g) * elastic_stiffness(k, g);
        assert_relative_eq!(product, SMatrix::<f64, 6, 6>::identity(), epsilon = 1e-12);
    }

    #[test]
    fn compliance_matches_engineering_constants() {
        let (e, nu) = (1e6, 0.3);
        let c = elastic_compliance(bulk_modulus(e, nu), shear_modulus(e, nu));
        assert_relative_eq!(c[(0, 0)], 1.0 / e, max_relative = 1e-12);
        assert_relative_eq!(c[(0, 1)], -nu / e, max_relative = 1e-12);
        assert_relative_eq!(c[(3, 3)], 1.0 / shear_modulus(e, nu), max_relative = 1e-12);
    }
}
