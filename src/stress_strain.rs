use crate::consts::{LODE_PARAMETER_BOUND, SQRT_3, SYM_ID_6};
use nalgebra::{SMatrix, SVector};
use std::f64::consts::FRAC_PI_3;

// Voigt vectors are ordered (xx, yy, zz, xy, yz, xz). Stresses carry the
// tensor shear components, strains carry engineering shear strains.

pub fn voigt_to_tensor(voigt: &SVector<f64, 6>) -> SMatrix<f64, 3, 3> {
    SMatrix::<f64, 3, 3>::new(
        voigt[0], voigt[3], voigt[5],
        voigt[3], voigt[1], voigt[4],
        voigt[5], voigt[4], voigt[2],
    )
}

pub fn volumetric(voigt: &SVector<f64, 6>) -> f64 {
    (voigt.x + voigt.y + voigt.z) / 3.0
}

pub fn add_volumetric(voigt: &mut SVector<f64, 6>, p: f64) {
    voigt.x += p;
    voigt.y += p;
    voigt.z += p;
}

pub fn deviatoric(voigt: &SVector<f64, 6>) -> SVector<f64, 6> {
    let (_, dev) = voigt_decomposition(voigt);
    dev
}

pub fn voigt_decomposition(voigt: &SVector<f64, 6>) -> (f64, SVector<f64, 6>) {
    let p = volumetric(voigt);
    let mut dev = *voigt;
    add_volumetric(&mut dev, -p);
    (p, dev)
}

/// Identity tensor in Voigt form. The plane strain variant drops the
/// out-of-plane normal component.
pub fn dirac_delta<const DIM: usize>() -> SVector<f64, 6> {
    if DIM == 3 {
        SYM_ID_6
    } else {
        SVector::<f64, 6>::new(1.0, 1.0, 0.0, 0.0, 0.0, 0.0)
    }
}

/// Scalar invariants of a stress state together with its deviatoric part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressInvariants {
    pub mean_stress: f64,
    pub deviatoric: SVector<f64, 6>,
    pub j2: f64,
    pub j3: f64,
    /// Generalised shear magnitude `sqrt(2 J2)`.
    pub rho: f64,
    /// Lode angle in `[0, pi/3]`.
    pub theta: f64,
    /// Coordinate along the hydrostatic axis, `trace / sqrt(3)`.
    pub epsilon: f64,
}

impl StressInvariants {
    /// `DIM == 2` ignores the out-of-plane shear components.
    pub fn new<const DIM: usize>(stress: &SVector<f64, 6>) -> Self {
        let (mean_stress, dev) = voigt_decomposition(stress);

        let mut j2 = ((stress[0] - stress[1]).powi(2)
            + (stress[1] - stress[2]).powi(2)
            + (stress[0] - stress[2]).powi(2))
            / 6.0
            + stress[3].powi(2);
        if DIM == 3 {
            j2 += stress[4].powi(2) + stress[5].powi(2);
        }

        let mut j3 = dev[0] * dev[1] * dev[2] - dev[2] * dev[3].powi(2);
        if DIM == 3 {
            j3 += 2.0 * dev[3] * dev[4] * dev[5]
                - dev[0] * dev[4].powi(2)
                - dev[1] * dev[5].powi(2);
        }

        Self {
            mean_stress,
            deviatoric: dev,
            j2,
            j3,
            rho: (2.0 * j2).sqrt(),
            theta: lode_angle(j2, j3),
            epsilon: (stress[0] + stress[1] + stress[2]) / SQRT_3,
        }
    }

    /// `cos(3 theta)` before clamping, `0` for a vanishing J2.
    pub fn lode_parameter(&self) -> f64 {
        lode_parameter(self.j2, self.j3)
    }
}

fn lode_parameter(j2: f64, j3: f64) -> f64 {
    let value = if j2.abs() > 0.0 {
        1.5 * SQRT_3 * j3 / j2.powf(1.5)
    } else {
        0.0
    };
    // J2^1.5 may underflow to zero for tiny but non-zero J2
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

fn lode_angle(j2: f64, j3: f64) -> f64 {
    let r = lode_parameter(j2, j3).clamp(-LODE_PARAMETER_BOUND, LODE_PARAMETER_BOUND);
    (r.acos() / 3.0).clamp(0.0, FRAC_PI_3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn decomposition_splits_mean_and_deviator() {
        let stress = SVector::<f64, 6>::new(-10.0, -20.0, -30.0, 5.0, 6.0, 7.0);
        let (p, s) = voigt_decomposition(&stress);
        assert_relative_eq!(p, -20.0);
        assert_relative_eq!(s, SVector::<f64, 6>::new(10.0, 0.0, -10.0, 5.0, 6.0, 7.0));
        assert_relative_eq!(volumetric(&s), 0.0);
        assert_eq!(deviatoric(&stress), s);
    }

    #[test]
    fn dirac_delta_differs_only_in_zz() {
        let d2 = dirac_delta::<2>();
        let d3 = dirac_delta::<3>();
        assert_eq!(d2, SVector::<f64, 6>::new(1.0, 1.0, 0.0, 0.0, 0.0, 0.0));
        assert_eq!(d3, SVector::<f64, 6>::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0));
        let difference = d3 - d2;
        assert_eq!(difference, SVector::<f64, 6>::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn hydrostatic_stress_has_no_shear_invariants() {
        let stress = SVector::<f64, 6>::new(-100.0, -100.0, -100.0, 0.0, 0.0, 0.0);
        let inv = StressInvariants::new::<3>(&stress);
        assert_eq!(inv.j2, 0.0);
        assert_eq!(inv.j3, 0.0);
        assert_eq!(inv.rho, 0.0);
        assert_eq!(inv.lode_parameter(), 0.0);
        assert_relative_eq!(inv.theta, std::f64::consts::FRAC_PI_6, max_relative = 1e-14);
        assert_relative_eq!(inv.mean_stress, -100.0);
        assert_relative_eq!(inv.epsilon, -300.0 / 3f64.sqrt());
    }

    #[test]
    fn invariants_match_tensor_algebra() {
        let stress = SVector::<f64, 6>::new(-100.0, -60.0, -30.0, 10.0, -4.0, 7.0);
        let inv = StressInvariants::new::<3>(&stress);
        let s = voigt_to_tensor(&inv.deviatoric);
        assert_relative_eq!(inv.j2, 0.5 * (s * s).trace(), max_relative = 1e-12);
        assert_relative_eq!(inv.j3, s.determinant(), max_relative = 1e-10);
        assert_relative_eq!(inv.rho, (2.0 * inv.j2).sqrt());
        let expected = (inv.lode_parameter().acos()) / 3.0;
        assert_relative_eq!(inv.theta, expected, max_relative = 1e-12);
    }

    #[test]
    fn plane_strain_ignores_out_of_plane_shear() {
        let stress = SVector::<f64, 6>::new(-100.0, -60.0, -30.0, 10.0, -4.0, 7.0);
        let mut in_plane = stress;
        in_plane[4] = 0.0;
        in_plane[5] = 0.0;
        let inv_2d = StressInvariants::new::<2>(&stress);
        let inv_3d = StressInvariants::new::<3>(&in_plane);
        assert_relative_eq!(inv_2d.j2, inv_3d.j2);
        assert_relative_eq!(inv_2d.j3, inv_3d.j3);
        assert_relative_eq!(inv_2d.theta, inv_3d.theta);
    }

    #[test]
    fn lode_parameter_is_clamped_at_099() {
        // axisymmetric compression sits exactly on cos(3 theta) = -1
        let stress = SVector::<f64, 6>::new(-10.0, -10.0, -40.0, 0.0, 0.0, 0.0);
        let inv = StressInvariants::new::<3>(&stress);
        assert_relative_eq!(inv.lode_parameter(), -1.0, max_relative = 1e-12);
        assert_relative_eq!(inv.theta, (-0.99f64).acos() / 3.0, max_relative = 1e-14);

        let stress = SVector::<f64, 6>::new(-10.0, -40.0, -40.0, 0.0, 0.0, 0.0);
        let inv = StressInvariants::new::<3>(&stress);
        assert_relative_eq!(inv.lode_parameter(), 1.0, max_relative = 1e-12);
        assert_relative_eq!(inv.theta, 0.99f64.acos() / 3.0, max_relative = 1e-14);
    }

    #[test]
    fn rounding_past_a_corner_keeps_theta_in_range() {
        // the inexact mean stress pushes the raw Lode parameter below -1
        let stress = SVector::<f64, 6>::new(200.0, 200.0, 199.0, 0.0, 0.0, 0.0);
        for inv in [
            StressInvariants::new::<2>(&stress),
            StressInvariants::new::<3>(&stress),
        ] {
            assert!(inv.lode_parameter() < -1.0, "R = {}", inv.lode_parameter());
            assert!((0.0..=FRAC_PI_3).contains(&inv.theta));
            assert_relative_eq!(inv.theta, (-0.99f64).acos() / 3.0, max_relative = 1e-14);
        }
    }

    #[test]
    fn lode_angle_stays_in_sextant() {
        let stresses = [
            SVector::<f64, 6>::new(1e-160, 0.0, 0.0, 0.0, 0.0, 0.0),
            SVector::<f64, 6>::new(1e150, -1e150, 3.0, 1e149, 0.0, 0.0),
            SVector::<f64, 6>::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0),
            SVector::<f64, 6>::new(0.0, 0.0, 0.0, -1.0, 1.0, -1.0),
            SVector::<f64, 6>::new(5.0, -3.0, 2.0, 0.0, 0.0, 0.0),
            SVector::<f64, 6>::new(-1e-300, 1e-300, 0.0, 1e-300, 0.0, 0.0),
        ];
        for stress in stresses.iter() {
            for theta in [
                StressInvariants::new::<2>(stress).theta,
                StressInvariants::new::<3>(stress).theta,
            ] {
                assert!(
                    (0.0..=FRAC_PI_3).contains(&theta),
                    "theta = {} for {:?}",
                    theta,
                    stress
                );
            }
        }
    }
}
