use crate::stress_strain::voigt_decomposition;
use nalgebra::SVector;

/// Friction angle, dilation angle (both in radians) and cohesion currently
/// governing the Mohr-Coulomb surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlasticState {
    pub friction: f64,
    pub dilation: f64,
    pub cohesion: f64,
}

/// Piecewise linear softening from peak to residual strength between two
/// levels of accumulated equivalent plastic deviatoric strain (epds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SofteningLaw {
    pub peak: PlasticState,
    pub residual: PlasticState,
    pub peak_epds: f64,
    pub crit_epds: f64,
}

impl SofteningLaw {
    pub fn plastic_state(&self, epds: f64) -> PlasticState {
        if epds > self.peak_epds && epds < self.crit_epds {
            let t = (epds - self.peak_epds) / (self.crit_epds - self.peak_epds);
            let lerp = |peak: f64, residual: f64| peak + t * (residual - peak);
            PlasticState {
                friction: lerp(self.peak.friction, self.residual.friction),
                dilation: lerp(self.peak.dilation, self.residual.dilation),
                cohesion: lerp(self.peak.cohesion, self.residual.cohesion),
            }
        } else {
            // epds >= crit_epds falls back to the peak values too
            self.peak
        }
    }
}

/// Equivalent deviatoric measure `sqrt(2/3 e:e)` of a plastic strain
/// increment given with engineering shear strains.
pub fn equivalent_plastic_deviatoric_strain(plastic_strain: &SVector<f64, 6>) -> f64 {
    let (_, dev) = voigt_decomposition(plastic_strain);
    let normal = dev.fixed_rows::<3>(0).norm_squared();
    let shear = dev.fixed_rows::<3>(3).norm_squared();
    (2.0 / 3.0 * (normal + 0.5 * shear)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn law() -> SofteningLaw {
        SofteningLaw {
            peak: PlasticState {
                friction: 0.6,
                dilation: 0.2,
                cohesion: 1000.0,
            },
            residual: PlasticState {
                friction: 0.4,
                dilation: 0.0,
                cohesion: 200.0,
            },
            peak_epds: 0.01,
            crit_epds: 0.05,
        }
    }

    #[test]
    fn peak_values_before_softening_starts() {
        let law = law();
        assert_eq!(law.plastic_state(0.0), law.peak);
        assert_eq!(law.plastic_state(0.01), law.peak);
    }

    #[test]
    fn linear_interpolation_between_thresholds() {
        let law = law();
        let state = law.plastic_state(0.03);
        assert_relative_eq!(state.friction, 0.5, max_relative = 1e-12);
        assert_relative_eq!(state.dilation, 0.1, max_relative = 1e-12);
        assert_relative_eq!(state.cohesion, 600.0, max_relative = 1e-12);

        let state = law.plastic_state(0.04);
        assert_relative_eq!(state.cohesion, 400.0, max_relative = 1e-12);
    }

    #[test]
    fn peak_values_return_past_critical_strain() {
        let law = law();
        assert_eq!(law.plastic_state(0.05), law.peak);
        assert_eq!(law.plastic_state(1.0), law.peak);
    }

    #[test]
    fn coincident_thresholds_never_interpolate() {
        let mut law = law();
        law.crit_epds = law.peak_epds;
        assert_eq!(law.plastic_state(0.01), law.peak);
        assert_eq!(law.plastic_state(0.02), law.peak);
    }

    #[test]
    fn equivalent_strain_of_volumetric_increment_vanishes() {
        let dp = SVector::<f64, 6>::new(1e-3, 1e-3, 1e-3, 0.0, 0.0, 0.0);
        assert_relative_eq!(equivalent_plastic_deviatoric_strain(&dp), 0.0, epsilon = 1e-18);
    }

    #[test]
    fn equivalent_strain_of_simple_shear() {
        // engineering shear gamma gives sqrt(2/3 * 2 (gamma/2)^2) = gamma / sqrt(3)
        let gamma = 3e-3;
        let dp = SVector::<f64, 6>::new(0.0, 0.0, 0.0, gamma, 0.0, 0.0);
        assert_relative_eq!(
            equivalent_plastic_deviatoric_strain(&dp),
            gamma / 3f64.sqrt(),
            max_relative = 1e-12
        );
    }
}
