use crate::error::Result;
use nalgebra::SVector;
use std::collections::HashMap;

/// Index of the solid skeleton / single fluid phase of a material point.
pub const SOLID_PHASE: usize = 0;

/// Read-only view of the material point a stress update is computed for.
/// It is owned by the surrounding solver and only queried here.
pub trait ParticleState {
    /// Strain rate in Voigt form with engineering shear rates.
    fn strain_rate(&self, phase: usize) -> SVector<f64, 6>;
    fn pressure(&self, phase: usize) -> f64;
}

/// Single phase particle state, used when the solver keeps its particles in
/// flat buffers or for driving a model outside of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ParticleSnapshot {
    pub strain_rate: SVector<f64, 6>,
    pub pressure: f64,
}

impl ParticleState for ParticleSnapshot {
    fn strain_rate(&self, _phase: usize) -> SVector<f64, 6> {
        self.strain_rate
    }
    fn pressure(&self, _phase: usize) -> f64 {
        self.pressure
    }
}

pub trait ConstitutiveModel: Sized {
    /// Builds the model from a map of named parameters, see
    /// [`crate::parameters::Parameter`] for the keys.
    fn new(parameters: &HashMap<String, f64>) -> Result<Self>;

    /// Stress at the end of the step for a single material point.
    fn compute_stress<P: ParticleState>(
        &self,
        stress: &SVector<f64, 6>,
        del_strain: &SVector<f64, 6>,
        particle: &P,
    ) -> SVector<f64, 6>;

    /// Updates the stresses of many points in place. `stress` and
    /// `del_strain` hold six components per point.
    fn evaluate<P: ParticleState>(&self, stress: &mut [f64], del_strain: &[f64], particles: &[P]) {
        assert_eq!(stress.len() % 6, 0, "stress buffer is not a multiple of 6");
        assert!(
            stress.len() == del_strain.len() && stress.len() / 6 == particles.len(),
            "stress, strain increment and particle buffers do not match"
        );
        for ((stress_chunk, del_strain_chunk), particle) in stress
            .chunks_exact_mut(6)
            .zip(del_strain.chunks_exact(6))
            .zip(particles)
        {
            let sigma = SVector::<f64, 6>::from_column_slice(stress_chunk);
            let del_eps = SVector::<f64, 6>::from_column_slice(del_strain_chunk);
            let new_stress = self.compute_stress(&sigma, &del_eps, particle);
            stress_chunk.copy_from_slice(new_stress.as_slice());
        }
    }

    fn density(&self) -> f64;

    fn parameters(&self) -> HashMap<String, f64>;
}
