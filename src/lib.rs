//! Constitutive models for material point simulations: a Mohr-Coulomb
//! solid with strain softening and a Bingham fluid, both in plane strain
//! and 3D variants.
//!
//! Stresses and strains are 6-component Voigt vectors ordered
//! `(xx, yy, zz, xy, yz, xz)`. Strains carry engineering shear components.

pub mod bingham;
pub mod consts;
pub mod error;
pub mod interfaces;
pub mod linear_elasticity;
pub mod mohr_coulomb;
pub mod parameters;
pub mod softening;
pub mod stress_strain;
pub mod yield_surface;

#[cfg(feature = "python")]
mod python;

pub use bingham::{Bingham, Bingham2D, Bingham3D, BinghamParameters};
pub use error::{ConfigurationError, Result};
pub use interfaces::{ConstitutiveModel, ParticleSnapshot, ParticleState};
pub use mohr_coulomb::{
    MohrCoulomb, MohrCoulomb2D, MohrCoulomb3D, MohrCoulombParameters, StressUpdate,
};
pub use parameters::Parameter;
