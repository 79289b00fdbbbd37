use crate::bingham::Bingham3D;
use crate::error::ConfigurationError;
use crate::interfaces::{ConstitutiveModel, ParticleSnapshot};
use crate::mohr_coulomb::MohrCoulomb3D;

use nalgebra::SVector;
use numpy::{PyReadonlyArray1, PyReadwriteArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

impl From<ConfigurationError> for PyErr {
    fn from(err: ConfigurationError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

fn not_contiguous(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

#[pyclass]
struct PyMohrCoulomb3D {
    model: MohrCoulomb3D,
}

#[pymethods]
impl PyMohrCoulomb3D {
    #[new]
    fn new(parameters: HashMap<String, f64>) -> PyResult<Self> {
        Ok(Self {
            model: MohrCoulomb3D::new(&parameters)?,
        })
    }

    /// Updates the flat stress array in place, six components per point.
    fn evaluate(
        &self,
        mut stress: PyReadwriteArray1<f64>,
        del_strain: PyReadonlyArray1<f64>,
    ) -> PyResult<()> {
        let stress = stress.as_slice_mut().map_err(not_contiguous)?;
        let del_strain = del_strain.as_slice().map_err(not_contiguous)?;
        if stress.len() % 6 != 0 || stress.len() != del_strain.len() {
            return Err(PyValueError::new_err("stress and strain increment sizes do not match"));
        }
        let particles = vec![ParticleSnapshot::default(); stress.len() / 6];
        self.model.evaluate(stress, del_strain, &particles);
        Ok(())
    }

    fn density(&self) -> f64 {
        self.model.density()
    }

    fn parameters(&self) -> HashMap<String, f64> {
        self.model.parameters()
    }
}

#[pyclass]
struct PyBingham3D {
    model: Bingham3D,
}

#[pymethods]
impl PyBingham3D {
    #[new]
    fn new(parameters: HashMap<String, f64>) -> PyResult<Self> {
        Ok(Self {
            model: Bingham3D::new(&parameters)?,
        })
    }

    /// Overwrites `stress` from the strain rates (six per point) and
    /// pressures (one per point) of the particles.
    fn evaluate(
        &self,
        mut stress: PyReadwriteArray1<f64>,
        strain_rate: PyReadonlyArray1<f64>,
        pressure: PyReadonlyArray1<f64>,
    ) -> PyResult<()> {
        let stress = stress.as_slice_mut().map_err(not_contiguous)?;
        let strain_rate = strain_rate.as_slice().map_err(not_contiguous)?;
        let pressure = pressure.as_slice().map_err(not_contiguous)?;
        if stress.len() != strain_rate.len() || stress.len() != 6 * pressure.len() {
            return Err(PyValueError::new_err("stress, strain rate and pressure sizes do not match"));
        }
        let particles: Vec<ParticleSnapshot> = strain_rate
            .chunks_exact(6)
            .zip(pressure)
            .map(|(rate, &pressure)| ParticleSnapshot {
                strain_rate: SVector::<f64, 6>::from_column_slice(rate),
                pressure,
            })
            .collect();
        let del_strain = vec![0.0; stress.len()];
        self.model.evaluate(stress, &del_strain, &particles);
        Ok(())
    }

    fn thermodynamic_pressure(&self, volumetric_strain: f64) -> f64 {
        self.model.thermodynamic_pressure(volumetric_strain)
    }

    fn density(&self) -> f64 {
        self.model.density()
    }

    fn parameters(&self) -> HashMap<String, f64> {
        self.model.parameters()
    }
}

#[pymodule]
fn mpm_materials(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<PyMohrCoulomb3D>()?;
    m.add_class::<PyBingham3D>()?;
    Ok(())
}
