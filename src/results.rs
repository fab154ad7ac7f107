//! Result types for element queries and analysis output

use serde::{Deserialize, Serialize};

use crate::math::{Mat, Vec};

/// Value returned by a name-based response query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Response {
    Scalar(f64),
    Vector(std::vec::Vec<f64>),
    Matrix {
        rows: usize,
        cols: usize,
        /// Column-major entries
        data: std::vec::Vec<f64>,
    },
}

impl Response {
    pub fn vector(v: &Vec) -> Self {
        Response::Vector(v.iter().copied().collect())
    }

    pub fn matrix(m: &Mat) -> Self {
        Response::Matrix {
            rows: m.nrows(),
            cols: m.ncols(),
            data: m.as_slice().to_vec(),
        }
    }

    /// Entries as a flat slice
    pub fn values(&self) -> &[f64] {
        match self {
            Response::Scalar(v) => std::slice::from_ref(v),
            Response::Vector(v) => v,
            Response::Matrix { data, .. } => data,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Response::Scalar(v) => Some(*v),
            Response::Vector(v) if v.len() == 1 => Some(v[0]),
            _ => None,
        }
    }
}

/// Displacement results at a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDisplacement {
    /// Displacement in X direction
    pub dx: f64,
    /// Displacement in Y direction
    pub dy: f64,
    /// Displacement in Z direction
    pub dz: f64,
    /// Rotation about X axis
    pub rx: f64,
    /// Rotation about Y axis
    pub ry: f64,
    /// Rotation about Z axis
    pub rz: f64,
}

impl NodeDisplacement {
    /// Create from array [DX, DY, DZ, RX, RY, RZ]
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self {
            dx: arr[0],
            dy: arr[1],
            dz: arr[2],
            rx: arr[3],
            ry: arr[4],
            rz: arr[5],
        }
    }

    /// Create from a nodal displacement vector and the components it carries
    ///
    /// Components a node does not carry are zero.
    pub fn from_components(values: &[f64], components: &[usize]) -> Self {
        let mut arr = [0.0; 6];
        for (&c, v) in components.iter().zip(values) {
            arr[c] = *v;
        }
        Self::from_array(arr)
    }

    /// Get translation magnitude
    pub fn translation_magnitude(&self) -> f64 {
        (self.dx.powi(2) + self.dy.powi(2) + self.dz.powi(2)).sqrt()
    }

    /// Get rotation magnitude
    pub fn rotation_magnitude(&self) -> f64 {
        (self.rx.powi(2) + self.ry.powi(2) + self.rz.powi(2)).sqrt()
    }
}

/// Outcome of one converged load step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step: usize,
    /// Pseudo-time at the end of the step
    pub time: f64,
    pub iterations: usize,
    /// Norm of the last displacement correction
    pub norm: f64,
}

/// Summary of a completed static analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub steps: std::vec::Vec<StepResult>,
    /// Committed displacements by node tag
    pub displacements: std::vec::Vec<(usize, NodeDisplacement)>,
}

impl AnalysisReport {
    pub fn displacement(&self, node: usize) -> Option<&NodeDisplacement> {
        self.displacements.iter().find(|(tag, _)| *tag == node).map(|(_, d)| d)
    }

    pub fn total_iterations(&self) -> usize {
        self.steps.iter().map(|s| s.iterations).sum()
    }
}
