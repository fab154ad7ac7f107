//! Node loads - reference forces and moments applied directly to nodes

use serde::{Deserialize, Serialize};

use crate::math::Vec;

/// A reference load applied to a node, scaled by the load factor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeLoad {
    /// Force in X direction (N)
    pub fx: f64,
    /// Force in Y direction (N)
    pub fy: f64,
    /// Force in Z direction (N)
    pub fz: f64,
    /// Moment about X axis (N·m)
    pub mx: f64,
    /// Moment about Y axis (N·m)
    pub my: f64,
    /// Moment about Z axis (N·m)
    pub mz: f64,
}

impl NodeLoad {
    /// Create a new node load with all components
    pub fn new(fx: f64, fy: f64, fz: f64, mx: f64, my: f64, mz: f64) -> Self {
        Self { fx, fy, fz, mx, my, mz }
    }

    /// Create a force-only node load
    pub fn force(fx: f64, fy: f64, fz: f64) -> Self {
        Self::new(fx, fy, fz, 0.0, 0.0, 0.0)
    }

    /// Create a moment-only node load
    pub fn moment(mx: f64, my: f64, mz: f64) -> Self {
        Self::new(0.0, 0.0, 0.0, mx, my, mz)
    }

    /// Get as array [FX, FY, FZ, MX, MY, MZ]
    pub fn as_array(&self) -> [f64; 6] {
        [self.fx, self.fy, self.fz, self.mx, self.my, self.mz]
    }

    /// Components acting on the given DOF of a node
    pub fn as_vector(&self, components: &[usize]) -> Vec {
        let arr = self.as_array();
        Vec::from_iterator(components.len(), components.iter().map(|&c| arr[c]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_for_small_nodes() {
        let load = NodeLoad::force(1.0, -2.0, 3.0);
        let v = load.as_vector(&[0, 1]);
        assert_eq!(v.len(), 2);
        assert_eq!(v[1], -2.0);
        assert_eq!(load.as_vector(&[0, 1, 2, 3, 4, 5])[5], 0.0);
    }

    #[test]
    fn test_plane_frame_vector_takes_mz() {
        let load = NodeLoad::new(1.0, 2.0, 3.0, 0.0, 0.0, 7.0);
        assert_eq!(load.as_vector(&[0, 1, 5]).as_slice(), &[1.0, 2.0, 7.0]);
        assert_eq!(load.as_vector(&[0, 1, 2]).as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(NodeLoad::moment(0.0, 0.0, 7.0).as_vector(&[0, 1, 5])[2], 7.0);
    }
}
