//! Loads applied along an element

use serde::{Deserialize, Serialize};

use crate::math::{Vec5, Vec6};

/// Uniformly distributed load per unit length in local element axes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementLoad {
    /// Along the local x axis
    pub wx: f64,
    /// Along the local y axis
    pub wy: f64,
    /// Along the local z axis
    pub wz: f64,
}

impl ElementLoad {
    pub fn uniform(wx: f64, wy: f64, wz: f64) -> Self {
        Self { wx, wy, wz }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::uniform(self.wx * factor, self.wy * factor, self.wz * factor)
    }

    /// Reactions of a simply supported span, `[Px_i, Vy_i, Vy_j, Vz_i, Vz_j]`
    pub fn end_reactions(&self, length: f64) -> Vec5 {
        Vec5::new(
            -self.wx * length,
            -0.5 * self.wy * length,
            -0.5 * self.wy * length,
            -0.5 * self.wz * length,
            -0.5 * self.wz * length,
        )
    }

    /// Fixed-end forces in the basic system
    pub fn fixed_end_forces(&self, length: f64) -> Vec6 {
        let mz = self.wy * length * length / 12.0;
        let my = self.wz * length * length / 12.0;
        Vec6::new(-0.5 * self.wx * length, -mz, mz, my, -my, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_gravity_reactions() {
        let load = ElementLoad::uniform(0.0, -10.0, 0.0);
        let p0 = load.end_reactions(6.0);
        assert_relative_eq!(p0[1] + p0[2], 60.0, epsilon = 1e-12);

        let q0 = load.fixed_end_forces(6.0);
        assert_relative_eq!(q0[1], 30.0, epsilon = 1e-12);
        assert_relative_eq!(q0[2], -30.0, epsilon = 1e-12);
        assert_eq!(load.scaled(0.5).wy, -5.0);
    }
}
