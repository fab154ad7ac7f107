//! Support conditions

use serde::{Deserialize, Serialize};

/// Restraints at a node, in the order [DX, DY, DZ, RX, RY, RZ]
///
/// Nodes with fewer than six DOF use the flags of the components they carry,
/// see [`Node::dof_components`](crate::elements::Node::dof_components).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Support {
    /// Restrained in X translation
    pub dx: bool,
    /// Restrained in Y translation
    pub dy: bool,
    /// Restrained in Z translation
    pub dz: bool,
    /// Restrained in X rotation
    pub rx: bool,
    /// Restrained in Y rotation
    pub ry: bool,
    /// Restrained in Z rotation
    pub rz: bool,
}

impl Support {
    /// Create a new support with no restraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fully fixed support (all DOFs restrained)
    pub fn fixed() -> Self {
        Self::with_restraints(true, true, true, true, true, true)
    }

    /// Create a pinned support (translations restrained, rotations free)
    pub fn pinned() -> Self {
        Self::with_restraints(true, true, true, false, false, false)
    }

    /// Create a roller support (Y translation restrained only)
    pub fn roller_y() -> Self {
        Self::with_restraints(false, true, false, false, false, false)
    }

    /// Create a support with specific restraints
    pub fn with_restraints(dx: bool, dy: bool, dz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Self { dx, dy, dz, rx, ry, rz }
    }

    /// Get restraints as array [DX, DY, DZ, RX, RY, RZ]
    pub fn as_array(&self) -> [bool; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Restraint flags for the given DOF components of a node
    pub fn mask<'a>(&self, components: &'a [usize]) -> impl Iterator<Item = bool> + 'a {
        let flags = self.as_array();
        components.iter().map(move |&c| flags[c])
    }

    /// Check if any DOF is restrained
    pub fn is_supported(&self) -> bool {
        self.as_array().iter().any(|&r| r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_follows_components() {
        let s = Support::pinned();
        assert_eq!(s.mask(&[0, 1]).collect::<Vec<_>>(), vec![true, true]);
        assert_eq!(s.mask(&[0, 1, 2, 3, 4, 5]).filter(|&r| r).count(), 3);
        assert!(!Support::new().is_supported());
    }

    #[test]
    fn test_plane_frame_mask_uses_rz() {
        let s = Support::with_restraints(false, true, false, false, false, true);
        assert_eq!(s.mask(&[0, 1, 5]).collect::<Vec<_>>(), vec![false, true, true]);
        // a spatial truss node reads dz instead
        assert_eq!(s.mask(&[0, 1, 2]).collect::<Vec<_>>(), vec![false, true, false]);
    }
}
