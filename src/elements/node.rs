//! Node - a point in space carrying trial and committed response

use crate::error::{FEAError, FEAResult};
use crate::math::{Vec, Vec3};
use crate::state::{TrialCommit, TrialValue};

/// A node in the finite element model
///
/// Coordinates are stored padded to three components; `ndof` may be 1, 2, 3 or 6.
/// A 3-DOF node is a plane frame node [DX, DY, RZ] when the model is 2-D and a
/// spatial truss node [DX, DY, DZ] otherwise.
#[derive(Debug, Clone)]
pub struct Node {
    /// Node tag
    pub tag: usize,
    /// Reference coordinates [X, Y, Z]
    pub coords: [f64; 3],
    ndm: usize,
    ndof: usize,
    disp: TrialValue<Vec>,
    /// Change made by the most recent trial update
    incr_delta: Vec,
    accel: Vec,
}

impl Node {
    /// Create a new node
    pub fn new(tag: usize, coords: [f64; 3], ndof: usize) -> Self {
        Self {
            tag,
            coords,
            ndm: 3,
            ndof,
            disp: TrialValue::new(Vec::zeros(ndof)),
            incr_delta: Vec::zeros(ndof),
            accel: Vec::zeros(ndof),
        }
    }

    /// Create a 6-DOF frame node
    pub fn frame(tag: usize, x: f64, y: f64, z: f64) -> Self {
        Self::new(tag, [x, y, z], 6)
    }

    /// Create a 3-DOF plane frame node [DX, DY, RZ]
    pub fn plane_frame(tag: usize, x: f64, y: f64) -> Self {
        Self::new(tag, [x, y, 0.0], 3).with_dimension(2)
    }

    /// Set the spatial dimension of the model the node belongs to
    pub fn with_dimension(mut self, ndm: usize) -> Self {
        self.ndm = ndm;
        self
    }

    pub fn dimension(&self) -> usize {
        self.ndm
    }

    /// Position of each nodal DOF within [DX, DY, DZ, RX, RY, RZ]
    pub fn dof_components(&self) -> &'static [usize] {
        match (self.ndof, self.ndm) {
            (1, _) => &[0],
            (2, _) => &[0, 1],
            (3, 2) => &[0, 1, 5],
            (3, _) => &[0, 1, 2],
            _ => &[0, 1, 2, 3, 4, 5],
        }
    }

    pub fn coordinates(&self) -> Vec3 {
        Vec3::new(self.coords[0], self.coords[1], self.coords[2])
    }

    pub fn num_dof(&self) -> usize {
        self.ndof
    }

    /// Calculate distance to another node
    pub fn distance_to(&self, other: &Node) -> f64 {
        (other.coordinates() - self.coordinates()).norm()
    }

    pub fn trial_displacement(&self) -> &Vec {
        self.disp.trial()
    }

    pub fn committed_displacement(&self) -> &Vec {
        self.disp.committed()
    }

    /// Trial minus committed displacement
    pub fn incr_displacement(&self) -> Vec {
        self.disp.trial() - self.disp.committed()
    }

    pub fn incr_delta_displacement(&self) -> &Vec {
        &self.incr_delta
    }

    pub fn trial_acceleration(&self) -> &Vec {
        &self.accel
    }

    /// Set a new trial displacement
    pub fn set_trial_displacement(&mut self, disp: Vec) -> FEAResult<()> {
        self.check_size(disp.len())?;
        self.incr_delta = &disp - self.disp.trial();
        self.disp.set_trial(disp);
        Ok(())
    }

    /// Add an increment to the trial displacement
    pub fn incr_trial_displacement(&mut self, incr: &Vec) -> FEAResult<()> {
        self.check_size(incr.len())?;
        let next = self.disp.trial() + incr;
        self.set_trial_displacement(next)
    }

    pub fn set_trial_acceleration(&mut self, accel: Vec) -> FEAResult<()> {
        self.check_size(accel.len())?;
        self.accel = accel;
        Ok(())
    }

    fn check_size(&self, len: usize) -> FEAResult<()> {
        if len != self.ndof {
            return Err(FEAError::DofMismatch(format!(
                "node {} has {} DOF, received vector of size {}",
                self.tag, self.ndof, len
            )));
        }
        Ok(())
    }
}

impl TrialCommit for Node {
    fn commit_state(&mut self) -> FEAResult<()> {
        self.disp.commit();
        self.incr_delta.fill(0.0);
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> FEAResult<()> {
        self.disp.revert();
        self.incr_delta.fill(0.0);
        Ok(())
    }

    fn revert_to_start(&mut self) -> FEAResult<()> {
        self.disp.reset();
        self.incr_delta.fill(0.0);
        self.accel.fill(0.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_distance() {
        let n1 = Node::frame(1, 0.0, 0.0, 0.0);
        let n2 = Node::frame(2, 3.0, 4.0, 0.0);
        assert!((n1.distance_to(&n2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_dof_components() {
        assert_eq!(Node::plane_frame(1, 0.0, 0.0).dof_components(), &[0, 1, 5]);
        assert_eq!(Node::new(2, [0.0; 3], 3).dof_components(), &[0, 1, 2]);
        assert_eq!(Node::new(3, [0.0; 3], 2).with_dimension(2).dof_components(), &[0, 1]);
        assert_eq!(Node::frame(4, 0.0, 0.0, 0.0).dof_components().len(), 6);
    }

    #[test]
    fn test_trial_commit_cycle() {
        let mut n = Node::new(1, [0.0, 0.0, 0.0], 2);
        n.set_trial_displacement(Vec::from_vec(vec![1.0, 2.0])).unwrap();
        n.incr_trial_displacement(&Vec::from_vec(vec![0.5, 0.0])).unwrap();
        assert_eq!(n.incr_delta_displacement()[0], 0.5);
        assert_eq!(n.incr_displacement()[0], 1.5);

        n.commit_state().unwrap();
        assert_eq!(n.committed_displacement()[0], 1.5);
        assert_eq!(n.incr_displacement()[0], 0.0);

        n.set_trial_displacement(Vec::from_vec(vec![9.0, 9.0])).unwrap();
        n.revert_to_last_commit().unwrap();
        assert_eq!(n.trial_displacement()[1], 2.0);

        n.revert_to_start().unwrap();
        assert_eq!(n.committed_displacement()[0], 0.0);
    }

    #[test]
    fn test_size_mismatch() {
        let mut n = Node::frame(1, 0.0, 0.0, 0.0);
        assert!(n.set_trial_displacement(Vec::zeros(3)).is_err());
    }
}
