//! Linear 3D frame transformation
//!
//! Geometry is frozen at `initialize`; the basic system is obtained from the
//! undeformed configuration, so `update` and the trial/commit lifecycle have
//! nothing to do.

use super::geometry::FrameGeometry;
use super::{CrdTransf, EndNodes, CLASS_TAG_LINEAR_3D};
use crate::channel::Channel;
use crate::error::FEAResult;
use crate::math::{Mat12, Mat3, Mat6, Vec12, Vec3, Vec5, Vec6};
use crate::state::TrialCommit;

/// Linear transformation of a spatial frame element
#[derive(Debug, Clone)]
pub struct LinearCrdTransf3d {
    geom: FrameGeometry,
}

impl LinearCrdTransf3d {
    /// Create a transformation from a vector lying in the local x-z plane
    pub fn new(vecxz: Vec3) -> Self {
        Self {
            geom: FrameGeometry::new(vecxz, None, None),
        }
    }

    /// Create a transformation with rigid joint offsets (global coordinates) at both ends
    pub fn with_offsets(vecxz: Vec3, offset_i: Vec3, offset_j: Vec3) -> Self {
        Self {
            geom: FrameGeometry::new(vecxz, Some(offset_i), Some(offset_j)),
        }
    }
}

impl Default for LinearCrdTransf3d {
    fn default() -> Self {
        Self::new(Vec3::z())
    }
}

impl TrialCommit for LinearCrdTransf3d {
    fn commit_state(&mut self) -> FEAResult<()> {
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> FEAResult<()> {
        Ok(())
    }

    fn revert_to_start(&mut self) -> FEAResult<()> {
        Ok(())
    }
}

impl CrdTransf for LinearCrdTransf3d {
    fn initialize(&mut self, ends: EndNodes<'_>) -> FEAResult<()> {
        self.geom.initialize(ends)
    }

    fn update(&mut self, _ends: EndNodes<'_>) -> FEAResult<()> {
        Ok(())
    }

    fn initial_length(&self) -> f64 {
        self.geom.length()
    }

    fn deformed_length(&self) -> f64 {
        self.geom.length()
    }

    fn rotation(&self) -> &Mat3 {
        self.geom.rotation()
    }

    fn basic_trial_disp(&self, ends: EndNodes<'_>) -> Vec6 {
        let ug = self.geom.gather(ends, |n| n.trial_displacement().clone());
        self.geom.basic_from_global(&ug)
    }

    fn basic_incr_disp(&self, ends: EndNodes<'_>) -> Vec6 {
        let ug = self.geom.gather(ends, |n| n.incr_displacement());
        self.geom.basic_from_global(&ug)
    }

    fn basic_incr_delta_disp(&self, ends: EndNodes<'_>) -> Vec6 {
        let ug = self.geom.gather(ends, |n| n.incr_delta_displacement().clone());
        self.geom.basic_from_global(&ug)
    }

    fn global_resisting_force(&self, basic_force: &Vec6, p0: &Vec5) -> Vec12 {
        let pl = self.geom.local_force(basic_force, p0);
        self.geom.global_from_local_force(&pl)
    }

    fn global_stiff_matrix(&self, basic_stiff: &Mat6, _basic_force: &Vec6) -> Mat12 {
        self.global_initial_stiff_matrix(basic_stiff)
    }

    fn global_initial_stiff_matrix(&self, basic_stiff: &Mat6) -> Mat12 {
        let kl = self.geom.local_stiffness(basic_stiff);
        self.geom.global_from_local_stiffness(&kl)
    }

    fn point_global_coord_from_local(&self, ends: EndNodes<'_>, local: &Vec3) -> Vec3 {
        self.geom.point_global_coord_from_local(ends[0], local)
    }

    fn point_global_displ_from_basic(&self, ends: EndNodes<'_>, xi: f64, basic: &Vec6) -> Vec3 {
        self.geom.point_global_displ_from_basic(ends, xi, basic)
    }

    fn boxed_clone(&self) -> Box<dyn CrdTransf> {
        Box::new(self.clone())
    }

    fn send_self(&self, tag: i32, channel: &mut dyn Channel) -> FEAResult<()> {
        self.geom.send(CLASS_TAG_LINEAR_3D, tag, channel)
    }

    fn recv_self(&mut self, tag: i32, channel: &mut dyn Channel) -> FEAResult<()> {
        self.geom.recv(CLASS_TAG_LINEAR_3D, tag, channel)
    }
}
