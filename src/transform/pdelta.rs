//! P-Delta 3D frame transformation
//!
//! Same geometry as the linear transformation, plus the string stiffness of
//! the axial force acting through the transverse chord drift. The drift is
//! trial state: `update` sets it, `commit_state` accepts it.

use super::geometry::FrameGeometry;
use super::{CrdTransf, EndNodes, CLASS_TAG_PDELTA_3D};
use crate::channel::Channel;
use crate::error::FEAResult;
use crate::math::{Mat12, Mat3, Mat6, Vec12, Vec3, Vec5, Vec6};
use crate::state::{TrialCommit, TrialValue};

/// P-Delta transformation of a spatial frame element
#[derive(Debug, Clone)]
pub struct PDeltaCrdTransf3d {
    geom: FrameGeometry,
    /// Transverse chord drift `[Δy, Δz]` in local axes
    drift: TrialValue<[f64; 2]>,
}

impl PDeltaCrdTransf3d {
    /// Create a transformation from a vector lying in the local x-z plane
    pub fn new(vecxz: Vec3) -> Self {
        Self {
            geom: FrameGeometry::new(vecxz, None, None),
            drift: TrialValue::new([0.0; 2]),
        }
    }

    /// Create a transformation with rigid joint offsets (global coordinates) at both ends
    pub fn with_offsets(vecxz: Vec3, offset_i: Vec3, offset_j: Vec3) -> Self {
        Self {
            geom: FrameGeometry::new(vecxz, Some(offset_i), Some(offset_j)),
            drift: TrialValue::new([0.0; 2]),
        }
    }

    /// Trial chord drift `[Δy, Δz]`
    pub fn trial_drift(&self) -> [f64; 2] {
        *self.drift.trial()
    }

    pub fn committed_drift(&self) -> [f64; 2] {
        *self.drift.committed()
    }
}

impl Default for PDeltaCrdTransf3d {
    fn default() -> Self {
        Self::new(Vec3::z())
    }
}

impl TrialCommit for PDeltaCrdTransf3d {
    fn commit_state(&mut self) -> FEAResult<()> {
        self.drift.commit_state()
    }

    fn revert_to_last_commit(&mut self) -> FEAResult<()> {
        self.drift.revert_to_last_commit()
    }

    fn revert_to_start(&mut self) -> FEAResult<()> {
        self.drift.revert_to_start()
    }
}

impl CrdTransf for PDeltaCrdTransf3d {
    fn initialize(&mut self, ends: EndNodes<'_>) -> FEAResult<()> {
        self.geom.initialize(ends)
    }

    fn update(&mut self, ends: EndNodes<'_>) -> FEAResult<()> {
        let ug = self.geom.gather(ends, |n| n.trial_displacement().clone());
        let ul = self.geom.local_from_global(&ug);
        self.drift.set_trial([ul[7] - ul[1], ul[8] - ul[2]]);
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
        let mut pl = self.geom.local_force(basic_force, p0);

        let n_over_l = basic_force[0] / self.geom.length();
        let [dy, dz] = *self.drift.trial();
        pl[1] -= n_over_l * dy;
        pl[7] += n_over_l * dy;
        pl[2] -= n_over_l * dz;
        pl[8] += n_over_l * dz;

        self.geom.global_from_local_force(&pl)
    }

    fn global_stiff_matrix(&self, basic_stiff: &Mat6, basic_force: &Vec6) -> Mat12 {
        let mut kl = self.geom.local_stiffness(basic_stiff);

        let n_over_l = basic_force[0] / self.geom.length();
        for (a, b) in [(1, 7), (2, 8)] {
            kl[(a, a)] += n_over_l;
            kl[(b, b)] += n_over_l;
            kl[(a, b)] -= n_over_l;
            kl[(b, a)] -= n_over_l;
        }

        self.geom.global_from_local_stiffness(&kl)
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
        self.geom.send(CLASS_TAG_PDELTA_3D, tag, channel)
    }

    fn recv_self(&mut self, tag: i32, channel: &mut dyn Channel) -> FEAResult<()> {
        self.geom.recv(CLASS_TAG_PDELTA_3D, tag, channel)?;
        self.drift.reset();
        Ok(())
    }
}
