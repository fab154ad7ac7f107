//! Structural elements module

mod actuator;
mod beam;
mod node;
mod support;

pub use actuator::{Actuator, ActuatorConfig, CLASS_TAG_ACTUATOR};
pub use beam::{BeamSection, ElasticBeam3d, CLASS_TAG_ELASTIC_BEAM_3D};
pub use node::Node;
pub use support::Support;

use std::fmt;

use crate::channel::Channel;
use crate::error::{FEAError, FEAResult};
use crate::loads::ElementLoad;
use crate::math::{Mat, Vec};
use crate::results::Response;
use crate::state::TrialCommit;
use crate::transform::EndNodes;

/// A two-node element driven by the analysis
///
/// Matrices and vectors are sized `num_dof()`, ordered as the DOF of node i
/// followed by the DOF of node j.
pub trait Element: TrialCommit + fmt::Debug + Send {
    fn tag(&self) -> usize;

    /// Tags of the end nodes, i first
    fn node_tags(&self) -> [usize; 2];

    fn num_dof(&self) -> usize;

    /// Bind the end nodes and compute geometry
    fn set_domain(&mut self, ends: EndNodes<'_>) -> FEAResult<()>;

    /// Pull the current trial state from the end nodes
    fn update(&mut self, ends: EndNodes<'_>) -> FEAResult<()>;

    fn tangent_stiff(&self) -> Mat;

    fn initial_stiff(&self) -> Mat;

    fn mass(&self) -> Mat;

    /// Remove all element loads
    fn zero_load(&mut self);

    /// Add an element load scaled by `factor`
    fn add_load(&mut self, load: &ElementLoad, factor: f64) -> FEAResult<()>;

    /// Resisting force at pseudo-time `time`, element loads subtracted
    fn resisting_force(&mut self, ends: EndNodes<'_>, time: f64) -> FEAResult<Vec>;

    /// Resisting force including the inertia of the trial accelerations
    fn resisting_force_inc_inertia(&mut self, ends: EndNodes<'_>, time: f64) -> FEAResult<Vec> {
        let mut p = self.resisting_force(ends, time)?;
        let mut accel = Vec::zeros(self.num_dof());
        let half = self.num_dof() / 2;
        for (k, node) in ends.iter().enumerate() {
            let a = node.trial_acceleration();
            for i in 0..half.min(a.len()) {
                accel[k * half + i] = a[i];
            }
        }
        p += self.mass() * accel;
        Ok(p)
    }

    /// Name-based query; unsupported names yield `None`
    fn response(&self, name: &str) -> Option<Response>;

    fn send_self(&self, tag: i32, channel: &mut dyn Channel) -> FEAResult<()>;

    fn recv_self(&mut self, tag: i32, channel: &mut dyn Channel) -> FEAResult<()>;
}

/// Tags as wire identifiers
pub(crate) fn wire_ids<const N: usize>(tags: [usize; N]) -> FEAResult<[i32; N]> {
    let mut ids = [0i32; N];
    for (id, tag) in ids.iter_mut().zip(tags) {
        *id = i32::try_from(tag)
            .map_err(|_| FEAError::InvalidInput(format!("tag {tag} does not fit the wire")))?;
    }
    Ok(ids)
}

pub(crate) fn from_wire_ids<const N: usize>(ids: [i32; N]) -> FEAResult<[usize; N]> {
    let mut tags = [0usize; N];
    for (tag, id) in tags.iter_mut().zip(ids) {
        *tag = usize::try_from(id)
            .map_err(|_| FEAError::InvalidInput(format!("negative tag {id} received")))?;
    }
    Ok(tags)
}
