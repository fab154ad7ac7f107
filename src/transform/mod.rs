//! Coordinate transformations between the basic and global systems
//!
//! A transformation owns the geometry of a two-node frame element (length,
//! orientation, rigid joint offsets) and pushes basic forces and stiffness
//! forward to the 12 global end DOFs. Node state is borrowed per call from the
//! model's registry and never mutated here.

mod geometry;
mod linear;
mod pdelta;

pub use linear::LinearCrdTransf3d;
pub use pdelta::PDeltaCrdTransf3d;

use std::fmt;

use crate::channel::Channel;
use crate::elements::Node;
use crate::error::FEAResult;
use crate::math::{Mat12, Mat3, Mat6, Vec12, Vec3, Vec5, Vec6};
use crate::state::TrialCommit;

/// The two end nodes of an element, borrowed from the model
pub type EndNodes<'a> = [&'a Node; 2];

/// Class tag written by [`LinearCrdTransf3d::send_self`]
pub const CLASS_TAG_LINEAR_3D: f64 = 1.0;
/// Class tag written by [`PDeltaCrdTransf3d::send_self`]
pub const CLASS_TAG_PDELTA_3D: f64 = 2.0;
/// Revision of the persisted parameter layout
pub const PERSIST_REVISION: f64 = 1.0;

/// 3D frame coordinate transformation
///
/// Every variant implements every operation, including the trial/commit
/// lifecycle, so elements can drive any transformation uniformly.
pub trait CrdTransf: TrialCommit + fmt::Debug + Send {
    /// Bind the end nodes and compute length and orientation
    fn initialize(&mut self, ends: EndNodes<'_>) -> FEAResult<()>;

    /// Refresh configuration-dependent quantities from the trial state
    fn update(&mut self, ends: EndNodes<'_>) -> FEAResult<()>;

    /// Undeformed element length
    fn initial_length(&self) -> f64;

    fn deformed_length(&self) -> f64;

    /// Global-to-local rotation; rows are the local x, y, z axes
    fn rotation(&self) -> &Mat3;

    /// Basic deformations `[axial, θz_i, θz_j, θy_i, θy_j, twist]` from the trial displacements
    fn basic_trial_disp(&self, ends: EndNodes<'_>) -> Vec6;

    /// Basic deformations accumulated since the last commit
    fn basic_incr_disp(&self, ends: EndNodes<'_>) -> Vec6;

    /// Basic deformations from the most recent trial update
    fn basic_incr_delta_disp(&self, ends: EndNodes<'_>) -> Vec6;

    /// Global end forces from basic forces and fixed-end reactions of element loads
    fn global_resisting_force(&self, basic_force: &Vec6, p0: &Vec5) -> Vec12;

    /// Global tangent stiffness from the basic stiffness and current basic forces
    fn global_stiff_matrix(&self, basic_stiff: &Mat6, basic_force: &Vec6) -> Mat12;

    /// Global stiffness without any force-dependent term
    fn global_initial_stiff_matrix(&self, basic_stiff: &Mat6) -> Mat12;

    /// Global coordinates of a point given in local coordinates relative to end i
    fn point_global_coord_from_local(&self, ends: EndNodes<'_>, local: &Vec3) -> Vec3;

    /// Global displacement at normalized position `xi` from the basic deformations
    fn point_global_displ_from_basic(&self, ends: EndNodes<'_>, xi: f64, basic: &Vec6) -> Vec3;

    fn boxed_clone(&self) -> Box<dyn CrdTransf>;

    /// Write the construction parameters to `channel`
    fn send_self(&self, tag: i32, channel: &mut dyn Channel) -> FEAResult<()>;

    /// Restore construction parameters written by `send_self`
    fn recv_self(&mut self, tag: i32, channel: &mut dyn Channel) -> FEAResult<()>;
}

impl Clone for Box<dyn CrdTransf> {
    fn clone(&self) -> Self {
        self.boxed_clone()
    }
}
