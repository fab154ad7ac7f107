//! Geometry shared by the 3D frame transformations

use log::debug;

use super::{EndNodes, PERSIST_REVISION};
use crate::channel::Channel;
use crate::elements::Node;
use crate::error::{FEAError, FEAResult};
use crate::math::{
    self, Mat12, Mat3, Mat6, Mat6x12, Vec, Vec12, Vec3, Vec5, Vec6, GEOMETRY_TOL,
};

const PERSIST_SIZE: usize = 13;

/// Length, orientation and rigid offsets of a two-node frame element
#[derive(Debug, Clone)]
pub(crate) struct FrameGeometry {
    /// Vector in the local x-z plane
    vecxz: Vec3,
    offset_i: Option<Vec3>,
    offset_j: Option<Vec3>,
    length: f64,
    r: Mat3,
    /// Local end displacements from global ones, offsets included
    t_lg: Mat12,
    /// Basic deformations from local end displacements
    a_bl: Mat6x12,
}

impl FrameGeometry {
    pub fn new(vecxz: Vec3, offset_i: Option<Vec3>, offset_j: Option<Vec3>) -> Self {
        Self {
            vecxz,
            offset_i,
            offset_j,
            length: 0.0,
            r: Mat3::identity(),
            t_lg: Mat12::zeros(),
            a_bl: Mat6x12::zeros(),
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn rotation(&self) -> &Mat3 {
        &self.r
    }

    pub fn initialize(&mut self, ends: EndNodes<'_>) -> FEAResult<()> {
        for node in ends {
            if node.num_dof() != 6 {
                return Err(FEAError::DofMismatch(format!(
                    "3D frame transformation needs 6 DOF at node {}, found {}",
                    node.tag,
                    node.num_dof()
                )));
            }
        }
        self.compute_length_and_orientation(ends)
    }

    fn compute_length_and_orientation(&mut self, [node_i, node_j]: EndNodes<'_>) -> FEAResult<()> {
        let mut dx = node_j.coordinates() - node_i.coordinates();
        if let Some(o) = &self.offset_j {
            dx += o;
        }
        if let Some(o) = &self.offset_i {
            dx -= o;
        }

        let length = dx.norm();
        if length < GEOMETRY_TOL {
            return Err(FEAError::ZeroLength {
                i_node: node_i.tag,
                j_node: node_j.tag,
            });
        }

        let x_axis = dx / length;

        // Gram-Schmidt: strip the x component from the user vector
        let v_norm = self.vecxz.norm();
        let z_raw = self.vecxz - x_axis * self.vecxz.dot(&x_axis);
        let z_norm = z_raw.norm();
        if v_norm < GEOMETRY_TOL || z_norm < GEOMETRY_TOL * v_norm {
            return Err(FEAError::DegenerateAxis);
        }
        let z_axis = z_raw / z_norm;
        let y_axis = z_axis.cross(&x_axis);

        self.length = length;
        self.r = Mat3::from_rows(&[x_axis.transpose(), y_axis.transpose(), z_axis.transpose()]);

        let mut offsets = Mat12::identity();
        if let Some(o) = &self.offset_i {
            offsets.fixed_view_mut::<6, 6>(0, 0).copy_from(&math::rigid_offset_matrix(o));
        }
        if let Some(o) = &self.offset_j {
            offsets.fixed_view_mut::<6, 6>(6, 6).copy_from(&math::rigid_offset_matrix(o));
        }
        self.t_lg = math::block_diagonal(&self.r) * offsets;
        self.a_bl = math::basic_from_local(length);

        debug!(
            "frame geometry for nodes {}-{}: L = {:.6}",
            node_i.tag, node_j.tag, length
        );
        Ok(())
    }

    /// Stack a per-node quantity of both ends into a 12-vector
    pub fn gather<F>(&self, [node_i, node_j]: EndNodes<'_>, field: F) -> Vec12
    where
        F: Fn(&Node) -> Vec,
    {
        let mut ug = Vec12::zeros();
        let (a, b) = (field(node_i), field(node_j));
        for k in 0..6 {
            ug[k] = a[k];
            ug[k + 6] = b[k];
        }
        ug
    }

    pub fn local_from_global(&self, ug: &Vec12) -> Vec12 {
        self.t_lg * ug
    }

    pub fn basic_from_global(&self, ug: &Vec12) -> Vec6 {
        self.a_bl * (self.t_lg * ug)
    }

    /// Local end forces from basic forces plus fixed-end reactions
    pub fn local_force(&self, q: &Vec6, p0: &Vec5) -> Vec12 {
        let mut pl = self.a_bl.transpose() * q;
        pl[0] += p0[0];
        pl[1] += p0[1];
        pl[7] += p0[2];
        pl[2] += p0[3];
        pl[8] += p0[4];
        pl
    }

    pub fn global_from_local_force(&self, pl: &Vec12) -> Vec12 {
        self.t_lg.transpose() * pl
    }

    /// `Tᵀ kb T` expressed in local end coordinates
    pub fn local_stiffness(&self, kb: &Mat6) -> Mat12 {
        self.a_bl.transpose() * kb * self.a_bl
    }

    pub fn global_from_local_stiffness(&self, kl: &Mat12) -> Mat12 {
        self.t_lg.transpose() * kl * self.t_lg
    }

    pub fn point_global_coord_from_local(&self, node_i: &Node, local: &Vec3) -> Vec3 {
        let mut xg = node_i.coordinates() + self.r.transpose() * local;
        if let Some(o) = &self.offset_i {
            xg += o;
        }
        xg
    }

    pub fn point_global_displ_from_basic(&self, ends: EndNodes<'_>, xi: f64, basic: &Vec6) -> Vec3 {
        let ul = self.local_from_global(&self.gather(ends, |n| n.trial_displacement().clone()));
        let l = self.length;
        let (_, n2, _, n4) = math::hermite(xi);

        let u = ul[0] + xi * basic[0];
        let v = (1.0 - xi) * ul[1] + xi * ul[7] + l * (n2 * basic[1] + n4 * basic[2]);
        let w = (1.0 - xi) * ul[2] + xi * ul[8] - l * (n2 * basic[3] + n4 * basic[4]);

        self.r.transpose() * Vec3::new(u, v, w)
    }

    pub fn send(&self, class_tag: f64, tag: i32, channel: &mut dyn Channel) -> FEAResult<()> {
        let mut data = [0.0; PERSIST_SIZE];
        data[0] = class_tag;
        data[1] = PERSIST_REVISION;
        data[2..5].copy_from_slice(self.vecxz.as_slice());
        if let Some(o) = &self.offset_i {
            data[5] = 1.0;
            data[6..9].copy_from_slice(o.as_slice());
        }
        if let Some(o) = &self.offset_j {
            data[9] = 1.0;
            data[10..13].copy_from_slice(o.as_slice());
        }
        channel.send_vector(tag, &data)
    }

    pub fn recv(&mut self, class_tag: f64, tag: i32, channel: &mut dyn Channel) -> FEAResult<()> {
        let mut data = [0.0; PERSIST_SIZE];
        channel.recv_vector(tag, &mut data)?;
        if data[0] != class_tag {
            return Err(FEAError::InvalidInput(format!(
                "expected transformation class {class_tag}, received {}",
                data[0]
            )));
        }
        if data[1] != PERSIST_REVISION {
            return Err(FEAError::InvalidInput(format!(
                "unsupported transformation revision {}",
                data[1]
            )));
        }
        let offset = |flag: f64, at: usize| (flag != 0.0).then(|| Vec3::from_column_slice(&data[at..at + 3]));
        *self = Self::new(
            Vec3::from_column_slice(&data[2..5]),
            offset(data[5], 6),
            offset(data[9], 10),
        );
        Ok(())
    }
}
