//! Elastic 3D beam-column driven through a coordinate transformation

use serde::{Deserialize, Serialize};

use super::{from_wire_ids, wire_ids, Element};
use crate::channel::Channel;
use crate::error::{FEAError, FEAResult};
use crate::loads::ElementLoad;
use crate::math::{self, Mat, Mat6, Vec, Vec5, Vec6};
use crate::results::Response;
use crate::state::TrialCommit;
use crate::transform::{CrdTransf, EndNodes};

/// Class tag written by [`ElasticBeam3d::send_self`]
pub const CLASS_TAG_ELASTIC_BEAM_3D: f64 = 5.0;

const PERSIST_SIZE: usize = 8;

/// Elastic section properties
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamSection {
    /// Modulus of elasticity
    pub e: f64,
    /// Shear modulus
    pub g: f64,
    /// Cross-sectional area
    pub a: f64,
    /// Moment of inertia about local y axis
    pub iy: f64,
    /// Moment of inertia about local z axis
    pub iz: f64,
    /// Torsional constant
    pub j: f64,
}

impl BeamSection {
    pub fn new(e: f64, g: f64, a: f64, iy: f64, iz: f64, j: f64) -> Self {
        Self { e, g, a, iy, iz, j }
    }
}

/// Two-node 6-DOF frame element with a linear elastic basic stiffness
#[derive(Debug, Clone)]
pub struct ElasticBeam3d {
    tag: usize,
    nodes: [usize; 2],
    section: BeamSection,
    /// Mass per unit length
    rho: f64,
    transf: Box<dyn CrdTransf>,
    kb: Mat6,
    /// Trial basic deformations
    ub: Vec6,
    /// Reactions of element loads
    p0: Vec5,
    /// Fixed-end forces of element loads
    q0: Vec6,
}

impl ElasticBeam3d {
    pub fn new(
        tag: usize,
        i_node: usize,
        j_node: usize,
        section: BeamSection,
        transf: Box<dyn CrdTransf>,
    ) -> Self {
        Self {
            tag,
            nodes: [i_node, j_node],
            section,
            rho: 0.0,
            transf,
            kb: Mat6::zeros(),
            ub: Vec6::zeros(),
            p0: Vec5::zeros(),
            q0: Vec6::zeros(),
        }
    }

    pub fn with_mass(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }

    pub fn section(&self) -> &BeamSection {
        &self.section
    }

    pub fn transformation(&self) -> &dyn CrdTransf {
        self.transf.as_ref()
    }

    /// Basic forces `q = kb·ub + q0`
    pub fn basic_force(&self) -> Vec6 {
        self.kb * self.ub + self.q0
    }

    fn global_force(&self) -> Vec {
        let p = self.transf.global_resisting_force(&self.basic_force(), &self.p0);
        Vec::from_column_slice(p.as_slice())
    }
}

impl TrialCommit for ElasticBeam3d {
    fn commit_state(&mut self) -> FEAResult<()> {
        self.transf.commit_state()
    }

    fn revert_to_last_commit(&mut self) -> FEAResult<()> {
        self.transf.revert_to_last_commit()
    }

    fn revert_to_start(&mut self) -> FEAResult<()> {
        self.ub = Vec6::zeros();
        self.transf.revert_to_start()
    }
}

impl Element for ElasticBeam3d {
    fn tag(&self) -> usize {
        self.tag
    }

    fn node_tags(&self) -> [usize; 2] {
        self.nodes
    }

    fn num_dof(&self) -> usize {
        12
    }

    fn set_domain(&mut self, ends: EndNodes<'_>) -> FEAResult<()> {
        self.transf.initialize(ends)?;
        let s = &self.section;
        self.kb = math::basic_frame_stiffness(
            s.e,
            s.g,
            s.a,
            s.iy,
            s.iz,
            s.j,
            self.transf.initial_length(),
        );
        Ok(())
    }

    fn update(&mut self, ends: EndNodes<'_>) -> FEAResult<()> {
        self.transf.update(ends)?;
        self.ub = self.transf.basic_trial_disp(ends);
        Ok(())
    }

    fn tangent_stiff(&self) -> Mat {
        let k = self.transf.global_stiff_matrix(&self.kb, &self.basic_force());
        Mat::from_column_slice(12, 12, k.as_slice())
    }

    fn initial_stiff(&self) -> Mat {
        let k = self.transf.global_initial_stiff_matrix(&self.kb);
        Mat::from_column_slice(12, 12, k.as_slice())
    }

    fn mass(&self) -> Mat {
        let mut m = Mat::zeros(12, 12);
        let lumped = 0.5 * self.rho * self.transf.initial_length();
        for i in 0..3 {
            m[(i, i)] = lumped;
            m[(i + 6, i + 6)] = lumped;
        }
        m
    }

    fn zero_load(&mut self) {
        self.p0 = Vec5::zeros();
        self.q0 = Vec6::zeros();
    }

    fn add_load(&mut self, load: &ElementLoad, factor: f64) -> FEAResult<()> {
        let load = load.scaled(factor);
        let l = self.transf.initial_length();
        self.p0 += load.end_reactions(l);
        self.q0 += load.fixed_end_forces(l);
        Ok(())
    }

    fn resisting_force(&mut self, _ends: EndNodes<'_>, _time: f64) -> FEAResult<Vec> {
        Ok(self.global_force())
    }

    fn response(&self, name: &str) -> Option<Response> {
        match name {
            "force" | "globalForce" => Some(Response::vector(&self.global_force())),
            "basicForce" => Some(Response::Vector(self.basic_force().iter().copied().collect())),
            "deformation" | "basicDeformation" => {
                Some(Response::Vector(self.ub.iter().copied().collect()))
            }
            "basicStiffness" => Some(Response::Matrix {
                rows: 6,
                cols: 6,
                data: self.kb.as_slice().to_vec(),
            }),
            _ => None,
        }
    }

    fn send_self(&self, tag: i32, channel: &mut dyn Channel) -> FEAResult<()> {
        let s = &self.section;
        let data: [f64; PERSIST_SIZE] = [
            CLASS_TAG_ELASTIC_BEAM_3D,
            s.e,
            s.g,
            s.a,
            s.iy,
            s.iz,
            s.j,
            self.rho,
        ];
        channel.send_vector(tag, &data)?;
        channel.send_id(tag, &wire_ids([self.tag, self.nodes[0], self.nodes[1]])?)?;
        self.transf.send_self(tag, channel)
    }

    fn recv_self(&mut self, tag: i32, channel: &mut dyn Channel) -> FEAResult<()> {
        let mut data = [0.0; PERSIST_SIZE];
        channel.recv_vector(tag, &mut data)?;
        if data[0] != CLASS_TAG_ELASTIC_BEAM_3D {
            return Err(FEAError::InvalidInput(format!(
                "expected elastic beam class, received {}",
                data[0]
            )));
        }
        let mut ids = [0i32; 3];
        channel.recv_id(tag, &mut ids)?;
        let [t, i, j] = from_wire_ids(ids)?;

        self.transf.recv_self(tag, channel)?;
        self.tag = t;
        self.nodes = [i, j];
        self.section = BeamSection::new(data[1], data[2], data[3], data[4], data[5], data[6]);
        self.rho = data[7];
        self.ub = Vec6::zeros();
        self.zero_load();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::MemoryChannel;
    use crate::elements::Node;
    use crate::math::Vec3;
    use crate::transform::{LinearCrdTransf3d, PDeltaCrdTransf3d};
    use approx::assert_relative_eq;

    fn section() -> BeamSection {
        BeamSection::new(200e9, 77e9, 0.01, 2e-5, 8e-5, 1e-5)
    }

    fn beam() -> (ElasticBeam3d, Node, Node) {
        let ni = Node::frame(1, 0.0, 0.0, 0.0);
        let nj = Node::frame(2, 4.0, 0.0, 0.0);
        let mut b = ElasticBeam3d::new(1, 1, 2, section(), Box::new(LinearCrdTransf3d::new(Vec3::z())));
        b.set_domain([&ni, &nj]).unwrap();
        (b, ni, nj)
    }

    #[test]
    fn test_axial_stiffness() {
        let (b, _, _) = beam();
        let k = b.tangent_stiff();
        let ea_l = 200e9 * 0.01 / 4.0;
        assert_relative_eq!(k[(0, 0)], ea_l, max_relative = 1e-12);
        assert_relative_eq!(k[(0, 6)], -ea_l, max_relative = 1e-12);
        // 12EI/L³ in the local y direction
        assert_relative_eq!(k[(1, 1)], 12.0 * 200e9 * 8e-5 / 64.0, max_relative = 1e-12);
        assert_relative_eq!(k, k.transpose(), max_relative = 1e-12);
    }

    #[test]
    fn test_force_follows_displacement() {
        let (mut b, ni, mut nj) = beam();
        let mut d = Vec::zeros(6);
        d[0] = 1e-4;
        nj.set_trial_displacement(d).unwrap();
        b.update([&ni, &nj]).unwrap();

        let p = b.resisting_force([&ni, &nj], 1.0).unwrap();
        let n = 200e9 * 0.01 / 4.0 * 1e-4;
        assert_relative_eq!(p[6], n, max_relative = 1e-12);
        assert_relative_eq!(p[0], -n, max_relative = 1e-12);
        assert_eq!(b.response("basicForce").unwrap().values()[0], b.basic_force()[0]);
        assert!(b.response("plasticStrain").is_none());
    }

    #[test]
    fn test_uniform_load_is_balanced() {
        let (mut b, ni, nj) = beam();
        b.update([&ni, &nj]).unwrap();
        b.add_load(&ElementLoad::uniform(0.0, -5.0, 0.0), 2.0).unwrap();

        let p = b.resisting_force([&ni, &nj], 0.0).unwrap();
        // resisting force of a fixed-fixed span carrying 10 per unit length
        assert_relative_eq!(p[1] + p[7], 40.0, max_relative = 1e-12);
        assert_relative_eq!(p[5], 10.0 * 16.0 / 12.0, max_relative = 1e-12);

        b.zero_load();
        assert_relative_eq!(b.resisting_force([&ni, &nj], 0.0).unwrap().norm(), 0.0);
    }

    #[test]
    fn test_lumped_mass_and_inertia() {
        let (b, ni, mut nj) = beam();
        let mut b = b.with_mass(3.0);
        let m = b.mass();
        assert_relative_eq!(m[(0, 0)], 6.0);
        assert_eq!(m[(3, 3)], 0.0);

        let mut a = Vec::zeros(6);
        a[1] = 2.0;
        nj.set_trial_acceleration(a).unwrap();
        let p = b.resisting_force_inc_inertia([&ni, &nj], 0.0).unwrap();
        assert_relative_eq!(p[7], 12.0, max_relative = 1e-12);
    }

    #[test]
    fn test_persistence_round_trip() {
        let (b, _, _) = beam();
        let b = b.with_mass(1.5);
        let mut ch = MemoryChannel::new();
        b.send_self(3, &mut ch).unwrap();
        ch.loopback();

        let mut copy = ElasticBeam3d::new(
            0,
            0,
            0,
            BeamSection::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0),
            Box::new(LinearCrdTransf3d::default()),
        );
        copy.recv_self(3, &mut ch).unwrap();
        assert_eq!(copy.tag(), 1);
        assert_eq!(copy.node_tags(), [1, 2]);
        assert_eq!(copy.section(), &section());

        // a transformation of another class refuses the stream
        b.send_self(3, &mut ch).unwrap();
        ch.loopback();
        let mut wrong = ElasticBeam3d::new(
            0,
            0,
            0,
            section(),
            Box::new(PDeltaCrdTransf3d::default()),
        );
        assert!(wrong.recv_self(3, &mut ch).is_err());
    }
}
