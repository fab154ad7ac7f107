//! Actuator element - an axial member whose response comes from a remote peer
//!
//! Instead of a constitutive law the element reports its basic displacement
//! to an experimental control and receives a target displacement back. The
//! resisting force is the proportional error `EA/L·(db − target)`.

use log::warn;
use serde::{Deserialize, Serialize};

use super::{from_wire_ids, wire_ids, Element};
use crate::channel::{Channel, Connector, TcpConnector};
use crate::config::LinkConfig;
use crate::error::{FEAError, FEAResult};
use crate::hybrid::RemoteActuatorLink;
use crate::loads::ElementLoad;
use crate::math::{Mat, Vec, GEOMETRY_TOL};
use crate::results::Response;
use crate::state::TrialCommit;
use crate::transform::EndNodes;

/// Class tag written by [`Actuator::send_self`]
pub const CLASS_TAG_ACTUATOR: f64 = 12.0;

const PERSIST_SIZE: usize = 7;

/// Construction parameters of an [`Actuator`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActuatorConfig {
    /// Problem dimension, 1 to 3
    pub dim: usize,
    /// Axial stiffness
    pub ea: f64,
    /// Mass per unit length
    #[serde(default)]
    pub rho: f64,
}

impl ActuatorConfig {
    pub fn new(dim: usize, ea: f64) -> Self {
        Self { dim, ea, rho: 0.0 }
    }

    pub fn with_mass(mut self, rho: f64) -> Self {
        self.rho = rho;
        self
    }
}

/// Element DOF for a problem dimension and node DOF count
fn element_dof(dim: usize, node_dof: usize) -> Option<usize> {
    match (dim, node_dof) {
        (1, 1) => Some(2),
        (2, 2) => Some(4),
        (2, 3) | (3, 3) => Some(6),
        (3, 6) => Some(12),
        _ => None,
    }
}

/// Two-node actuator coupled to an experimental control
#[derive(Debug)]
pub struct Actuator<C: Connector> {
    tag: usize,
    nodes: [usize; 2],
    config: ActuatorConfig,
    /// Port recorded for persistence
    port: u16,
    num_dof: usize,
    length: f64,
    cos_x: [f64; 3],
    link: RemoteActuatorLink<C>,
    /// Trial basic displacement
    db: f64,
    /// Basic force from the last resisting force evaluation
    q: f64,
    load: Vec,
    force: Vec,
}

impl Actuator<TcpConnector> {
    /// Actuator listening for its experimental control on `link.port`
    pub fn tcp(tag: usize, i_node: usize, j_node: usize, config: ActuatorConfig, link: LinkConfig) -> Self {
        let port = link.port;
        Self::new(tag, i_node, j_node, config, TcpConnector::new(link)).with_port(port)
    }
}

impl<C: Connector> Actuator<C> {
    pub fn new(tag: usize, i_node: usize, j_node: usize, config: ActuatorConfig, connector: C) -> Self {
        Self {
            tag,
            nodes: [i_node, j_node],
            config,
            port: 0,
            num_dof: 2,
            length: 0.0,
            cos_x: [0.0; 3],
            link: RemoteActuatorLink::new(connector),
            db: 0.0,
            q: 0.0,
            load: Vec::zeros(2),
            force: Vec::zeros(2),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn config(&self) -> &ActuatorConfig {
        &self.config
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn direction_cosines(&self) -> [f64; 3] {
        self.cos_x
    }

    pub fn link(&self) -> &RemoteActuatorLink<C> {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut RemoteActuatorLink<C> {
        &mut self.link
    }

    /// Trial basic displacement
    pub fn basic_displacement(&self) -> f64 {
        self.db
    }

    pub fn basic_force(&self) -> f64 {
        self.q
    }

    fn stiffness(&self) -> Mat {
        let mut k = Mat::zeros(self.num_dof, self.num_dof);
        let half = self.num_dof / 2;
        let ea_l = self.config.ea / self.length;
        for i in 0..self.config.dim {
            for j in 0..self.config.dim {
                let kij = self.cos_x[i] * self.cos_x[j] * ea_l;
                k[(i, j)] = kij;
                k[(i + half, j)] = -kij;
                k[(i, j + half)] = -kij;
                k[(i + half, j + half)] = kij;
            }
        }
        k
    }

    fn local_force(&self) -> Vec {
        let mut p = Vec::zeros(self.num_dof);
        p[0] = -self.q;
        p[self.num_dof / 2] = self.q;
        p
    }
}

impl<C: Connector> TrialCommit for Actuator<C> {
    fn commit_state(&mut self) -> FEAResult<()> {
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> FEAResult<()> {
        warn!(
            "Actuator {}: can't revert to last commit, element is connected to an external process",
            self.tag
        );
        Err(FEAError::Unsupported(format!(
            "actuator {} cannot revert to last commit",
            self.tag
        )))
    }

    fn revert_to_start(&mut self) -> FEAResult<()> {
        warn!(
            "Actuator {}: can't revert to start, element is connected to an external process",
            self.tag
        );
        Err(FEAError::Unsupported(format!(
            "actuator {} cannot revert to start",
            self.tag
        )))
    }
}

impl<C> Element for Actuator<C>
where
    C: Connector + std::fmt::Debug + Send,
    C::Channel: std::fmt::Debug + Send,
{
    fn tag(&self) -> usize {
        self.tag
    }

    fn node_tags(&self) -> [usize; 2] {
        self.nodes
    }

    fn num_dof(&self) -> usize {
        self.num_dof
    }

    fn set_domain(&mut self, [node_i, node_j]: EndNodes<'_>) -> FEAResult<()> {
        let (dof_i, dof_j) = (node_i.num_dof(), node_j.num_dof());
        if dof_i != dof_j {
            return Err(FEAError::DofMismatch(format!(
                "actuator {}: nodes {} and {} have differing DOF ({dof_i} and {dof_j})",
                self.tag, node_i.tag, node_j.tag
            )));
        }
        let dim = self.config.dim;
        self.num_dof = element_dof(dim, dof_i).ok_or_else(|| {
            FEAError::DofMismatch(format!(
                "actuator {}: can not handle {dof_i} DOF at nodes in a {dim}D problem",
                self.tag
            ))
        })?;

        let mut dx = [0.0; 3];
        for (i, d) in dx.iter_mut().enumerate().take(dim) {
            *d = node_j.coords[i] - node_i.coords[i];
        }
        let length = dx.iter().map(|d| d * d).sum::<f64>().sqrt();
        if length < GEOMETRY_TOL {
            return Err(FEAError::ZeroLength {
                i_node: node_i.tag,
                j_node: node_j.tag,
            });
        }

        self.length = length;
        self.cos_x = dx.map(|d| d / length);
        self.load = Vec::zeros(self.num_dof);
        self.force = Vec::zeros(self.num_dof);
        Ok(())
    }

    fn update(&mut self, [node_i, node_j]: EndNodes<'_>) -> FEAResult<()> {
        self.link.connect()?;

        let (u1, u2) = (node_i.trial_displacement(), node_j.trial_displacement());
        self.db = (0..self.config.dim)
            .map(|i| (u2[i] - u1[i]) * self.cos_x[i])
            .sum();
        Ok(())
    }

    fn tangent_stiff(&self) -> Mat {
        self.stiffness()
    }

    fn initial_stiff(&self) -> Mat {
        self.stiffness()
    }

    fn mass(&self) -> Mat {
        let mut m = Mat::zeros(self.num_dof, self.num_dof);
        if self.length != 0.0 && self.config.rho != 0.0 {
            let lumped = 0.5 * self.config.rho * self.length;
            let half = self.num_dof / 2;
            for i in 0..self.config.dim {
                m[(i, i)] = lumped;
                m[(i + half, i + half)] = lumped;
            }
        }
        m
    }

    fn zero_load(&mut self) {
        self.load.fill(0.0);
    }

    fn add_load(&mut self, _load: &ElementLoad, _factor: f64) -> FEAResult<()> {
        warn!("Actuator {}: element loads are not supported", self.tag);
        Err(FEAError::Unsupported(format!(
            "element load on actuator {}",
            self.tag
        )))
    }

    fn resisting_force(&mut self, _ends: EndNodes<'_>, time: f64) -> FEAResult<Vec> {
        self.link.sync(time)?;

        let target = self.link.target_disp()?;
        self.q = self.config.ea / self.length * (self.db - target);
        self.link.set_measured(self.db, -self.q)?;

        let half = self.num_dof / 2;
        let mut p = Vec::zeros(self.num_dof);
        for i in 0..self.config.dim {
            p[i] = -self.cos_x[i] * self.q;
            p[i + half] = self.cos_x[i] * self.q;
        }
        p -= &self.load;
        self.force = p.clone();
        Ok(p)
    }

    fn response(&self, name: &str) -> Option<Response> {
        match name {
            "force" | "forces" | "globalForce" | "globalForces" => Some(Response::vector(&self.force)),
            "localForce" | "localForces" => Some(Response::vector(&self.local_force())),
            "basicForce" | "basicForces" => Some(Response::Vector(vec![self.q])),
            "deformation" | "deformations" | "basicDeformation" | "basicDeformations"
            | "targetDisplacement" | "targetDisplacements" => {
                self.link.target_disp().ok().map(|d| Response::Vector(vec![d]))
            }
            "measuredDisplacement" | "measuredDisplacements" => {
                self.link.measured_disp().ok().map(|d| Response::Vector(vec![d]))
            }
            "stiffness" => Some(Response::matrix(&self.stiffness())),
            _ => None,
        }
    }

    fn send_self(&self, tag: i32, channel: &mut dyn Channel) -> FEAResult<()> {
        let data: [f64; PERSIST_SIZE] = [
            CLASS_TAG_ACTUATOR,
            self.tag as f64,
            self.config.dim as f64,
            self.num_dof as f64,
            self.config.ea,
            f64::from(self.port),
            self.config.rho,
        ];
        channel.send_vector(tag, &data)?;
        channel.send_id(tag, &wire_ids(self.nodes)?)
    }

    fn recv_self(&mut self, tag: i32, channel: &mut dyn Channel) -> FEAResult<()> {
        let mut data = [0.0; PERSIST_SIZE];
        channel.recv_vector(tag, &mut data)?;
        if data[0] != CLASS_TAG_ACTUATOR {
            return Err(FEAError::InvalidInput(format!(
                "expected actuator class, received {}",
                data[0]
            )));
        }
        let mut ids = [0i32; 2];
        channel.recv_id(tag, &mut ids)?;

        let (dim, num_dof) = (data[2] as usize, data[3] as usize);
        if ![1, 2, 3, 6].into_iter().any(|nd| element_dof(dim, nd) == Some(num_dof)) {
            return Err(FEAError::DofMismatch(format!(
                "actuator {} received {} DOF for dimension {}",
                data[1], num_dof, dim
            )));
        }
        let nodes = from_wire_ids(ids)?;

        self.tag = data[1] as usize;
        self.config = ActuatorConfig::new(dim, data[4]).with_mass(data[6]);
        self.num_dof = num_dof;
        self.port = data[5] as u16;
        self.nodes = nodes;
        self.load = Vec::zeros(num_dof);
        self.force = Vec::zeros(num_dof);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{MemoryChannel, MemoryConnector};
    use crate::elements::Node;
    use crate::hybrid::{DataSizes, LinkState, RemoteAction};
    use approx::assert_relative_eq;

    fn offline(dim: usize) -> Actuator<MemoryConnector> {
        Actuator::new(1, 1, 2, ActuatorConfig::new(dim, 100.0), MemoryConnector::default())
    }

    fn scripted(targets: &[f64]) -> MemoryConnector {
        let mut ch = MemoryChannel::new();
        ch.push_id(DataSizes::scalar(3).to_wire().unwrap().to_vec());
        for &t in targets {
            ch.push_vector(vec![RemoteAction::GetForce.code(), 0.0, 0.0]);
            ch.push_vector(vec![RemoteAction::SetTrialResponse.code(), t, 0.0]);
        }
        MemoryConnector::new(ch)
    }

    #[test]
    fn test_dof_table() {
        let cases = [(1, 1, 2), (2, 2, 4), (2, 3, 6), (3, 3, 6), (3, 6, 12)];
        for (dim, ndof, expected) in cases {
            let ni = Node::new(1, [0.0; 3], ndof);
            let nj = Node::new(2, [1.0, 0.0, 0.0], ndof);
            let mut a = offline(dim);
            a.set_domain([&ni, &nj]).unwrap();
            assert_eq!(a.num_dof(), expected, "dim {dim}, ndof {ndof}");
        }

        let ni = Node::new(1, [0.0; 3], 6);
        let nj = Node::new(2, [1.0, 0.0, 0.0], 6);
        assert!(matches!(offline(2).set_domain([&ni, &nj]), Err(FEAError::DofMismatch(_))));

        let nj = Node::new(2, [1.0, 0.0, 0.0], 3);
        assert!(matches!(offline(3).set_domain([&ni, &nj]), Err(FEAError::DofMismatch(_))));
    }

    #[test]
    fn test_zero_length() {
        let ni = Node::new(1, [0.0, 0.0, 0.0], 2);
        let nj = Node::new(2, [0.0, 0.0, 5.0], 2);
        // the out-of-plane coordinate does not count in 2D
        assert!(matches!(
            offline(2).set_domain([&ni, &nj]),
            Err(FEAError::ZeroLength { .. })
        ));
    }

    #[test]
    fn test_stiffness_and_mass() {
        let ni = Node::new(1, [0.0, 0.0, 0.0], 2);
        let nj = Node::new(2, [3.0, 4.0, 0.0], 2);
        let mut a = Actuator::new(
            1,
            1,
            2,
            ActuatorConfig::new(2, 500.0).with_mass(2.0),
            MemoryConnector::default(),
        );
        a.set_domain([&ni, &nj]).unwrap();
        assert_relative_eq!(a.length(), 5.0);

        let k = a.tangent_stiff();
        assert_relative_eq!(k[(0, 0)], 0.36 * 100.0, max_relative = 1e-12);
        assert_relative_eq!(k[(0, 3)], -0.48 * 100.0, max_relative = 1e-12);
        assert_eq!(k, a.initial_stiff());

        let m = a.mass();
        assert_relative_eq!(m[(1, 1)], 5.0);
        assert_relative_eq!(m[(3, 3)], 5.0);
    }

    #[test]
    fn test_force_from_target() {
        let ni = Node::new(1, [0.0; 3], 1);
        let mut nj = Node::new(2, [2.0, 0.0, 0.0], 1);
        let mut a = Actuator::new(1, 1, 2, ActuatorConfig::new(1, 100.0), scripted(&[0.01, 0.03]));
        a.set_domain([&ni, &nj]).unwrap();

        nj.set_trial_displacement(Vec::from_element(1, 0.02)).unwrap();
        a.update([&ni, &nj]).unwrap();
        assert_eq!(a.link().state(), LinkState::Active);

        let p = a.resisting_force([&ni, &nj], 1.0).unwrap();
        // q = EA/L·(db − target) = 50·(0.02 − 0.01)
        assert_relative_eq!(a.basic_force(), 0.5, max_relative = 1e-12);
        assert_relative_eq!(p[1], 0.5, max_relative = 1e-12);
        assert_relative_eq!(p[0], -0.5, max_relative = 1e-12);
        assert_eq!(a.link().measured_force().unwrap(), -a.basic_force());

        // iterations at the same time reuse the cached target
        a.resisting_force([&ni, &nj], 1.0).unwrap();
        assert_eq!(a.link().exchanges(), 1);

        a.resisting_force([&ni, &nj], 2.0).unwrap();
        assert_relative_eq!(a.basic_force(), -0.5, max_relative = 1e-12);
        assert_eq!(a.response("targetDisplacement"), Some(Response::Vector(vec![0.03])));
        assert_eq!(a.response("measuredDisplacement"), Some(Response::Vector(vec![0.02])));
        let local = a.response("localForce").unwrap();
        assert_relative_eq!(local.values()[0], 0.5, max_relative = 1e-12);
        assert_relative_eq!(local.values()[1], -0.5, max_relative = 1e-12);
        assert!(a.response("strain").is_none());
    }

    #[test]
    fn test_reverts_are_informational() {
        let mut a = offline(1);
        assert!(a.commit_state().is_ok());
        let err = a.revert_to_last_commit().unwrap_err();
        assert!(err.is_informational());
        assert!(a.revert_to_start().unwrap_err().is_informational());
        assert!(a
            .add_load(&ElementLoad::uniform(1.0, 0.0, 0.0), 1.0)
            .unwrap_err()
            .is_informational());
    }

    #[test]
    fn test_persistence_round_trip() {
        let ni = Node::frame(1, 0.0, 0.0, 0.0);
        let nj = Node::frame(7, 0.0, 2.0, 0.0);
        let mut a = Actuator::new(4, 1, 7, ActuatorConfig::new(3, 250.0).with_mass(0.5), MemoryConnector::default())
            .with_port(8091);
        a.set_domain([&ni, &nj]).unwrap();

        let mut ch = MemoryChannel::new();
        a.send_self(0, &mut ch).unwrap();
        ch.loopback();

        let mut copy = offline(1);
        copy.recv_self(0, &mut ch).unwrap();
        assert_eq!(copy.tag(), 4);
        assert_eq!(copy.node_tags(), [1, 7]);
        assert_eq!(copy.num_dof(), 12);
        assert_eq!(copy.config(), &ActuatorConfig::new(3, 250.0).with_mass(0.5));
        assert_eq!(copy.response("force").unwrap().values().len(), 12);
    }

    #[test]
    fn test_recv_rejects_inconsistent_dof() {
        let mut ch = MemoryChannel::new();
        ch.push_vector(vec![CLASS_TAG_ACTUATOR, 4.0, 3.0, 2.0, 250.0, 8091.0, 0.0]);
        ch.push_id(vec![1, 7]);

        let mut copy = offline(1);
        let err = copy.recv_self(0, &mut ch).unwrap_err();
        assert!(matches!(err, FEAError::DofMismatch(_)));
        // the receiving element keeps its previous state
        assert_eq!(copy.num_dof(), 2);
        assert_eq!(copy.config().dim, 1);
    }
}
