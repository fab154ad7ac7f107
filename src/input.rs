//! JSON model description
//!
//! A model file lists nodes, supports, elements and reference loads plus the
//! analysis options. [`ModelInput::build`] turns it into a [`Model`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisOptions;
use crate::config::LinkConfig;
use crate::elements::{Actuator, ActuatorConfig, BeamSection, ElasticBeam3d, Node, Support};
use crate::error::{FEAError, FEAResult};
use crate::loads::{ElementLoad, NodeLoad};
use crate::math::Vec3;
use crate::model::Model;
use crate::transform::{CrdTransf, LinearCrdTransf3d, PDeltaCrdTransf3d};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    pub tag: usize,
    /// One to three coordinates
    pub coords: Vec<f64>,
    #[serde(default = "default_ndof")]
    pub ndof: usize,
}

fn default_ndof() -> usize {
    6
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportData {
    pub node: usize,
    #[serde(flatten)]
    pub restraints: Support,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    #[default]
    Linear,
    PDelta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamData {
    pub tag: usize,
    pub nodes: [usize; 2],
    pub section: BeamSection,
    /// Vector in the local x-z plane
    pub vecxz: [f64; 3],
    #[serde(default)]
    pub transform: TransformKind,
    /// Rigid joint offsets at end i and end j, global axes
    #[serde(default)]
    pub offsets: Option<[[f64; 3]; 2]>,
    #[serde(default)]
    pub rho: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActuatorData {
    pub tag: usize,
    pub nodes: [usize; 2],
    #[serde(flatten)]
    pub config: ActuatorConfig,
    #[serde(default)]
    pub link: LinkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeLoadData {
    pub node: usize,
    #[serde(flatten)]
    pub load: NodeLoad,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementLoadData {
    pub element: usize,
    #[serde(flatten)]
    pub load: ElementLoad,
}

/// Complete model file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInput {
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub supports: Vec<SupportData>,
    #[serde(default)]
    pub beams: Vec<BeamData>,
    #[serde(default)]
    pub actuators: Vec<ActuatorData>,
    #[serde(default)]
    pub node_loads: Vec<NodeLoadData>,
    #[serde(default)]
    pub element_loads: Vec<ElementLoadData>,
    #[serde(default)]
    pub analysis: AnalysisOptions,
}

impl ModelInput {
    pub fn from_json(json: &str) -> FEAResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> FEAResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Build the model; `link` may adjust each actuator's link settings
    pub fn build<F>(&self, link: F) -> FEAResult<Model>
    where
        F: Fn(LinkConfig) -> FEAResult<LinkConfig>,
    {
        let mut model = Model::new();

        for n in &self.nodes {
            if n.coords.is_empty() || n.coords.len() > 3 {
                return Err(FEAError::InvalidInput(format!(
                    "node {} needs 1 to 3 coordinates, got {}",
                    n.tag,
                    n.coords.len()
                )));
            }
            if !matches!(n.ndof, 1 | 2 | 3 | 6) {
                return Err(FEAError::InvalidInput(format!(
                    "node {} has unsupported DOF count {}",
                    n.tag, n.ndof
                )));
            }
            let mut coords = [0.0; 3];
            coords[..n.coords.len()].copy_from_slice(&n.coords);
            model.add_node(Node::new(n.tag, coords, n.ndof).with_dimension(n.coords.len()))?;
        }

        for s in &self.supports {
            model.add_support(s.node, s.restraints)?;
        }

        for b in &self.beams {
            let vecxz = Vec3::from(b.vecxz);
            let transf: Box<dyn CrdTransf> = match (b.transform, b.offsets) {
                (TransformKind::Linear, None) => Box::new(LinearCrdTransf3d::new(vecxz)),
                (TransformKind::Linear, Some([oi, oj])) => Box::new(
                    LinearCrdTransf3d::with_offsets(vecxz, Vec3::from(oi), Vec3::from(oj)),
                ),
                (TransformKind::PDelta, None) => Box::new(PDeltaCrdTransf3d::new(vecxz)),
                (TransformKind::PDelta, Some([oi, oj])) => Box::new(
                    PDeltaCrdTransf3d::with_offsets(vecxz, Vec3::from(oi), Vec3::from(oj)),
                ),
            };
            let beam = ElasticBeam3d::new(b.tag, b.nodes[0], b.nodes[1], b.section, transf)
                .with_mass(b.rho);
            model.add_element(Box::new(beam))?;
        }

        for a in &self.actuators {
            let cfg = link(a.link.clone())?;
            let actuator = Actuator::tcp(a.tag, a.nodes[0], a.nodes[1], a.config, cfg);
            model.add_element(Box::new(actuator))?;
        }

        for l in &self.node_loads {
            model.add_node_load(l.node, l.load)?;
        }
        for l in &self.element_loads {
            model.add_element_load(l.element, l.load)?;
        }

        Ok(model)
    }
}
