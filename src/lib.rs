//! Frame Hybrid - frame elements, coordinate transformations and
//! hardware-in-the-loop actuators under a common trial/commit discipline
//!
//! This library provides:
//! - Linear and P-Delta 3D frame coordinate transformations
//! - An elastic 3D beam-column and a remote actuator element
//! - Plastic hardening materials
//! - A synchronous link to an experimental control over TCP
//! - A load-control static driver
//!
//! ## Example
//! ```rust
//! use frame_hybrid::prelude::*;
//!
//! let mut model = Model::new();
//! model.add_node(Node::frame(1, 0.0, 0.0, 0.0)).unwrap();
//! model.add_node(Node::frame(2, 3.0, 0.0, 0.0)).unwrap();
//! model.add_support(1, Support::fixed()).unwrap();
//!
//! let section = BeamSection::new(200e9, 77e9, 0.01, 1e-5, 1e-5, 2e-5);
//! let transf = LinearCrdTransf3d::new(Vec3::z());
//! model
//!     .add_element(Box::new(ElasticBeam3d::new(1, 1, 2, section, Box::new(transf))))
//!     .unwrap();
//! model.add_node_load(2, NodeLoad::force(0.0, -1000.0, 0.0)).unwrap();
//!
//! let report = StaticAnalysis::default().analyze(&mut model).unwrap();
//! let tip = report.displacement(2).unwrap();
//! assert!(tip.dy < 0.0);
//! ```

pub mod analysis;
pub mod channel;
pub mod config;
pub mod elements;
pub mod error;
pub mod hybrid;
pub mod input;
pub mod loads;
pub mod material;
pub mod math;
pub mod model;
pub mod results;
pub mod state;
pub mod transform;

// Re-export common types
pub mod prelude {
    pub use crate::analysis::{AnalysisOptions, StaticAnalysis, TangentKind};
    pub use crate::channel::{Channel, Connector, MemoryChannel, MemoryConnector, TcpChannel, TcpConnector};
    pub use crate::config::LinkConfig;
    pub use crate::elements::{Actuator, ActuatorConfig, BeamSection, ElasticBeam3d, Element, Node, Support};
    pub use crate::error::{FEAError, FEAResult};
    pub use crate::hybrid::{DataSizes, LinkState, RemoteAction, RemoteActuatorLink};
    pub use crate::input::ModelInput;
    pub use crate::loads::{ElementLoad, NodeLoad};
    pub use crate::material::{ExponReducing, MultiLinearKp, NullPlasticMaterial, PlasticHardeningMaterial};
    pub use crate::math::{Vec3, Vec6};
    pub use crate::model::Model;
    pub use crate::results::{AnalysisReport, NodeDisplacement, Response};
    pub use crate::state::TrialCommit;
    pub use crate::transform::{CrdTransf, LinearCrdTransf3d, PDeltaCrdTransf3d};
}
