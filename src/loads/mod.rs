//! Nodal and element loads

mod element_load;
mod node_load;

pub use element_load::ElementLoad;
pub use node_load::NodeLoad;
