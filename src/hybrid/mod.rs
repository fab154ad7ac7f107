//! Hardware-in-the-loop coupling
//!
//! A remote experimental control drives a physical (or emulated) actuator and
//! reports its measured response. [`RemoteActuatorLink`] keeps that exchange
//! in step with the analysis pseudo-time.

mod layout;
mod link;
mod protocol;

pub use layout::{BufferLayout, DataSizes, NUM_SIZES};
pub use link::{LinkState, RemoteActuatorLink};
pub use protocol::RemoteAction;
