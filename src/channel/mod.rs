//! Channels for exchanging fixed-size numeric messages
//!
//! The same abstraction carries object persistence (`send_self`/`recv_self`)
//! and the remote actuator protocol. Tags are advisory: a channel delivers
//! messages in order and never reorders by tag.

mod memory;
mod tcp;

pub use memory::{MemoryChannel, MemoryConnector, Message};
pub use tcp::{TcpChannel, TcpConnector};

use crate::error::FEAResult;

/// Bidirectional, ordered, blocking message channel
pub trait Channel {
    /// Send a vector of floating point values
    fn send_vector(&mut self, tag: i32, data: &[f64]) -> FEAResult<()>;

    /// Receive exactly `data.len()` floating point values
    fn recv_vector(&mut self, tag: i32, data: &mut [f64]) -> FEAResult<()>;

    /// Send a vector of integer identifiers
    fn send_id(&mut self, tag: i32, data: &[i32]) -> FEAResult<()>;

    /// Receive exactly `data.len()` integer identifiers
    fn recv_id(&mut self, tag: i32, data: &mut [i32]) -> FEAResult<()>;
}

/// Factory for the channel a remote link opens on first use
pub trait Connector {
    type Channel: Channel;

    /// Open the channel, blocking until the peer is connected
    fn connect(&mut self) -> FEAResult<Self::Channel>;

    /// Human readable endpoint description for logging
    fn endpoint(&self) -> String;
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn send_vector(&mut self, tag: i32, data: &[f64]) -> FEAResult<()> {
        (**self).send_vector(tag, data)
    }

    fn recv_vector(&mut self, tag: i32, data: &mut [f64]) -> FEAResult<()> {
        (**self).recv_vector(tag, data)
    }

    fn send_id(&mut self, tag: i32, data: &[i32]) -> FEAResult<()> {
        (**self).send_id(tag, data)
    }

    fn recv_id(&mut self, tag: i32, data: &mut [i32]) -> FEAResult<()> {
        (**self).recv_id(tag, data)
    }
}
