//! In-process channel backed by message queues

use std::collections::VecDeque;

use super::{Channel, Connector};
use crate::error::{FEAError, FEAResult};

/// A message as seen by a [`MemoryChannel`]
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Vector(Vec<f64>),
    Id(Vec<i32>),
}

/// Channel that replays queued inbound messages and records outbound ones
///
/// Used for loopback persistence and as a scripted peer in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    inbound: VecDeque<Message>,
    outbound: Vec<Message>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a vector for the next `recv_vector`
    pub fn push_vector(&mut self, data: Vec<f64>) {
        self.inbound.push_back(Message::Vector(data));
    }

    /// Queue identifiers for the next `recv_id`
    pub fn push_id(&mut self, data: Vec<i32>) {
        self.inbound.push_back(Message::Id(data));
    }

    /// Messages sent so far, oldest first
    pub fn sent(&self) -> &[Message] {
        &self.outbound
    }

    /// Number of inbound messages not yet received
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }

    /// Move everything sent so far onto the inbound queue
    pub fn loopback(&mut self) {
        self.inbound.extend(self.outbound.drain(..));
    }

    fn next(&mut self) -> FEAResult<Message> {
        self.inbound
            .pop_front()
            .ok_or_else(|| FEAError::Channel("no message available, peer disconnected".into()))
    }
}

impl Channel for MemoryChannel {
    fn send_vector(&mut self, _tag: i32, data: &[f64]) -> FEAResult<()> {
        self.outbound.push(Message::Vector(data.to_vec()));
        Ok(())
    }

    fn recv_vector(&mut self, _tag: i32, data: &mut [f64]) -> FEAResult<()> {
        match self.next()? {
            Message::Vector(v) if v.len() == data.len() => {
                data.copy_from_slice(&v);
                Ok(())
            }
            Message::Vector(v) => Err(FEAError::Channel(format!(
                "expected vector of size {}, received {}",
                data.len(),
                v.len()
            ))),
            Message::Id(_) => Err(FEAError::Channel("expected vector, received ID".into())),
        }
    }

    fn send_id(&mut self, _tag: i32, data: &[i32]) -> FEAResult<()> {
        self.outbound.push(Message::Id(data.to_vec()));
        Ok(())
    }

    fn recv_id(&mut self, _tag: i32, data: &mut [i32]) -> FEAResult<()> {
        match self.next()? {
            Message::Id(v) if v.len() == data.len() => {
                data.copy_from_slice(&v);
                Ok(())
            }
            Message::Id(v) => Err(FEAError::Channel(format!(
                "expected ID of size {}, received {}",
                data.len(),
                v.len()
            ))),
            Message::Vector(_) => Err(FEAError::Channel("expected ID, received vector".into())),
        }
    }
}

/// Connector handing out a prepared [`MemoryChannel`] once
#[derive(Debug, Default)]
pub struct MemoryConnector {
    channel: Option<MemoryChannel>,
}

impl MemoryConnector {
    pub fn new(channel: MemoryChannel) -> Self {
        Self { channel: Some(channel) }
    }
}

impl Connector for MemoryConnector {
    type Channel = MemoryChannel;

    fn connect(&mut self) -> FEAResult<MemoryChannel> {
        self.channel
            .take()
            .ok_or_else(|| FEAError::Channel("memory channel already handed out".into()))
    }

    fn endpoint(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loopback() {
        let mut ch = MemoryChannel::new();
        ch.send_vector(0, &[1.0, 2.0]).unwrap();
        ch.send_id(0, &[7]).unwrap();
        ch.loopback();

        let mut v = [0.0; 2];
        ch.recv_vector(0, &mut v).unwrap();
        assert_eq!(v, [1.0, 2.0]);
        let mut id = [0; 1];
        ch.recv_id(0, &mut id).unwrap();
        assert_eq!(id, [7]);
        assert_eq!(ch.pending(), 0);
    }

    #[test]
    fn test_size_mismatch_and_exhaustion() {
        let mut ch = MemoryChannel::new();
        ch.push_vector(vec![1.0]);
        let mut v = [0.0; 2];
        assert!(ch.recv_vector(0, &mut v).is_err());
        assert!(ch.recv_vector(0, &mut v).is_err());
    }
}
