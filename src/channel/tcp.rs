//! Blocking TCP channel
//!
//! Values travel as little-endian `f64` (vectors) and `i32` (identifiers)
//! with no framing beyond the sizes both sides already agree on.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};

use log::info;

use super::{Channel, Connector};
use crate::config::LinkConfig;
use crate::error::FEAResult;

/// Channel over an accepted TCP stream
#[derive(Debug)]
pub struct TcpChannel {
    stream: TcpStream,
    scratch: Vec<u8>,
}

impl TcpChannel {
    /// Wrap a connected stream, applying the configured timeouts
    pub fn new(stream: TcpStream, config: &LinkConfig) -> FEAResult<Self> {
        stream.set_nodelay(true)?;
        stream.set_read_timeout(config.timeout())?;
        stream.set_write_timeout(config.timeout())?;
        Ok(Self {
            stream,
            scratch: Vec::new(),
        })
    }

    pub fn peer_addr(&self) -> FEAResult<SocketAddr> {
        Ok(self.stream.peer_addr()?)
    }

    fn read_bytes(&mut self, len: usize) -> FEAResult<&[u8]> {
        self.scratch.resize(len, 0);
        self.stream.read_exact(&mut self.scratch)?;
        Ok(&self.scratch)
    }
}

impl Channel for TcpChannel {
    fn send_vector(&mut self, _tag: i32, data: &[f64]) -> FEAResult<()> {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.stream.write_all(&bytes)?;
        Ok(())
    }

    fn recv_vector(&mut self, _tag: i32, data: &mut [f64]) -> FEAResult<()> {
        let bytes = self.read_bytes(data.len() * 8)?;
        for (value, chunk) in data.iter_mut().zip(bytes.chunks_exact(8)) {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(chunk);
            *value = f64::from_le_bytes(raw);
        }
        Ok(())
    }

    fn send_id(&mut self, _tag: i32, data: &[i32]) -> FEAResult<()> {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.stream.write_all(&bytes)?;
        Ok(())
    }

    fn recv_id(&mut self, _tag: i32, data: &mut [i32]) -> FEAResult<()> {
        let bytes = self.read_bytes(data.len() * 4)?;
        for (value, chunk) in data.iter_mut().zip(bytes.chunks_exact(4)) {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(chunk);
            *value = i32::from_le_bytes(raw);
        }
        Ok(())
    }
}

/// Listens on the configured port and accepts a single peer
#[derive(Debug)]
pub struct TcpConnector {
    config: LinkConfig,
    listener: Option<TcpListener>,
}

impl TcpConnector {
    /// Create a connector that binds lazily on first use
    pub fn new(config: LinkConfig) -> Self {
        Self {
            config,
            listener: None,
        }
    }

    /// Create a connector and bind immediately
    ///
    /// Binding to port 0 picks a free port, see [`TcpConnector::local_addr`].
    pub fn bind(config: LinkConfig) -> FEAResult<Self> {
        let listener = TcpListener::bind(config.address())?;
        Ok(Self {
            config,
            listener: Some(listener),
        })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }
}

impl Connector for TcpConnector {
    type Channel = TcpChannel;

    fn connect(&mut self) -> FEAResult<TcpChannel> {
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => TcpListener::bind(self.config.address())?,
        };
        info!(
            "Channel created on {}, waiting for experimental control...",
            listener.local_addr()?
        );
        let (stream, peer) = listener.accept()?;
        info!("Experimental control connected from {}", peer);
        TcpChannel::new(stream, &self.config)
    }

    fn endpoint(&self) -> String {
        match self.local_addr() {
            Some(addr) => addr.to_string(),
            None => self.config.address(),
        }
    }
}
