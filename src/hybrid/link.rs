//! Synchronous link to a remote experimental control

use std::fmt;

use log::{debug, error, info};

use super::layout::{BufferLayout, DataSizes, NUM_SIZES};
use super::protocol::RemoteAction;
use crate::channel::{Channel, Connector};
use crate::error::{FEAError, FEAResult};

/// Lifecycle of a [`RemoteActuatorLink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Negotiated,
    Active,
    /// Peer ended the simulation
    Terminated,
    /// A negotiation, protocol or channel failure occurred
    Faulted,
}

/// Request/response wrapper substituting a remote peer for a constitutive law
///
/// The channel opens lazily. The peer is consulted at most once per pseudo-time
/// value: [`RemoteActuatorLink::sync`] only talks to it when time has strictly
/// advanced past the last synchronization. Any failure faults the link for good.
pub struct RemoteActuatorLink<C: Connector> {
    connector: C,
    channel: Option<C::Channel>,
    state: LinkState,
    layout: Option<BufferLayout>,
    recv_buf: Box<[f64]>,
    send_buf: Box<[f64]>,
    last_sync_time: f64,
    exchanges: usize,
}

impl<C: Connector> RemoteActuatorLink<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            channel: None,
            state: LinkState::Disconnected,
            layout: None,
            recv_buf: Box::default(),
            send_buf: Box::default(),
            last_sync_time: 0.0,
            exchanges: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == LinkState::Active
    }

    /// Pseudo-time of the last completed round-trip
    pub fn last_sync_time(&self) -> f64 {
        self.last_sync_time
    }

    /// Number of completed round-trips
    pub fn exchanges(&self) -> usize {
        self.exchanges
    }

    pub fn layout(&self) -> Option<&BufferLayout> {
        self.layout.as_ref()
    }

    pub fn endpoint(&self) -> String {
        self.connector.endpoint()
    }

    /// Open channel, if any
    pub fn channel(&self) -> Option<&C::Channel> {
        self.channel.as_ref()
    }

    pub fn channel_mut(&mut self) -> Option<&mut C::Channel> {
        self.channel.as_mut()
    }

    /// Connect and negotiate the buffer layout unless already active
    pub fn connect(&mut self) -> FEAResult<()> {
        match self.state {
            LinkState::Active => return Ok(()),
            LinkState::Faulted => return Err(FEAError::LinkFaulted),
            LinkState::Terminated => return Err(FEAError::SimulationTerminated),
            _ => {}
        }

        self.state = LinkState::Connecting;
        info!("Waiting for experimental control on {}", self.connector.endpoint());
        match self.open() {
            Ok(()) => {
                self.state = LinkState::Active;
                info!("Remote actuator link on {} now running", self.connector.endpoint());
                Ok(())
            }
            Err(e) => Err(self.fault(e)),
        }
    }

    fn open(&mut self) -> FEAResult<()> {
        let mut channel = self.connector.connect()?;

        let mut raw = [0i32; NUM_SIZES];
        channel.recv_id(0, &mut raw)?;
        let layout = BufferLayout::negotiate(DataSizes::from_wire(&raw)?)?;
        debug!("negotiated layout {:?}", layout);

        self.recv_buf = vec![0.0; layout.buffer_len()].into_boxed_slice();
        self.send_buf = vec![0.0; layout.buffer_len()].into_boxed_slice();
        self.layout = Some(layout);
        self.channel = Some(channel);
        self.state = LinkState::Negotiated;
        Ok(())
    }

    /// Exchange measured for target response if `time` has advanced
    ///
    /// Returns `true` when a round-trip took place.
    pub fn sync(&mut self, time: f64) -> FEAResult<bool> {
        self.ensure_active()?;
        if time <= self.last_sync_time {
            return Ok(false);
        }

        match self.exchange() {
            Ok(()) => {
                self.last_sync_time = time;
                self.exchanges += 1;
                debug!("synchronized with experimental control at t = {}", time);
                Ok(true)
            }
            Err(FEAError::SimulationTerminated) => {
                self.state = LinkState::Terminated;
                info!("The simulation has successfully completed");
                Err(FEAError::SimulationTerminated)
            }
            Err(e) => Err(self.fault(e)),
        }
    }

    fn exchange(&mut self) -> FEAResult<()> {
        let channel = self.channel.as_mut().ok_or(FEAError::LinkFaulted)?;

        channel.recv_vector(0, &mut self.recv_buf)?;
        let action = self.recv_buf.first().copied().unwrap_or(f64::NAN);
        if RemoteAction::from_code(action) != Some(RemoteAction::GetForce) {
            return Err(FEAError::Protocol {
                expected: RemoteAction::GetForce.name(),
                received: action,
            });
        }

        channel.send_vector(0, &self.send_buf)?;

        channel.recv_vector(0, &mut self.recv_buf)?;
        let action = self.recv_buf.first().copied().unwrap_or(f64::NAN);
        match RemoteAction::from_code(action) {
            Some(RemoteAction::SetTrialResponse) => Ok(()),
            Some(RemoteAction::Terminate) => Err(FEAError::SimulationTerminated),
            _ => Err(FEAError::Protocol {
                expected: RemoteAction::SetTrialResponse.name(),
                received: action,
            }),
        }
    }

    fn ensure_active(&self) -> FEAResult<()> {
        match self.state {
            LinkState::Active => Ok(()),
            LinkState::Faulted => Err(FEAError::LinkFaulted),
            LinkState::Terminated => Err(FEAError::SimulationTerminated),
            _ => Err(FEAError::Negotiation("link used before connection".into())),
        }
    }

    fn fault(&mut self, e: FEAError) -> FEAError {
        error!("remote actuator link on {} faulted: {}", self.connector.endpoint(), e);
        self.state = LinkState::Faulted;
        e
    }

    fn field(&self, buf: &[f64], range: std::ops::Range<usize>, name: &'static str) -> FEAResult<f64> {
        if range.is_empty() {
            return Err(FEAError::LayoutMismatch(name));
        }
        Ok(buf[range.start])
    }

    fn layout_or_err(&self) -> FEAResult<&BufferLayout> {
        self.ensure_active()?;
        self.layout.as_ref().ok_or(FEAError::LinkFaulted)
    }

    /// Target displacement from the last `setTrialResponse`
    pub fn target_disp(&self) -> FEAResult<f64> {
        let range = self.layout_or_err()?.target_disp();
        self.field(&self.recv_buf, range, "target displacement")
    }

    /// Target force, if the peer announced one
    pub fn target_force(&self) -> FEAResult<Option<f64>> {
        let range = self.layout_or_err()?.target_force();
        Ok(self.recv_buf.get(range).and_then(|f| f.first().copied()))
    }

    pub fn measured_disp(&self) -> FEAResult<f64> {
        let range = self.layout_or_err()?.measured_disp();
        self.field(&self.send_buf, range, "measured displacement")
    }

    pub fn measured_force(&self) -> FEAResult<f64> {
        let range = self.layout_or_err()?.measured_force();
        self.field(&self.send_buf, range, "measured force")
    }

    /// Record the response sent at the next synchronization
    pub fn set_measured(&mut self, disp: f64, force: f64) -> FEAResult<()> {
        let layout = self.layout_or_err()?;
        let (d, f) = (layout.measured_disp(), layout.measured_force());
        if d.is_empty() {
            return Err(FEAError::LayoutMismatch("measured displacement"));
        }
        if f.is_empty() {
            return Err(FEAError::LayoutMismatch("measured force"));
        }
        self.send_buf[d.start] = disp;
        self.send_buf[f.start] = force;
        Ok(())
    }
}

impl<C: Connector> fmt::Debug for RemoteActuatorLink<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteActuatorLink")
            .field("endpoint", &self.connector.endpoint())
            .field("state", &self.state)
            .field("layout", &self.layout)
            .field("last_sync_time", &self.last_sync_time)
            .field("exchanges", &self.exchanges)
            .finish()
    }
}
