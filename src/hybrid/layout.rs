//! Negotiated buffer layout
//!
//! The peer announces eleven sizes once per connection. They fix the length of
//! the receive and send buffers and where each named field sits inside them.

use std::ops::Range;

use crate::error::{FEAError, FEAResult};

/// Number of integers in the size announcement
pub const NUM_SIZES: usize = 11;

/// Size announcement `{ctrlDisp, ctrlVel, ctrlAccel, ctrlForce, ctrlTime,
/// daqDisp, daqVel, daqAccel, daqForce, daqTime, dataSize}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataSizes {
    pub ctrl_disp: usize,
    pub ctrl_vel: usize,
    pub ctrl_accel: usize,
    pub ctrl_force: usize,
    pub ctrl_time: usize,
    pub daq_disp: usize,
    pub daq_vel: usize,
    pub daq_accel: usize,
    pub daq_force: usize,
    pub daq_time: usize,
    pub data_size: usize,
}

impl DataSizes {
    /// Sizes for a single scalar actuator: one target displacement, one
    /// measured displacement and force
    pub fn scalar(data_size: usize) -> Self {
        Self {
            ctrl_disp: 1,
            daq_disp: 1,
            daq_force: 1,
            data_size,
            ..Self::default()
        }
    }

    pub fn from_wire(raw: &[i32; NUM_SIZES]) -> FEAResult<Self> {
        let mut s = [0usize; NUM_SIZES];
        for (i, (slot, &v)) in s.iter_mut().zip(raw).enumerate() {
            *slot = usize::try_from(v)
                .map_err(|_| FEAError::Negotiation(format!("size {i} is negative ({v})")))?;
        }
        Ok(Self {
            ctrl_disp: s[0],
            ctrl_vel: s[1],
            ctrl_accel: s[2],
            ctrl_force: s[3],
            ctrl_time: s[4],
            daq_disp: s[5],
            daq_vel: s[6],
            daq_accel: s[7],
            daq_force: s[8],
            daq_time: s[9],
            data_size: s[10],
        })
    }

    pub fn to_wire(&self) -> FEAResult<[i32; NUM_SIZES]> {
        let s = [
            self.ctrl_disp,
            self.ctrl_vel,
            self.ctrl_accel,
            self.ctrl_force,
            self.ctrl_time,
            self.daq_disp,
            self.daq_vel,
            self.daq_accel,
            self.daq_force,
            self.daq_time,
            self.data_size,
        ];
        let mut raw = [0i32; NUM_SIZES];
        for (slot, v) in raw.iter_mut().zip(s) {
            *slot = i32::try_from(v)
                .map_err(|_| FEAError::InvalidInput(format!("size {v} does not fit the wire")))?;
        }
        Ok(raw)
    }
}

/// Field ranges inside the fixed receive and send buffers
///
/// Receive buffer: `[action, targDisp.., targForce..]`.
/// Send buffer: `[measDisp.., measForce..]`. Both are `data_size` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferLayout {
    sizes: DataSizes,
    targ_disp: Range<usize>,
    targ_force: Range<usize>,
    meas_disp: Range<usize>,
    meas_force: Range<usize>,
}

impl BufferLayout {
    /// Validate a size announcement and lay out the buffers
    ///
    /// Only scalar actuation is supported: displacement and force fields in
    /// either direction may hold at most one value.
    pub fn negotiate(sizes: DataSizes) -> FEAResult<Self> {
        let scalar_fields = [
            ("ctrlDisp", sizes.ctrl_disp),
            ("ctrlForce", sizes.ctrl_force),
            ("daqDisp", sizes.daq_disp),
            ("daqForce", sizes.daq_force),
        ];
        for (name, n) in scalar_fields {
            if n > 1 {
                return Err(FEAError::Negotiation(format!(
                    "{name} has size {n}, only scalar actuation is supported"
                )));
            }
        }

        let targ_disp = 1..1 + sizes.ctrl_disp;
        let targ_force = targ_disp.end..targ_disp.end + sizes.ctrl_force;
        if targ_force.end > sizes.data_size {
            return Err(FEAError::Negotiation(format!(
                "receive fields need {} entries, dataSize is {}",
                targ_force.end, sizes.data_size
            )));
        }

        let meas_disp = 0..sizes.daq_disp;
        let meas_force = meas_disp.end..meas_disp.end + sizes.daq_force;
        if meas_force.end > sizes.data_size {
            return Err(FEAError::Negotiation(format!(
                "send fields need {} entries, dataSize is {}",
                meas_force.end, sizes.data_size
            )));
        }

        Ok(Self {
            sizes,
            targ_disp,
            targ_force,
            meas_disp,
            meas_force,
        })
    }

    pub fn sizes(&self) -> &DataSizes {
        &self.sizes
    }

    /// Length of both buffers
    pub fn buffer_len(&self) -> usize {
        self.sizes.data_size
    }

    pub fn target_disp(&self) -> Range<usize> {
        self.targ_disp.clone()
    }

    pub fn target_force(&self) -> Range<usize> {
        self.targ_force.clone()
    }

    pub fn measured_disp(&self) -> Range<usize> {
        self.meas_disp.clone()
    }

    pub fn measured_force(&self) -> Range<usize> {
        self.meas_force.clone()
    }
}
