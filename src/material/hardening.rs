//! Hardening state and laws

use std::fmt;

use log::debug;

use crate::error::{FEAError, FEAResult};
use crate::results::Response;
use crate::state::{TrialCommit, TrialValue};

/// Accumulated plastic deformation under the trial/commit discipline
///
/// The value is clamped at zero. `s_factor` scales the stiffness reported for
/// the current trial only and falls back to 1 on commit or incremental update.
#[derive(Debug, Clone, PartialEq)]
pub struct HardeningState {
    pub tag: usize,
    value: TrialValue<f64>,
    s_factor: f64,
}

impl HardeningState {
    pub fn new(tag: usize) -> Self {
        Self {
            tag,
            value: TrialValue::new(0.0),
            s_factor: 1.0,
        }
    }

    /// Set an absolute trial value together with a stiffness scale factor
    pub fn set_trial_value(&mut self, x: f64, factor: f64) {
        self.s_factor = factor;
        self.value.set_trial(x.max(0.0));
    }

    /// Set the trial value as an increment over the committed one
    pub fn set_trial_incr_value(&mut self, dx: f64) {
        self.s_factor = 1.0;
        self.value.set_trial((self.value.committed() + dx).max(0.0));
    }

    pub fn trial_value(&self) -> f64 {
        *self.value.trial()
    }

    pub fn committed_value(&self) -> f64 {
        *self.value.committed()
    }

    pub fn s_factor(&self) -> f64 {
        self.s_factor
    }

    /// Hardening variables expose no recorder quantities
    pub fn response(&self, _name: &str) -> Option<Response> {
        None
    }
}

impl TrialCommit for HardeningState {
    fn commit_state(&mut self) -> FEAResult<()> {
        self.value.commit();
        self.s_factor = 1.0;
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> FEAResult<()> {
        self.value.revert();
        Ok(())
    }

    fn revert_to_start(&mut self) -> FEAResult<()> {
        self.value.reset();
        Ok(())
    }
}

/// A hardening law driven by a [`HardeningState`]
pub trait PlasticHardeningMaterial: TrialCommit + fmt::Debug + Send {
    fn state(&self) -> &HardeningState;

    fn state_mut(&mut self) -> &mut HardeningState;

    /// Plastic stiffness at the trial value, scaled by the trial factor
    fn trial_plastic_stiffness(&self) -> f64;

    fn set_trial_value(&mut self, x: f64, factor: f64) {
        self.state_mut().set_trial_value(x, factor);
    }

    fn set_trial_incr_value(&mut self, dx: f64) {
        self.state_mut().set_trial_incr_value(dx);
    }

    fn trial_value(&self) -> f64 {
        self.state().trial_value()
    }

    fn response(&self, name: &str) -> Option<Response> {
        self.state().response(name)
    }
}

// ============================================================================
// Laws
// ============================================================================

/// Perfectly plastic: no hardening
#[derive(Debug, Clone, PartialEq)]
pub struct NullPlasticMaterial {
    state: HardeningState,
}

impl NullPlasticMaterial {
    pub fn new(tag: usize) -> Self {
        Self {
            state: HardeningState::new(tag),
        }
    }
}

impl TrialCommit for NullPlasticMaterial {
    fn commit_state(&mut self) -> FEAResult<()> {
        self.state.commit_state()
    }

    fn revert_to_last_commit(&mut self) -> FEAResult<()> {
        self.state.revert_to_last_commit()
    }

    fn revert_to_start(&mut self) -> FEAResult<()> {
        self.state.revert_to_start()
    }
}

impl PlasticHardeningMaterial for NullPlasticMaterial {
    fn state(&self) -> &HardeningState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut HardeningState {
        &mut self.state
    }

    fn trial_plastic_stiffness(&self) -> f64 {
        0.0
    }
}

/// Piecewise-constant plastic stiffness over accumulated plastic deformation
///
/// Segment `i` spans `[breakpoints[i], breakpoints[i + 1])`; beyond the last
/// breakpoint the last stiffness applies.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiLinearKp {
    state: HardeningState,
    breakpoints: Vec<f64>,
    stiffness: Vec<f64>,
}

impl MultiLinearKp {
    pub fn new(tag: usize, breakpoints: Vec<f64>, stiffness: Vec<f64>) -> FEAResult<Self> {
        if breakpoints.is_empty() || breakpoints.len() != stiffness.len() {
            return Err(FEAError::InvalidInput(format!(
                "MultiLinearKp {tag}: need matching non-empty breakpoints and stiffness, got {} and {}",
                breakpoints.len(),
                stiffness.len()
            )));
        }
        if breakpoints[0] != 0.0 {
            return Err(FEAError::InvalidInput(format!(
                "MultiLinearKp {tag}: first breakpoint must be 0"
            )));
        }
        if breakpoints.windows(2).any(|w| w[1] <= w[0]) {
            return Err(FEAError::InvalidInput(format!(
                "MultiLinearKp {tag}: breakpoints must increase"
            )));
        }
        debug!("MultiLinearKp {tag}: {} segments", breakpoints.len());
        Ok(Self {
            state: HardeningState::new(tag),
            breakpoints,
            stiffness,
        })
    }
}

impl TrialCommit for MultiLinearKp {
    fn commit_state(&mut self) -> FEAResult<()> {
        self.state.commit_state()
    }

    fn revert_to_last_commit(&mut self) -> FEAResult<()> {
        self.state.revert_to_last_commit()
    }

    fn revert_to_start(&mut self) -> FEAResult<()> {
        self.state.revert_to_start()
    }
}

impl PlasticHardeningMaterial for MultiLinearKp {
    fn state(&self) -> &HardeningState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut HardeningState {
        &mut self.state
    }

    fn trial_plastic_stiffness(&self) -> f64 {
        let x = self.state.trial_value();
        // breakpoints[0] == 0 and x >= 0, so at least one segment qualifies
        let segment = self.breakpoints.iter().rposition(|&b| x >= b).unwrap_or(0);
        self.stiffness[segment] * self.state.s_factor()
    }
}

/// Exponentially decaying plastic stiffness `K0·exp(−a·x)` with a residual floor
#[derive(Debug, Clone, PartialEq)]
pub struct ExponReducing {
    state: HardeningState,
    k0: f64,
    alpha: f64,
    /// Lower bound as a fraction of `k0`
    res_factor: f64,
}

impl ExponReducing {
    pub fn new(tag: usize, k0: f64, alpha: f64) -> Self {
        Self {
            state: HardeningState::new(tag),
            k0,
            alpha,
            res_factor: 0.0,
        }
    }

    pub fn with_residual(mut self, res_factor: f64) -> Self {
        self.res_factor = res_factor;
        self
    }
}

impl TrialCommit for ExponReducing {
    fn commit_state(&mut self) -> FEAResult<()> {
        self.state.commit_state()
    }

    fn revert_to_last_commit(&mut self) -> FEAResult<()> {
        self.state.revert_to_last_commit()
    }

    fn revert_to_start(&mut self) -> FEAResult<()> {
        self.state.revert_to_start()
    }
}

impl PlasticHardeningMaterial for ExponReducing {
    fn state(&self) -> &HardeningState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut HardeningState {
        &mut self.state
    }

    fn trial_plastic_stiffness(&self) -> f64 {
        let k = self.k0 * (-self.alpha * self.state.trial_value()).exp();
        k.max(self.res_factor * self.k0) * self.state.s_factor()
    }
}
