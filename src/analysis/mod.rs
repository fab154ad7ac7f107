//! Analysis options and the static load-control driver

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

use crate::error::{FEAError, FEAResult};
use crate::math::{self, Mat, Vec};
use crate::model::Model;
use crate::results::{AnalysisReport, StepResult};

/// Stiffness used in the equilibrium iterations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TangentKind {
    /// Full Newton: tangent at the current trial state
    #[default]
    Current,
    /// Modified Newton with the initial stiffness
    Initial,
}

/// Options for the static analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    /// Number of equal load increments from λ = 0 to λ = 1
    pub num_steps: usize,
    /// Maximum equilibrium iterations per step
    pub max_iterations: usize,
    /// Convergence tolerance on the norm of the displacement correction
    pub tolerance: f64,
    pub tangent: TangentKind,
    /// Enable per-step progress output
    pub log: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            num_steps: 1,
            max_iterations: 30,
            tolerance: 1e-6,
            tangent: TangentKind::Current,
            log: false,
        }
    }
}

impl AnalysisOptions {
    /// Enable logging
    pub fn with_logging(mut self) -> Self {
        self.log = true;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iterations = max_iter;
        self
    }

    /// Set convergence tolerance
    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    /// Set the number of load increments
    pub fn with_steps(mut self, num_steps: usize) -> Self {
        self.num_steps = num_steps;
        self
    }

    pub fn with_initial_tangent(mut self) -> Self {
        self.tangent = TangentKind::Initial;
        self
    }
}

/// Load-control static analysis
///
/// Pseudo-time equals the load factor, so step `n` of `N` ends at `t = n/N`.
/// A step that fails to converge is reverted and reported as
/// [`FEAError::ConvergenceFailed`]; fatal errors propagate untouched.
#[derive(Debug, Clone, Default)]
pub struct StaticAnalysis {
    options: AnalysisOptions,
}

impl StaticAnalysis {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Run all load steps
    pub fn analyze(&self, model: &mut Model) -> FEAResult<AnalysisReport> {
        if self.options.num_steps == 0 {
            return Err(FEAError::InvalidInput("num_steps must be at least 1".into()));
        }
        if !model.is_initialized() {
            model.initialize()?;
        }

        let mut report = AnalysisReport::default();
        let dt = 1.0 / self.options.num_steps as f64;
        let start = model.current_time();
        for step in 1..=self.options.num_steps {
            let time = start + step as f64 * dt;
            let result = self.step(model, step, time)?;
            if self.options.log {
                info!(
                    "step {}/{}: t = {:.4}, {} iterations, |du| = {:.3e}",
                    step, self.options.num_steps, time, result.iterations, result.norm
                );
            }
            report.steps.push(result);
        }

        report.displacements = model.node_displacements();
        Ok(report)
    }

    /// Advance the model to pseudo-time `time` and commit
    pub fn step(&self, model: &mut Model, step: usize, time: f64) -> FEAResult<StepResult> {
        model.set_time(time);
        model.apply_load_factor(time)?;

        match self.iterate(model, time) {
            Ok((iterations, norm)) => {
                model.commit()?;
                Ok(StepResult {
                    step,
                    time,
                    iterations,
                    norm,
                })
            }
            Err(e) if e.is_fatal() || matches!(e, FEAError::SimulationTerminated) => Err(e),
            Err(e) => {
                error!("step {} at t = {} failed: {}", step, time, e);
                model.revert_to_last_commit()?;
                Err(e)
            }
        }
    }

    fn iterate(&self, model: &mut Model, lambda: f64) -> FEAResult<(usize, f64)> {
        let free = model.free_equations();
        let initial = self.options.tangent == TangentKind::Initial;
        let mut norm = f64::INFINITY;

        model.update()?;
        for iter in 1..=self.options.max_iterations {
            let r = model.unbalance(lambda)?;
            let k = model.tangent_stiffness(initial)?;

            let (k_ff, r_f) = partition(&k, &r, &free);
            let du_f = math::solve_linear_system(&k_ff, &r_f).ok_or(FEAError::SingularMatrix)?;

            let mut du = Vec::zeros(model.num_equations());
            for (i, &eq) in free.iter().enumerate() {
                du[eq] = du_f[i];
            }
            model.incr_trial_displacement(&du)?;
            model.update()?;

            norm = du_f.norm();
            debug!("iteration {}: |du| = {:.3e}", iter, norm);
            if norm <= self.options.tolerance {
                // element forces at the converged state, ahead of the commit
                model.unbalance(lambda)?;
                return Ok((iter, norm));
            }
        }

        debug!("no convergence, last |du| = {:.3e}", norm);
        Err(FEAError::ConvergenceFailed(self.options.max_iterations))
    }
}

/// Free-free block of the stiffness and the matching unbalance entries
fn partition(k: &Mat, r: &Vec, free: &[usize]) -> (Mat, Vec) {
    let n = free.len();
    let mut k_ff = Mat::zeros(n, n);
    let mut r_f = Vec::zeros(n);
    for (i, &di) in free.iter().enumerate() {
        r_f[i] = r[di];
        for (j, &dj) in free.iter().enumerate() {
            k_ff[(i, j)] = k[(di, dj)];
        }
    }
    (k_ff, r_f)
}
