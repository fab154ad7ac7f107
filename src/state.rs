//! Trial/commit state discipline shared by nodes, transforms, materials and elements
//!
//! Every stateful component carries a *trial* state that may be rejected by the
//! nonlinear driver and a *committed* state that only advances on convergence.

use crate::error::FEAResult;

/// Lifecycle operations the analysis driver invokes on every stateful component
pub trait TrialCommit {
    /// Accept the trial state as the new committed state
    fn commit_state(&mut self) -> FEAResult<()>;

    /// Discard the trial state and return to the last committed state
    fn revert_to_last_commit(&mut self) -> FEAResult<()>;

    /// Reset trial and committed state to their initial values
    fn revert_to_start(&mut self) -> FEAResult<()>;
}

/// Position of a [`TrialValue`] in the trial/commit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing set since construction or `revert_to_start`
    Initial,
    /// Trial mutated, committed value is stale
    TrialSet,
    /// Trial equals committed
    Committed,
}

/// A trial/committed pair of values
#[derive(Debug, Clone, PartialEq)]
pub struct TrialValue<T: Clone> {
    trial: T,
    committed: T,
    initial: T,
    phase: Phase,
}

impl<T: Clone> TrialValue<T> {
    /// Create a pair with both values set to `initial`
    pub fn new(initial: T) -> Self {
        Self {
            trial: initial.clone(),
            committed: initial.clone(),
            initial,
            phase: Phase::Initial,
        }
    }

    pub fn trial(&self) -> &T {
        &self.trial
    }

    pub fn committed(&self) -> &T {
        &self.committed
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Replace the trial value
    pub fn set_trial(&mut self, value: T) {
        self.trial = value;
        self.phase = Phase::TrialSet;
    }

    /// Mutable access to the trial value
    pub fn trial_mut(&mut self) -> &mut T {
        self.phase = Phase::TrialSet;
        &mut self.trial
    }

    pub fn commit(&mut self) {
        self.committed = self.trial.clone();
        self.phase = Phase::Committed;
    }

    pub fn revert(&mut self) {
        self.trial = self.committed.clone();
        if self.phase == Phase::TrialSet {
            self.phase = Phase::Committed;
        }
    }

    pub fn reset(&mut self) {
        self.trial = self.initial.clone();
        self.committed = self.initial.clone();
        self.phase = Phase::Initial;
    }
}

impl<T: Clone + Default> Default for TrialValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone> TrialCommit for TrialValue<T> {
    fn commit_state(&mut self) -> FEAResult<()> {
        self.commit();
        Ok(())
    }

    fn revert_to_last_commit(&mut self) -> FEAResult<()> {
        self.revert();
        Ok(())
    }

    fn revert_to_start(&mut self) -> FEAResult<()> {
        self.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle() {
        let mut v = TrialValue::new(0.0_f64);
        assert_eq!(v.phase(), Phase::Initial);

        v.set_trial(2.5);
        assert_eq!(v.phase(), Phase::TrialSet);
        assert_eq!(*v.committed(), 0.0);

        v.commit();
        assert_eq!(v.phase(), Phase::Committed);
        assert_eq!(*v.committed(), 2.5);

        v.set_trial(4.0);
        v.revert();
        assert_eq!(*v.trial(), 2.5);

        v.reset();
        assert_eq!(*v.trial(), 0.0);
        assert_eq!(*v.committed(), 0.0);
        assert_eq!(v.phase(), Phase::Initial);
    }
}
