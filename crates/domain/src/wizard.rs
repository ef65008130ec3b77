//! Wizard gate - monotonic unlocking of creation steps.
//!
//! Steps are numbered `0..step_count`. Step `n + 1` becomes navigable once
//! step `n`'s predicate holds while `n` is the furthest unlocked step. A step
//! never locks again, even if its predicate later turns false.
//!
//! Predicates receive the context by reference at evaluation time.

use std::collections::BTreeMap;
use std::fmt;

/// Completion predicate of one step.
pub type StepPredicate<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

pub struct WizardGate<C> {
    step_count: usize,
    max_unlocked: usize,
    predicates: BTreeMap<usize, StepPredicate<C>>,
}

impl<C> WizardGate<C> {
    /// A gate with only step 0 unlocked.
    ///
    /// # Panics
    ///
    /// If `step_count` is zero.
    pub fn new(step_count: usize) -> Self {
        assert!(step_count > 0, "a wizard needs at least one step");
        Self {
            step_count,
            max_unlocked: 0,
            predicates: BTreeMap::new(),
        }
    }

    /// Attach the predicate that unlocks the step after `step`.
    ///
    /// # Panics
    ///
    /// If `step` is the last step or beyond it; nothing follows it to unlock.
    pub fn register(&mut self, step: usize, predicate: impl Fn(&C) -> bool + Send + Sync + 'static) {
        assert!(
            step + 1 < self.step_count,
            "step {step} has no successor in a {}-step wizard",
            self.step_count
        );
        self.predicates.insert(step, Box::new(predicate));
    }

    /// Unlock `step + 1` if `step` is the furthest unlocked step and its
    /// predicate holds. Returns whether anything was unlocked.
    pub fn evaluate(&mut self, step: usize, context: &C) -> bool {
        if step != self.max_unlocked {
            return false;
        }
        let Some(predicate) = self.predicates.get(&step) else {
            return false;
        };
        if !predicate(context) {
            return false;
        }
        self.max_unlocked = step + 1;
        tracing::debug!(step = self.max_unlocked, "Wizard step unlocked");
        true
    }

    /// Evaluate the furthest step repeatedly until nothing more unlocks.
    ///
    /// Returns the number of steps unlocked.
    pub fn evaluate_all(&mut self, context: &C) -> usize {
        let mut unlocked = 0;
        while self.evaluate(self.max_unlocked, context) {
            unlocked += 1;
        }
        unlocked
    }

    /// Whether the user may move past `step`.
    pub fn can_advance(&self, step: usize) -> bool {
        step < self.max_unlocked
    }

    pub fn is_unlocked(&self, step: usize) -> bool {
        step <= self.max_unlocked
    }

    pub fn current_max(&self) -> usize {
        self.max_unlocked
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Every step is unlocked.
    pub fn is_terminal(&self) -> bool {
        self.max_unlocked + 1 == self.step_count
    }
}

impl<C> fmt::Debug for WizardGate<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardGate")
            .field("step_count", &self.step_count)
            .field("max_unlocked", &self.max_unlocked)
            .field("registered", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}
