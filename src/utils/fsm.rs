//! Table-driven finite state machine.
//!
//! Transitions are keyed by `(state, event)` and carry a side-effect that is
//! run against a caller-owned context *before* the state changes. If the
//! side-effect fails, the machine stays in its previous state.
//!
//! The transition table is immutable once built and shared behind an `Arc`,
//! so [`FiniteStateMachine::fresh`] hands out independent cursors over the
//! same table without rebuilding it.

use crate::error::{MatchError, Result};
use rustc_hash::FxHashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

/// Side-effect run with `(context, from, to, event)` before a transition is committed
pub type Action<S, E, C> = fn(&mut C, S, S, E) -> Result<()>;

fn no_action<S, E, C>(_context: &mut C, _from: S, _to: S, _event: E) -> Result<()> {
    Ok(())
}

struct Transition<S, E, C> {
    target: S,
    action: Action<S, E, C>,
}

struct TransitionTable<S, E, C> {
    /// Outgoing transitions per state
    states: FxHashMap<S, FxHashMap<E, Transition<S, E, C>>>,
    initial: S,
    finished: S,
}

/// A state machine cursor over a shared transition table
pub struct FiniteStateMachine<S, E, C> {
    table: Arc<TransitionTable<S, E, C>>,
    current: S,
}

impl<S, E, C> FiniteStateMachine<S, E, C>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    pub fn builder() -> Builder<S, E, C> {
        Builder::default()
    }

    /// Feed one event to the machine.
    ///
    /// Fails with [`MatchError::UnexpectedEvent`] when the current state has no
    /// transition for `event`, or with whatever the transition's side-effect
    /// returns. In both cases the current state is left unchanged.
    pub fn dispatch(&mut self, context: &mut C, event: E) -> Result<()> {
        let transition = self
            .table
            .states
            .get(&self.current)
            .and_then(|events| events.get(&event))
            .ok_or_else(|| MatchError::UnexpectedEvent {
                event: format!("{:?}", event),
                state: format!("{:?}", self.current),
            })?;

        let target = transition.target;
        (transition.action)(context, self.current, target, event)?;
        self.current = target;
        Ok(())
    }

    pub fn current_state(&self) -> S {
        self.current
    }

    pub fn is_finished(&self) -> bool {
        self.current == self.table.finished
    }

    /// Return to the initial state
    pub fn reset(&mut self) {
        self.current = self.table.initial;
    }

    /// A new machine in the initial state sharing this machine's transition table
    pub fn fresh(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            current: self.table.initial,
        }
    }

    /// Number of distinct states referenced by the transition table
    pub fn state_count(&self) -> usize {
        self.table.states.len()
    }
}

/// Accumulates transitions; states are created on first reference
pub struct Builder<S, E, C> {
    states: FxHashMap<S, FxHashMap<E, Transition<S, E, C>>>,
    initial: Option<S>,
    finished: Option<S>,
}

impl<S, E, C> Default for Builder<S, E, C> {
    fn default() -> Self {
        Self {
            states: FxHashMap::default(),
            initial: None,
            finished: None,
        }
    }
}

impl<S, E, C> Builder<S, E, C>
where
    S: Copy + Eq + Hash + Debug,
    E: Copy + Eq + Hash + Debug,
{
    /// Add a transition with a side-effect. A later transition for the same
    /// `(from, event)` pair replaces the earlier one.
    pub fn transition(mut self, from: S, to: S, event: E, action: Action<S, E, C>) -> Self {
        self.states.entry(to).or_default();
        self.states
            .entry(from)
            .or_default()
            .insert(event, Transition { target: to, action });
        self
    }

    /// Add a transition that only changes state
    pub fn silent_transition(self, from: S, to: S, event: E) -> Self {
        self.transition(from, to, event, no_action::<S, E, C>)
    }

    pub fn initial_state(mut self, state: S) -> Self {
        self.states.entry(state).or_default();
        self.initial = Some(state);
        self
    }

    pub fn finished_state(mut self, state: S) -> Self {
        self.states.entry(state).or_default();
        self.finished = Some(state);
        self
    }

    pub fn build(self) -> Result<FiniteStateMachine<S, E, C>> {
        let initial = self.initial.ok_or(MatchError::MissingInitialState)?;
        let finished = self.finished.ok_or(MatchError::MissingFinishedState)?;

        Ok(FiniteStateMachine {
            table: Arc::new(TransitionTable {
                states: self.states,
                initial,
                finished,
            }),
            current: initial,
        })
    }
}
