// Copyright 2026 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

//! # State Pairing
//!
//! Every state variable is paired with exactly one next-state variable. The pairing is
//! stored in both directions, so that both `curr` and `next` can be implemented as a
//! single substitution and classifying a symbol is a hash lookup.

use patronus::expr::ExprRef;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Default)]
pub struct StatePairing {
    /// state variables in declaration order
    states: Vec<ExprRef>,
    /// current state -> next state
    states_map: FxHashMap<ExprRef, ExprRef>,
    /// next state -> current state
    next_states_map: FxHashMap<ExprRef, ExprRef>,
}

impl StatePairing {
    /// Records a new pair. Both symbols must be fresh.
    pub(crate) fn insert(&mut self, state: ExprRef, next: ExprRef) {
        debug_assert_ne!(state, next);
        debug_assert!(!self.contains(state), "{state:?} is already paired");
        debug_assert!(!self.contains(next), "{next:?} is already paired");
        self.states.push(state);
        self.states_map.insert(state, next);
        self.next_states_map.insert(next, state);
    }

    fn contains(&self, e: ExprRef) -> bool {
        self.is_curr(e) || self.is_next(e)
    }

    pub fn is_curr(&self, e: ExprRef) -> bool {
        self.states_map.contains_key(&e)
    }

    pub fn is_next(&self, e: ExprRef) -> bool {
        self.next_states_map.contains_key(&e)
    }

    pub fn next_of(&self, state: ExprRef) -> Option<ExprRef> {
        self.states_map.get(&state).copied()
    }

    pub fn curr_of(&self, next: ExprRef) -> Option<ExprRef> {
        self.next_states_map.get(&next).copied()
    }

    /// State variables in declaration order.
    pub fn states(&self) -> impl Iterator<Item = ExprRef> + '_ {
        self.states.iter().copied()
    }

    /// Next-state variables, in the declaration order of their state.
    pub fn next_states(&self) -> impl Iterator<Item = ExprRef> + '_ {
        self.states.iter().map(|s| self.states_map[s])
    }

    /// `(state, next)` pairs in declaration order.
    pub fn pairs(&self) -> impl Iterator<Item = (ExprRef, ExprRef)> + '_ {
        self.states.iter().map(|s| (*s, self.states_map[s]))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Rewrite table from current to next state.
    pub(crate) fn to_next_table(&self) -> &FxHashMap<ExprRef, ExprRef> {
        &self.states_map
    }

    /// Rewrite table from next to current state.
    pub(crate) fn to_curr_table(&self) -> &FxHashMap<ExprRef, ExprRef> {
        &self.next_states_map
    }
}
