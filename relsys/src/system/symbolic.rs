// Copyright 2026 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::system::{Result, SystemCore};
use patronus::expr::{Context, ExprRef, Type};

/// Interface shared by functional and relational transition systems.
///
/// Both variants keep their symbols and initial states in a [`SystemCore`]. They only differ
/// in how invariant constraints are stored and how the transition relation is materialized.
pub trait SymbolicSystem {
    fn core(&self) -> &SystemCore;
    fn core_mut(&mut self) -> &mut SystemCore;

    /// Adds a constraint that needs to hold in every step.
    fn add_constraint(&mut self, ctx: &mut Context, constraint: ExprRef) -> Result<()>;

    /// Returns a boolean formula over state, input and next-state variables that is true
    /// for exactly the legal transitions.
    fn transition_relation(&self, ctx: &mut Context) -> ExprRef;

    /// `true` iff every state has a deterministic next-state function.
    fn is_functional(&self) -> bool;

    fn name(&self) -> &str {
        self.core().name()
    }

    fn declare_state(&mut self, ctx: &mut Context, name: &str, tpe: Type) -> Result<ExprRef> {
        self.core_mut().declare_state(ctx, name, tpe)
    }

    fn declare_input(&mut self, ctx: &mut Context, name: &str, tpe: Type) -> Result<ExprRef> {
        self.core_mut().declare_input(ctx, name, tpe)
    }

    fn init(&self) -> ExprRef {
        self.core().init()
    }

    fn constrain_init(&mut self, ctx: &mut Context, constraint: ExprRef) -> Result<()> {
        self.core_mut().constrain_init(ctx, constraint)
    }

    /// See [`SystemCore::curr`]. Unknown symbols are only caught in debug builds.
    fn curr(&self, ctx: &mut Context, e: ExprRef) -> ExprRef {
        self.core().curr(ctx, e)
    }

    /// See [`SystemCore::next`]. Unknown symbols are only caught in debug builds.
    fn next(&self, ctx: &mut Context, e: ExprRef) -> ExprRef {
        self.core().next(ctx, e)
    }

    fn is_curr_var(&self, e: ExprRef) -> bool {
        self.core().is_curr_var(e)
    }

    fn is_next_var(&self, e: ExprRef) -> bool {
        self.core().is_next_var(e)
    }

    fn no_next(&self, ctx: &Context, e: ExprRef) -> bool {
        self.core().no_next(ctx, e)
    }

    fn known_symbols(&self, ctx: &Context, e: ExprRef) -> bool {
        self.core().known_symbols(ctx, e)
    }
}
