// Copyright 2026 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::system::base::conjoin;
use crate::system::{FunctionalSystem, Result, SymbolicSystem, SystemCore, SystemOptions};
use patronus::expr::{Context, ExprRef, SerializableIrNode};

/// A transition system whose behavior is described by a single transition relation over
/// state, input and next-state variables. The relation may be non-deterministic.
///
/// All expressions passed to a system need to be built in the [`Context`] the system was
/// declared in. A handle from another context is not detected and refers to whatever
/// expression has the same index.
#[derive(Debug, Clone)]
pub struct RelationalSystem {
    core: SystemCore,
    trans: ExprRef,
}

impl RelationalSystem {
    /// Creates an empty system. All transitions are legal until constrained.
    pub fn new(ctx: &Context, name: &str) -> Self {
        Self::with_options(ctx, name, SystemOptions::default())
    }

    pub fn with_options(ctx: &Context, name: &str, options: SystemOptions) -> Self {
        Self {
            core: SystemCore::new(ctx, name, options),
            trans: ctx.get_true(),
        }
    }

    /// Converts a functional system. Symbols and their pairing are kept as is, the next-state
    /// functions and constraints become the transition relation.
    pub fn from_functional(ctx: &mut Context, sys: &FunctionalSystem) -> Self {
        let trans = sys.transition_relation(ctx);
        tracing::debug!(system = %sys.name(), "converted functional system to relational");
        Self {
            core: sys.core().clone(),
            trans,
        }
    }

    pub fn trans(&self) -> ExprRef {
        self.trans
    }

    /// Replaces the transition relation.
    pub fn set_trans(&mut self, ctx: &Context, trans: ExprRef) -> Result<()> {
        self.core.check_trans(ctx, trans)?;
        self.replace_trans(ctx, trans);
        Ok(())
    }

    /// Replaces both, the initial states and the transition relation.
    /// Nothing is changed if either formula is rejected.
    pub fn set_behavior(&mut self, ctx: &Context, init: ExprRef, trans: ExprRef) -> Result<()> {
        self.core.check_init(ctx, init)?;
        self.core.check_trans(ctx, trans)?;
        self.core.replace_init(ctx, init);
        self.replace_trans(ctx, trans);
        Ok(())
    }

    /// Conjoins `constraint` with the transition relation.
    pub fn constrain_trans(&mut self, ctx: &mut Context, constraint: ExprRef) -> Result<()> {
        self.core.check_trans(ctx, constraint)?;
        self.trans = conjoin(ctx, self.trans, constraint);
        tracing::trace!(
            system = %self.core.name(),
            constraint = %constraint.serialize_to_str(ctx),
            "constrained trans"
        );
        Ok(())
    }

    /// Turns all inputs into state variables whose next state is unconstrained.
    /// Returns the promoted symbols.
    pub fn promote_inputs(&mut self, ctx: &mut Context) -> Vec<ExprRef> {
        self.core.promote_inputs(ctx)
    }

    fn replace_trans(&mut self, ctx: &Context, trans: ExprRef) {
        self.trans = trans;
        tracing::debug!(
            system = %self.core.name(),
            trans = %trans.serialize_to_str(ctx),
            "replaced trans"
        );
    }
}

impl SymbolicSystem for RelationalSystem {
    fn core(&self) -> &SystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }

    /// Invariant constraints become part of the transition relation.
    fn add_constraint(&mut self, ctx: &mut Context, constraint: ExprRef) -> Result<()> {
        self.constrain_trans(ctx, constraint)
    }

    fn transition_relation(&self, _ctx: &mut Context) -> ExprRef {
        self.trans
    }

    fn is_functional(&self) -> bool {
        false
    }
}
