// Copyright 2026 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::system::base::conjoin_all;
use crate::system::{Result, SymbolicSystem, SystemCore, SystemError, SystemOptions};
use patronus::expr::{Context, ExprRef, SerializableIrNode, Type, TypeCheck};
use patronus::system::{State, TransitionSystem};

/// A transition system where the next state of every state variable is a function of the
/// current state and inputs. States without a next function are unconstrained.
///
/// Next-state functions and constraints live in a patronus [`TransitionSystem`], the paired
/// next-state variables and the initial state formula live in the [`SystemCore`].
#[derive(Debug, Clone)]
pub struct FunctionalSystem {
    core: SystemCore,
    sys: TransitionSystem,
}

impl FunctionalSystem {
    pub fn new(ctx: &Context, name: &str) -> Self {
        Self::with_options(ctx, name, SystemOptions::default())
    }

    pub fn with_options(ctx: &Context, name: &str, options: SystemOptions) -> Self {
        Self {
            core: SystemCore::new(ctx, name, options),
            sys: TransitionSystem::new(name.to_string()),
        }
    }

    /// Wraps an existing system, e.g., one parsed from btor2. Every state gets a next-state
    /// variable and initial values become part of the initial state formula.
    pub fn from_transition_system(ctx: &mut Context, sys: TransitionSystem) -> Result<Self> {
        Self::from_transition_system_with_options(ctx, sys, SystemOptions::default())
    }

    pub fn from_transition_system_with_options(
        ctx: &mut Context,
        sys: TransitionSystem,
        options: SystemOptions,
    ) -> Result<Self> {
        let mut core = SystemCore::new(ctx, &sys.name, options);
        for &input in sys.inputs.iter() {
            core.add_input(ctx, input)?;
        }
        for state in sys.states.iter() {
            core.add_state(ctx, state.symbol)?;
        }
        for state in sys.states.iter() {
            if let Some(init) = state.init {
                core.check_type(ctx, init, state.symbol.get_type(ctx))?;
                let is_init = ctx.equal(state.symbol, init);
                core.constrain_init(ctx, is_init)?;
            }
            if let Some(next) = state.next {
                check_update(&core, ctx, state.symbol, next)?;
            }
        }
        for &constraint in sys.constraints.iter() {
            core.check_trans(ctx, constraint)?;
        }
        tracing::debug!(
            system = %sys.name,
            states = sys.states.len(),
            inputs = sys.inputs.len(),
            "imported transition system"
        );
        Ok(Self { core, sys })
    }

    /// The underlying system with next-state functions and constraints.
    pub fn system(&self) -> &TransitionSystem {
        &self.sys
    }

    /// Defines the next state of `state` as `update`.
    pub fn assign_next(&mut self, ctx: &Context, state: ExprRef, update: ExprRef) -> Result<()> {
        let Some(index) = self.sys.states.iter().position(|s| s.symbol == state) else {
            return Err(SystemError::NotAStateVariable(state.serialize_to_str(ctx)));
        };
        if self.sys.states[index].next.is_some() {
            return Err(SystemError::NextAlreadyAssigned(state.serialize_to_str(ctx)));
        }
        check_update(&self.core, ctx, state, update)?;
        self.sys.states[index].next = Some(update);
        tracing::trace!(
            system = %self.core.name(),
            state = %state.serialize_to_str(ctx),
            update = %update.serialize_to_str(ctx),
            "assigned next state"
        );
        Ok(())
    }

    pub fn next_update(&self, state: ExprRef) -> Option<ExprRef> {
        self.sys
            .states
            .iter()
            .find(|s| s.symbol == state)
            .and_then(|s| s.next)
    }

    pub fn constraints(&self) -> &[ExprRef] {
        &self.sys.constraints
    }
}

/// Next-state functions are over current states and inputs and of the same type as the state.
fn check_update(core: &SystemCore, ctx: &Context, state: ExprRef, update: ExprRef) -> Result<()> {
    core.check_type(ctx, update, state.get_type(ctx))?;
    core.check_known_symbols(ctx, update)?;
    match core.first_next_var(ctx, update) {
        None => Ok(()),
        Some(symbol) => Err(SystemError::NextInUpdate {
            state: state.serialize_to_str(ctx),
            symbol: symbol.serialize_to_str(ctx),
            expr: update.serialize_to_str(ctx),
        }),
    }
}

impl SymbolicSystem for FunctionalSystem {
    fn core(&self) -> &SystemCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SystemCore {
        &mut self.core
    }

    /// Constraints are kept in a separate list and only conjoined when the transition
    /// relation is materialized.
    fn add_constraint(&mut self, ctx: &mut Context, constraint: ExprRef) -> Result<()> {
        self.core.check_trans(ctx, constraint)?;
        self.sys.constraints.push(constraint);
        Ok(())
    }

    fn transition_relation(&self, ctx: &mut Context) -> ExprRef {
        let states = self.sys.state_map();
        let mut conjuncts = Vec::with_capacity(states.len() + self.sys.constraints.len());
        for (state, next) in self.core.pairing().pairs() {
            if let Some(update) = states.get(&state).and_then(|s| s.next) {
                conjuncts.push(ctx.equal(next, update));
            }
        }
        conjuncts.extend(self.sys.constraints.iter().copied());
        conjoin_all(ctx, conjuncts)
    }

    fn is_functional(&self) -> bool {
        true
    }

    fn declare_state(&mut self, ctx: &mut Context, name: &str, tpe: Type) -> Result<ExprRef> {
        let symbol = self.core.declare_state(ctx, name, tpe)?;
        let state = State {
            symbol,
            init: None,
            next: None,
        };
        self.sys.add_state(ctx, state);
        Ok(symbol)
    }

    fn declare_input(&mut self, ctx: &mut Context, name: &str, tpe: Type) -> Result<ExprRef> {
        let symbol = self.core.declare_input(ctx, name, tpe)?;
        self.sys.add_input(ctx, symbol);
        Ok(symbol)
    }
}
