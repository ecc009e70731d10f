// Copyright 2026 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::system::registry::StatePairing;
use crate::system::{Result, SystemError};
use patronus::expr::*;
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemOptions {
    /// Appended to a state name to derive the name of its next-state variable.
    /// A counter is added whenever the resulting name is already in use.
    pub next_suffix: String,
}

impl Default for SystemOptions {
    fn default() -> Self {
        Self {
            next_suffix: ".next".to_string(),
        }
    }
}

/// Symbols and initial states shared by all transition system variants.
///
/// Symbols are identified by their [`ExprRef`]. The context does not record which handles
/// it created, so a handle from a different [`Context`] is read as whatever expression has
/// the same index in the context passed to a method.
#[derive(Debug, Clone)]
pub struct SystemCore {
    name: String,
    options: SystemOptions,
    inputs: Vec<ExprRef>,
    input_set: FxHashSet<ExprRef>,
    pairing: StatePairing,
    /// every symbol known to the system, including next-state variables
    names: FxHashMap<String, ExprRef>,
    init: ExprRef,
}

impl SystemCore {
    pub fn new(ctx: &Context, name: &str, options: SystemOptions) -> Self {
        Self {
            name: name.to_string(),
            options,
            inputs: vec![],
            input_set: FxHashSet::default(),
            pairing: StatePairing::default(),
            names: FxHashMap::default(),
            init: ctx.get_true(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &SystemOptions {
        &self.options
    }

    pub fn init(&self) -> ExprRef {
        self.init
    }

    pub fn inputs(&self) -> &[ExprRef] {
        &self.inputs
    }

    pub fn states(&self) -> impl Iterator<Item = ExprRef> + '_ {
        self.pairing.states()
    }

    pub fn pairing(&self) -> &StatePairing {
        &self.pairing
    }

    pub fn next_of(&self, state: ExprRef) -> Option<ExprRef> {
        self.pairing.next_of(state)
    }

    pub fn curr_of(&self, next: ExprRef) -> Option<ExprRef> {
        self.pairing.curr_of(next)
    }

    /// Looks up a state, next-state or input variable by name.
    pub fn get_symbol(&self, name: &str) -> Option<ExprRef> {
        self.names.get(name).copied()
    }

    pub fn is_curr_var(&self, e: ExprRef) -> bool {
        self.pairing.is_curr(e)
    }

    pub fn is_next_var(&self, e: ExprRef) -> bool {
        self.pairing.is_next(e)
    }

    pub fn is_input_var(&self, e: ExprRef) -> bool {
        self.input_set.contains(&e)
    }

    fn is_known(&self, e: ExprRef) -> bool {
        self.is_curr_var(e) || self.is_next_var(e) || self.is_input_var(e)
    }

    /// Declares a new state variable and its next-state variable.
    pub fn declare_state(&mut self, ctx: &mut Context, name: &str, tpe: Type) -> Result<ExprRef> {
        self.check_fresh_name(name)?;
        let name_ref = ctx.string(name.into());
        let symbol = ctx.symbol(name_ref, tpe);
        self.register_state(ctx, symbol, name);
        Ok(symbol)
    }

    /// Registers an existing symbol as a state variable.
    pub fn add_state(&mut self, ctx: &mut Context, symbol: ExprRef) -> Result<ExprRef> {
        let name = self.check_fresh_symbol(ctx, symbol)?;
        self.register_state(ctx, symbol, &name);
        Ok(symbol)
    }

    pub fn declare_input(&mut self, ctx: &mut Context, name: &str, tpe: Type) -> Result<ExprRef> {
        self.check_fresh_name(name)?;
        let name_ref = ctx.string(name.into());
        let symbol = ctx.symbol(name_ref, tpe);
        self.register_input(ctx, symbol, name);
        Ok(symbol)
    }

    /// Registers an existing symbol as an input.
    pub fn add_input(&mut self, ctx: &mut Context, symbol: ExprRef) -> Result<ExprRef> {
        let name = self.check_fresh_symbol(ctx, symbol)?;
        self.register_input(ctx, symbol, &name);
        Ok(symbol)
    }

    fn check_fresh_name(&self, name: &str) -> Result<()> {
        if self.names.contains_key(name) {
            Err(SystemError::DuplicateSymbol(name.to_string()))
        } else {
            Ok(())
        }
    }

    fn check_fresh_symbol(&self, ctx: &Context, symbol: ExprRef) -> Result<String> {
        let Some(name) = ctx.get_symbol_name(symbol) else {
            return Err(SystemError::NotASymbol(symbol.serialize_to_str(ctx)));
        };
        self.check_fresh_name(name)?;
        Ok(name.to_string())
    }

    fn register_state(&mut self, ctx: &mut Context, symbol: ExprRef, name: &str) {
        let (next, next_name) = self.mint_next(ctx, symbol, name);
        self.names.insert(name.to_string(), symbol);
        self.names.insert(next_name, next);
        self.pairing.insert(symbol, next);
        tracing::debug!(
            system = %self.name,
            state = name,
            next = %next.serialize_to_str(ctx),
            "declared state"
        );
    }

    fn register_input(&mut self, ctx: &Context, symbol: ExprRef, name: &str) {
        self.names.insert(name.to_string(), symbol);
        self.inputs.push(symbol);
        self.input_set.insert(symbol);
        tracing::debug!(
            system = %self.name,
            input = %symbol.serialize_to_str(ctx),
            "declared input"
        );
    }

    /// Creates the next-state variable for `state`. The name is derived from the state name
    /// and is not used by any other symbol of this system.
    fn mint_next(&self, ctx: &mut Context, state: ExprRef, name: &str) -> (ExprRef, String) {
        let base = format!("{name}{}", self.options.next_suffix);
        let mut candidate = base.clone();
        let mut count = 0usize;
        while self.names.contains_key(&candidate) || candidate == name {
            count += 1;
            candidate = format!("{base}_{count}");
        }
        let tpe = state.get_type(ctx);
        let name_ref = ctx.string(candidate.as_str().into());
        let next = ctx.symbol(name_ref, tpe);
        (next, candidate)
    }

    /// Turns every input into a state variable with an unconstrained next state.
    pub(crate) fn promote_inputs(&mut self, ctx: &mut Context) -> Vec<ExprRef> {
        let inputs = std::mem::take(&mut self.inputs);
        self.input_set.clear();
        for &input in inputs.iter() {
            let name = ctx.get_symbol_name(input).unwrap_or_default().to_string();
            let (next, next_name) = self.mint_next(ctx, input, &name);
            self.names.insert(next_name, next);
            self.pairing.insert(input, next);
            tracing::debug!(
                system = %self.name,
                state = %name,
                next = %next.serialize_to_str(ctx),
                "promoted input to state"
            );
        }
        inputs
    }

    /// Returns `true` iff no next-state variable appears in `e`.
    pub fn no_next(&self, ctx: &Context, e: ExprRef) -> bool {
        self.first_next_var(ctx, e).is_none()
    }

    /// Returns `true` iff all symbols in `e` are state, next-state or input variables.
    pub fn known_symbols(&self, ctx: &Context, e: ExprRef) -> bool {
        find_symbol_where(ctx, e, |s| !self.is_known(s)).is_none()
    }

    pub(crate) fn check_type(&self, ctx: &Context, e: ExprRef, expected: Type) -> Result<()> {
        let actual = e
            .type_check(ctx)
            .map_err(|err| SystemError::type_check(e.serialize_to_str(ctx), err))?;
        if actual == expected {
            Ok(())
        } else {
            Err(SystemError::SortMismatch {
                expr: e.serialize_to_str(ctx),
                expected,
                actual,
            })
        }
    }

    pub(crate) fn check_known_symbols(&self, ctx: &Context, e: ExprRef) -> Result<()> {
        match find_symbol_where(ctx, e, |s| !self.is_known(s)) {
            None => Ok(()),
            Some(symbol) => Err(SystemError::UnknownSymbol {
                symbol: symbol.serialize_to_str(ctx),
                expr: e.serialize_to_str(ctx),
            }),
        }
    }

    pub(crate) fn first_next_var(&self, ctx: &Context, e: ExprRef) -> Option<ExprRef> {
        find_symbol_where(ctx, e, |s| self.is_next_var(s))
    }

    pub(crate) fn check_no_next(&self, ctx: &Context, e: ExprRef) -> Result<()> {
        match self.first_next_var(ctx, e) {
            None => Ok(()),
            Some(symbol) => Err(SystemError::NextVarInInit {
                symbol: symbol.serialize_to_str(ctx),
                expr: e.serialize_to_str(ctx),
            }),
        }
    }

    /// Boolean formula over states and inputs.
    pub(crate) fn check_init(&self, ctx: &Context, e: ExprRef) -> Result<()> {
        self.check_type(ctx, e, Type::BOOL)?;
        self.check_known_symbols(ctx, e)?;
        self.check_no_next(ctx, e)
    }

    /// Boolean formula over states, next states and inputs.
    pub(crate) fn check_trans(&self, ctx: &Context, e: ExprRef) -> Result<()> {
        self.check_type(ctx, e, Type::BOOL)?;
        self.check_known_symbols(ctx, e)
    }

    pub fn set_init(&mut self, ctx: &Context, init: ExprRef) -> Result<()> {
        self.check_init(ctx, init)?;
        self.replace_init(ctx, init);
        Ok(())
    }

    pub fn constrain_init(&mut self, ctx: &mut Context, constraint: ExprRef) -> Result<()> {
        self.check_init(ctx, constraint)?;
        self.init = conjoin(ctx, self.init, constraint);
        tracing::trace!(
            system = %self.name,
            constraint = %constraint.serialize_to_str(ctx),
            "constrained init"
        );
        Ok(())
    }

    /// Replaces the initial state formula. Callers need to validate `init` first.
    pub(crate) fn replace_init(&mut self, ctx: &Context, init: ExprRef) {
        self.init = init;
        tracing::debug!(system = %self.name, init = %init.serialize_to_str(ctx), "replaced init");
    }

    /// Replaces all next-state variables with their current-state variable.
    ///
    /// All symbols in `e` need to be known to the system. This is only checked in debug
    /// builds, release builds leave unknown symbols untouched.
    pub fn curr(&self, ctx: &mut Context, e: ExprRef) -> ExprRef {
        debug_assert!(self.known_symbols(ctx, e), "{}", e.serialize_to_str(ctx));
        let out = substitute(ctx, e, self.pairing.to_curr_table());
        tracing::trace!(from = %e.serialize_to_str(ctx), to = %out.serialize_to_str(ctx), "curr");
        out
    }

    /// Replaces all current-state variables with their next-state variable.
    ///
    /// All symbols in `e` need to be known to the system. This is only checked in debug
    /// builds, release builds leave unknown symbols untouched.
    pub fn next(&self, ctx: &mut Context, e: ExprRef) -> ExprRef {
        debug_assert!(self.known_symbols(ctx, e), "{}", e.serialize_to_str(ctx));
        let out = substitute(ctx, e, self.pairing.to_next_table());
        tracing::trace!(from = %e.serialize_to_str(ctx), to = %out.serialize_to_str(ctx), "next");
        out
    }
}

/// Returns the symbol with the smallest id in `e` that fulfills `pred`.
/// Picking the smallest id keeps error messages deterministic.
fn find_symbol_where(
    ctx: &Context,
    e: ExprRef,
    mut pred: impl FnMut(ExprRef) -> bool,
) -> Option<ExprRef> {
    find_symbols(ctx, e).into_iter().filter(|&s| pred(s)).min()
}

/// Replaces all symbols in `table` simultaneously.
fn substitute(ctx: &mut Context, e: ExprRef, table: &FxHashMap<ExprRef, ExprRef>) -> ExprRef {
    if table.is_empty() {
        return e;
    }
    simple_transform_expr(ctx, e, |_, e, _| table.get(&e).copied())
}

/// `a ∧ b`, where a literal `true` on the left is dropped.
pub(crate) fn conjoin(ctx: &mut Context, a: ExprRef, b: ExprRef) -> ExprRef {
    if ctx[a].is_true() { b } else { ctx.and(a, b) }
}

/// Conjunction of all `items`, `true` if there are none.
pub(crate) fn conjoin_all(ctx: &mut Context, items: impl IntoIterator<Item = ExprRef>) -> ExprRef {
    items
        .into_iter()
        .fold(ctx.get_true(), |acc, item| conjoin(ctx, acc, item))
}
