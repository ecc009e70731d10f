// Copyright 2023 The Regents of the University of California
// Copyright 2024-2026 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use crate::system::{FunctionalSystem, RelationalSystem, SymbolicSystem, SystemCore};
use patronus::expr::{Context, ExprRef, SerializableIrNode, TypeCheck};
use std::io::Write;

fn serialize_symbols<W: Write>(
    core: &SystemCore,
    ctx: &Context,
    writer: &mut W,
    update: impl Fn(ExprRef) -> Option<ExprRef>,
) -> std::io::Result<()> {
    for &input in core.inputs() {
        writeln!(
            writer,
            "input {} : {}",
            input.serialize_to_str(ctx),
            input.get_type(ctx)
        )?;
    }
    for (state, next) in core.pairing().pairs() {
        writeln!(
            writer,
            "state {} : {} -> {}",
            state.serialize_to_str(ctx),
            state.get_type(ctx),
            next.serialize_to_str(ctx)
        )?;
        if let Some(update) = update(state) {
            write!(writer, "  [next] ")?;
            update.serialize(ctx, writer)?;
            writeln!(writer)?;
        }
    }
    write!(writer, "init ")?;
    core.init().serialize(ctx, writer)?;
    writeln!(writer)
}

impl SerializableIrNode for RelationalSystem {
    fn serialize<W: Write>(&self, ctx: &Context, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "relational {}", self.name())?;
        serialize_symbols(self.core(), ctx, writer, |_| None)?;
        write!(writer, "trans ")?;
        self.trans().serialize(ctx, writer)?;
        writeln!(writer)
    }
}

impl SerializableIrNode for FunctionalSystem {
    fn serialize<W: Write>(&self, ctx: &Context, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "functional {}", self.name())?;
        serialize_symbols(self.core(), ctx, writer, |s| self.next_update(s))?;
        for constraint in self.constraints() {
            write!(writer, "constraint ")?;
            constraint.serialize(ctx, writer)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}
