// Copyright 2026 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

use patronus::expr::{Type, TypeCheckError};
use thiserror::Error;

/// Contract violations reported by transition system operations.
/// A failing operation never modifies the system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
    #[error("a symbol named `{0}` already exists in this system")]
    DuplicateSymbol(String),
    #[error("`{symbol}` in `{expr}` is not a state, next-state or input variable of this system")]
    UnknownSymbol { symbol: String, expr: String },
    #[error("initial state constraint `{expr}` refers to next-state variable `{symbol}`")]
    NextVarInInit { symbol: String, expr: String },
    #[error("`{expr}` is of type {actual}, expected {expected}")]
    SortMismatch {
        expr: String,
        expected: Type,
        actual: Type,
    },
    #[error("ill-typed expression `{expr}`: {msg}")]
    TypeCheck { expr: String, msg: String },
    #[error("`{0}` is not a symbol")]
    NotASymbol(String),
    #[error("`{0}` is not a state variable of this system")]
    NotAStateVariable(String),
    #[error("the next state of `{0}` has already been assigned")]
    NextAlreadyAssigned(String),
    #[error("update `{expr}` of `{state}` refers to next-state variable `{symbol}`")]
    NextInUpdate {
        state: String,
        symbol: String,
        expr: String,
    },
}

impl SystemError {
    pub(crate) fn type_check(expr: String, err: TypeCheckError) -> Self {
        SystemError::TypeCheck {
            expr,
            msg: err.get_msg().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SystemError>;
