// Copyright 2023-2024 The Regents of the University of California
// Copyright 2024-2026 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

mod base;
mod error;
mod functional;
mod registry;
mod relational;
mod serialize;
mod symbolic;

pub use base::{SystemCore, SystemOptions};
pub use error::{Result, SystemError};
pub use functional::FunctionalSystem;
pub use registry::StatePairing;
pub use relational::RelationalSystem;
pub use symbolic::SymbolicSystem;
