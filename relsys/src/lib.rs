// Copyright 2023 The Regents of the University of California
// Copyright 2024-2026 Cornell University
// released under BSD 3-Clause License
// author: Kevin Laeufer <laeufer@cornell.edu>

//! # relsys
//!
//! Relational transition systems on top of the `patronus` expression library. A system is
//! described by an initial state formula and a transition relation over current-state, input
//! and next-state variables. Every state variable is paired with a next-state variable when it
//! is declared, which allows formulas to be shifted between the current and the next time frame.
//!
//! All expressions handed to a system must be created in the same [`patronus::expr::Context`]
//! that is passed to its methods.

pub mod system;
