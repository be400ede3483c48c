//! Crustaspic is a structured argumentation (ASPIC+) evaluator.
//!
//! Theories are turned into arguments, attacks and defeats, and the arguments are labelled with the grounded semantics.
//! The preferences of stored argument graphs can be translated to and from the preference pairs of the theories.

#![warn(missing_docs)]

pub mod aspic;

pub mod evaluation;

pub mod graph;

pub mod io;

pub mod preferences;

pub mod rationality;

pub mod semantics;
