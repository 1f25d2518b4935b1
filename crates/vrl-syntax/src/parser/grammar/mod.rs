//! Grammar productions for the remap language.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! Expression productions return the kind of the node they built (or `Error`),
//! which callers use to decide path continuation and assignment validity.

mod atoms;
mod expressions;
mod queries;
mod statements;
mod structures;
mod validation;
