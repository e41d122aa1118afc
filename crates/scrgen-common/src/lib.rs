//! # scrgen-common
//!
//! Shared error types, diagnostic accumulation, version parsing, and
//! constants used across the scrgen workspace.
//!
//! This crate is the leaf of the dependency graph — it depends on no other
//! internal crate and provides the foundational primitives that the compiler
//! core and the CLI build upon.

pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod version;
