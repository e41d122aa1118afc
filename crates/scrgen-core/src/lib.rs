//! # scrgen-core
//!
//! Compiler from the Service-Component shortcut header to SCR component
//! descriptor documents.
//!
//! Handles:
//! - **Parser**: Lexing and clause parsing of the manifest header.
//! - **Index**: Class-index and annotation-reader collaborator traits.
//! - **Resolver**: Pass-through vs. annotation discovery, attribute merging.
//! - **Reference**: Interpretation of reference attributes (bind/unbind,
//!   cardinality, target filter).
//! - **Namespace**: Descriptor schema version selection.
//! - **Emitter**: Canonical XML rendering of a resolved component.
//! - **Pipeline**: End-to-end compilation with diagnostic accumulation.

pub mod emitter;
pub mod index;
pub mod namespace;
pub mod parser;
pub mod pipeline;
pub mod reference;
pub mod resolver;
