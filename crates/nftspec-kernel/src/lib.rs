//! # nftspec kernel
//!
//! The middle end of the nftspec compiler: it takes a parsed description of
//! an ERC-721 contract's feature set and turns it into a fully resolved
//! feature selection plus the data a template renderer needs.
//!
//! ## Pipeline
//!
//! ```text
//! SpecificationTree     ← parsed input (TOML / JSON)
//!     │
//! validate              ← derive → include → extend → modify, fail-fast
//!     │  └─ FeatureSet::mark_used   (closure over the registry)
//!     │
//! RenderContext         ← imports, extension lists, fields, modifiers
//!     │
//! MaterializePlan       ← excluded artifacts + artifacts to render
//! ```
//!
//! The kernel performs no filesystem writes.

pub mod compile;
pub mod context;
pub mod error;
pub mod materialize;
pub mod registry;
mod resolve;
pub mod spec_tree;
pub mod validate;

pub use compile::{Compilation, compile};
pub use context::RenderContext;
pub use error::CompileError;
pub use materialize::MaterializePlan;
pub use registry::{FeatureKind, FeatureNode, FeatureRegistry, FeatureSet};
pub use spec_tree::{
    FieldDecl, FieldKind, IncludeDecl, ModifierBinding, Param, SpecLoadError, SpecificationTree,
};
pub use validate::{Phase, ResolvedField, Selection, ValidatedSpec, validate};
