//! # nftspec-emit
//!
//! Output materialization for a compiled specification:
//! - [`render`]: the `Renderer` seam and the `{{ key }}` placeholder renderer
//! - [`skeleton`]: copy a skeleton tree while skipping excluded artifacts,
//!   then render planned artifacts in place
//!
//! It carries no domain semantics. What to copy and what to render comes
//! from the kernel's `MaterializePlan`.

pub mod render;
pub mod skeleton;

pub use render::{PlaceholderRenderer, RenderError, Renderer};
pub use skeleton::{MaterializeError, MaterializeOutcome, copy_skeleton, materialize};
