//! Stage-based analysis pipeline.
//!
//! - [`artifacts`]: the values passed between stages
//! - [`traits`]: one trait per stage boundary
//! - [`runner`]: composes stages and runs them in order
//! - [`observer`]: stage-boundary hooks
//! - [`spec`], [`validation`]: JSON run descriptions and their checks

pub mod artifacts;
pub mod error_code;
pub mod errors;
pub mod observer;
pub mod runner;
pub mod spec;
pub mod traits;
pub mod validation;
