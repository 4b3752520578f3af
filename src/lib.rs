//! Flux Grid (workspace facade crate).
//!
//! Re-exports the workspace crates as `flux_grid::{core, engine, types}` and
//! hosts the headless autoplay runner used by the `flux-grid` binary.

pub mod autoplay;

pub use flux_grid_core as core;
pub use flux_grid_engine as engine;
pub use flux_grid_types as types;
