//! Build orchestration: configuration, process plumbing, and the pipeline itself.

pub(crate) mod config;
pub(crate) mod pipeline;
pub(crate) mod python;
pub(crate) mod runtime;
pub(crate) mod tooling;
