// listshare/src/pipeline/mod.rs

//! A small asynchronous step-pipeline engine.
//!
//! A [`Pipeline`] is an ordered list of named steps. Each step has one or more
//! async handlers operating on a shared [`PipelineCtx`]. Steps may be optional
//! or skipped by a predicate, and any handler may stop the run early.
//! [`PipelineRegistry`] keys pipelines by their context type so request
//! handlers can dispatch on the data they build.

pub mod context;
pub mod control;
pub mod definition;
pub mod execution;
pub mod registry;

pub use context::PipelineCtx;
pub use control::{PipelineOutcome, StepControl};
pub use definition::{Pipeline, SkipIf, StepDef, StepHandler};
pub use registry::PipelineRegistry;
