// listshare/src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` definition: step list, skip conditions and handler registration.

use crate::error::PipelineError;
use crate::pipeline::context::PipelineCtx;
use crate::pipeline::control::StepControl;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed async step handler. It receives a clone of the run's context handle.
pub type StepHandler<TData, Err> = Box<
  dyn Fn(PipelineCtx<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// Predicate evaluated against the current state before a step runs; `true` skips the step.
pub type SkipIf<TData> = Arc<dyn Fn(&TData) -> bool + Send + Sync + 'static>;

#[derive(Clone)]
pub struct StepDef<TData: 'static + Send + Sync> {
  pub name: String,
  pub optional: bool,
  pub skip_if: Option<SkipIf<TData>>,
}

impl<TData: 'static + Send + Sync> std::fmt::Debug for StepDef<TData> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StepDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("has_skip_condition", &self.skip_if.is_some())
      .finish()
  }
}

/// An ordered sequence of named steps over context data `TData`.
///
/// `Err` is the error type handlers resolve to. It must absorb
/// [`PipelineError`] so the engine can report configuration faults such as a
/// required step with no handler.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub(crate) name: &'static str,
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) handlers: HashMap<String, Vec<StepHandler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(step_name, optional)` pairs, in execution order.
  pub fn new(name: &'static str, step_defs: &[(&str, bool)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(step, optional)| StepDef {
        name: (*step).to_string(),
        optional: *optional,
        skip_if: None,
      })
      .collect();

    Self {
      name,
      steps,
      handlers: HashMap::new(),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Panics when `step_name` was not declared. Pipelines are assembled once at
  /// startup, so a typo here is a programming error rather than a runtime fault.
  fn step_mut(&mut self, step_name: &str) -> &mut StepDef<TData> {
    let pipeline = self.name;
    match self.steps.iter_mut().find(|s| s.name == step_name) {
      Some(step) => step,
      None => panic!("Pipeline '{}' has no step named '{}'.", pipeline, step_name),
    }
  }

  pub fn skip_step_if(&mut self, step_name: &str, predicate: impl Fn(&TData) -> bool + Send + Sync + 'static) {
    self.step_mut(step_name).skip_if = Some(Arc::new(predicate));
  }

  /// Registers an async handler for `step_name`. Handlers of one step run in
  /// registration order. The handler's own error type only needs to convert
  /// into the pipeline's `Err`.
  pub fn on_step<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(PipelineCtx<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.step_mut(step_name);
    let boxed: StepHandler<TData, Err> = Box::new(move |ctx| {
      let fut = handler_fn(ctx);
      Box::pin(async move { fut.await.map_err(Into::into) })
    });
    self.handlers.entry(step_name.to_string()).or_default().push(boxed);
  }
}
