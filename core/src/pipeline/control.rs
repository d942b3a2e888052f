// listshare/src/pipeline/control.rs

/// Returned by a step handler to continue with the next handler/step or to halt the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  Continue,
  Stop,
}

/// How a pipeline run ended when no handler failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
  /// Every step ran (or was skipped) to the end.
  Completed,
  /// A handler returned [`StepControl::Stop`].
  Stopped,
}
