// listshare/src/pipeline/execution.rs

use crate::error::PipelineError;
use crate::pipeline::context::PipelineCtx;
use crate::pipeline::control::{PipelineOutcome, StepControl};
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Runs every step in declaration order against `ctx`.
  ///
  /// The first handler error aborts the run and is returned as-is. A required
  /// step with no handlers fails with [`PipelineError::HandlerMissing`].
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(pipeline = self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx: PipelineCtx<TData>) -> Result<PipelineOutcome, Err> {
    for (step_idx, step) in self.steps.iter().enumerate() {
      let step_span = tracing::info_span!(
        "pipeline_step",
        step_name = step.name.as_str(),
        step_index = step_idx,
        optional = step.optional
      );

      if let Some(skip_if) = &step.skip_if {
        if ctx.with(|data| skip_if(data)) {
          event!(parent: &step_span, Level::DEBUG, "Step skipped by its condition.");
          continue;
        }
      }

      let handlers = match self.handlers.get(&step.name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ if step.optional => {
          event!(parent: &step_span, Level::DEBUG, "Optional step has no handlers, skipping.");
          continue;
        }
        _ => {
          event!(parent: &step_span, Level::ERROR, "Required step has no handlers.");
          return Err(Err::from(PipelineError::HandlerMissing {
            pipeline: self.name,
            step_name: step.name.clone(),
          }));
        }
      };

      for handler in handlers {
        match handler(ctx.clone()).instrument(step_span.clone()).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Stop) => {
            event!(parent: &step_span, Level::INFO, "Pipeline stopped by handler.");
            return Ok(PipelineOutcome::Stopped);
          }
          Err(e) => {
            event!(parent: &step_span, Level::WARN, error = %e, "Step handler failed.");
            return Err(e);
          }
        }
      }
    }

    Ok(PipelineOutcome::Completed)
  }
}
