// listshare/src/pipeline/registry.rs

//! `PipelineRegistry<E>`: pipelines keyed by the type of their context data.

use crate::error::PipelineError;
use crate::pipeline::context::PipelineCtx;
use crate::pipeline::control::PipelineOutcome;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait ErasedPipeline<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<PipelineOutcome, AppErr>;
}

struct Registered<TData, HandlerErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pipeline: Arc<Pipeline<TData, HandlerErr>>,
}

#[async_trait]
impl<TData, HandlerErr, AppErr> ErasedPipeline<AppErr> for Registered<TData, HandlerErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<HandlerErr> + From<PipelineError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<PipelineOutcome, AppErr> {
    let typed = ctx.downcast::<PipelineCtx<TData>>().map_err(|_| {
      AppErr::from(PipelineError::TypeMismatch {
        expected_type: std::any::type_name::<PipelineCtx<TData>>(),
      })
    })?;
    self.pipeline.run(*typed).await.map_err(AppErr::from)
  }
}

/// Holds one pipeline per context type and dispatches runs to it.
///
/// `AppErr` is what [`PipelineRegistry::run`] returns; every registered
/// pipeline's handler error must convert into it.
pub struct PipelineRegistry<AppErr>
where
  AppErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pipelines: RwLock<HashMap<TypeId, Arc<dyn ErasedPipeline<AppErr>>>>,
  names: RwLock<HashMap<TypeId, &'static str>>,
  _app_err: PhantomData<AppErr>,
}

impl<AppErr> PipelineRegistry<AppErr>
where
  AppErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      pipelines: RwLock::new(HashMap::new()),
      names: RwLock::new(HashMap::new()),
      _app_err: PhantomData,
    }
  }

  /// Registers `pipeline`, replacing any pipeline previously registered for `TData`.
  pub fn register<TData, HandlerErr>(&self, pipeline: Pipeline<TData, HandlerErr>)
  where
    TData: 'static + Send + Sync,
    HandlerErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
    AppErr: From<HandlerErr>,
  {
    let type_id = TypeId::of::<TData>();
    event!(Level::DEBUG, pipeline = pipeline.name(), tdata_type = %std::any::type_name::<TData>(), "Registering pipeline.");
    self.names.write().insert(type_id, pipeline.name());
    let erased: Arc<dyn ErasedPipeline<AppErr>> = Arc::new(Registered {
      pipeline: Arc::new(pipeline),
    });
    self.pipelines.write().insert(type_id, erased);
  }

  pub fn is_registered<TData: 'static + Send + Sync>(&self) -> bool {
    self.pipelines.read().contains_key(&TypeId::of::<TData>())
  }

  /// Names of all registered pipelines, sorted.
  pub fn registered_names(&self) -> Vec<&'static str> {
    let mut names: Vec<_> = self.names.read().values().copied().collect();
    names.sort_unstable();
    names
  }

  /// Runs the pipeline registered for `TData` against `ctx`.
  pub async fn run<TData>(&self, ctx: PipelineCtx<TData>) -> Result<PipelineOutcome, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.pipelines.read().get(&TypeId::of::<TData>()).cloned();
    let runner = runner.ok_or_else(|| {
      let type_name = std::any::type_name::<TData>();
      event!(Level::ERROR, "No pipeline registered for {}.", type_name);
      AppErr::from(PipelineError::NotRegistered { type_name })
    })?;
    runner.run_erased(Box::new(ctx)).await
  }
}

impl<AppErr> Default for PipelineRegistry<AppErr>
where
  AppErr: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
