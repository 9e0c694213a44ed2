use std::{borrow::Cow, sync::Arc};

use esmpack_common::{ChunkIdx, ModuleIdx};
use esmpack_error::BuildResult;
use futures::future::BoxFuture;

use crate::Compilation;

pub const STAGE_DEFAULT: i32 = 0;

/// One registered callback of a hook.
pub struct Tap<F: ?Sized> {
  pub name: Cow<'static, str>,
  pub stage: i32,
  pub callback: Arc<F>,
}

/// Taps of one extension point, ordered by stage and then by registration.
pub struct Hook<F: ?Sized> {
  taps: Vec<Tap<F>>,
}

impl<F: ?Sized> Default for Hook<F> {
  fn default() -> Self {
    Self { taps: vec![] }
  }
}

impl<F: ?Sized> Hook<F> {
  pub fn tap(&mut self, name: impl Into<Cow<'static, str>>, callback: Arc<F>) {
    self.tap_with_stage(name, STAGE_DEFAULT, callback);
  }

  pub fn tap_with_stage(
    &mut self,
    name: impl Into<Cow<'static, str>>,
    stage: i32,
    callback: Arc<F>,
  ) {
    let position = self.taps.partition_point(|tap| tap.stage <= stage);
    self.taps.insert(position, Tap { name: name.into(), stage, callback });
  }

  pub fn is_used(&self) -> bool {
    !self.taps.is_empty()
  }

  pub fn tap_names(&self) -> impl Iterator<Item = &str> {
    self.taps.iter().map(|tap| tap.name.as_ref())
  }

  /// Snapshot of the callbacks, so they can be called while the owner of the hook is borrowed
  /// mutably.
  pub(crate) fn callbacks(&self) -> Vec<Arc<F>> {
    self.taps.iter().map(|tap| Arc::clone(&tap.callback)).collect()
  }
}

pub type CompilationFn = dyn Fn(&mut Compilation) -> BuildResult<()> + Send + Sync;
pub type ExportsDefinitionsFn = dyn Fn(&Compilation) -> Option<bool> + Send + Sync;
pub type FinishModulesFn = dyn Fn(&mut Compilation) -> BuildResult<()> + Send + Sync;
pub type OptimizeChunkModulesFn =
  dyn for<'a> Fn(&'a mut Compilation) -> BoxFuture<'a, BuildResult<()>> + Send + Sync;
pub type RenderStartupFn =
  dyn Fn(&Compilation, &RenderStartupContext, &mut String) -> BuildResult<()> + Send + Sync;

#[derive(Debug, Clone, Copy)]
pub struct RenderStartupContext {
  pub chunk: ChunkIdx,
  pub module: ModuleIdx,
}

#[derive(Default)]
pub struct CompilerHooks {
  /// Called once the compilation object exists, before any module is added.
  pub compilation: Hook<CompilationFn>,
}

#[derive(Default)]
pub struct CompilationHooks {
  /// Whether concatenated modules should compute their final export names. The first tap that
  /// answers decides.
  pub exports_definitions: Hook<ExportsDefinitionsFn>,
  /// Called after every module is built and connected.
  pub finish_modules: Hook<FinishModulesFn>,
  pub optimize_chunk_modules: Hook<OptimizeChunkModulesFn>,
  /// Appends code after the entry module of a chunk.
  pub render_startup: Hook<RenderStartupFn>,
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use super::{ExportsDefinitionsFn, Hook};
  use crate::Compilation;

  fn no_answer(_: &Compilation) -> Option<bool> {
    None
  }

  #[test]
  fn taps_are_ordered_by_stage_then_registration() {
    let mut hook = Hook::<ExportsDefinitionsFn>::default();
    hook.tap_with_stage("late", 10, Arc::new(no_answer));
    hook.tap("first", Arc::new(no_answer));
    hook.tap_with_stage("early", -10, Arc::new(no_answer));
    hook.tap("second", Arc::new(no_answer));
    assert_eq!(hook.tap_names().collect::<Vec<_>>(), ["early", "first", "second", "late"]);
  }
}
