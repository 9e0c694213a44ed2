use std::sync::Arc;

use esmpack_common::{LibraryOptions, RuntimeSpec};
use esmpack_error::{BuildResult, ConfigError};
use esmpack_utils::indexmap::FxIndexSet;
use futures::future::BoxFuture;

use super::{parse_library_options, render_library_exports};
use crate::{concatenate, Compilation, CompilerHooks, ConcatConfiguration, Plugin, STAGE_DEFAULT};

/// ES module output that keeps externals as imports. An entry chunk holding a single module gets
/// that module concatenated, so its exports can be emitted under their final names.
#[derive(Debug)]
pub struct ModernModuleLibraryPlugin;

impl ModernModuleLibraryPlugin {
  pub fn new(options: &LibraryOptions) -> Result<Self, ConfigError> {
    parse_library_options(options)?;
    Ok(Self)
  }
}

impl Plugin for ModernModuleLibraryPlugin {
  fn apply(&self, hooks: &mut CompilerHooks) -> BuildResult<()> {
    hooks.compilation.tap(self.name(), Arc::new(compilation));
    Ok(())
  }
}

fn compilation(compilation: &mut Compilation) -> BuildResult<()> {
  let hooks = &mut compilation.hooks;
  hooks.exports_definitions.tap("ModernModuleLibraryPlugin", Arc::new(exports_definitions));
  hooks.optimize_chunk_modules.tap_with_stage(
    "ModuleConcatenationPlugin",
    STAGE_DEFAULT,
    Arc::new(optimize_chunk_modules),
  );
  hooks.render_startup.tap("ModernModuleLibraryPlugin", Arc::new(render_library_exports));
  Ok(())
}

fn exports_definitions(_: &Compilation) -> Option<bool> {
  Some(true)
}

fn optimize_chunk_modules(compilation: &mut Compilation) -> BoxFuture<'_, BuildResult<()>> {
  Box::pin(async move {
    if !compilation.options.concatenate_modules {
      return Ok(());
    }

    let roots = compilation
      .chunk_graph
      .chunk_table
      .iter()
      .filter(|chunk| chunk.modules.len() == 1)
      .filter_map(|chunk| chunk.modules.first().copied())
      .filter(|module| {
        compilation.modules.contains(module) && compilation.module(*module).as_normal().is_some()
      })
      .collect::<FxIndexSet<_>>();

    for root in roots {
      concatenate(compilation, ConcatConfiguration::new(root, RuntimeSpec::default())).await?;
    }
    Ok(())
  })
}
