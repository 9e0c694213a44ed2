use std::sync::Arc;

use esmpack_common::LibraryOptions;
use esmpack_error::{BuildResult, ConfigError};

use super::{parse_library_options, render_library_exports};
use crate::{Compilation, CompilerHooks, Plugin};

/// Renders entry chunks as ES modules that export the entry module's exports.
#[derive(Debug)]
pub struct ModuleLibraryPlugin;

impl ModuleLibraryPlugin {
  pub fn new(options: &LibraryOptions) -> Result<Self, ConfigError> {
    parse_library_options(options)?;
    Ok(Self)
  }
}

impl Plugin for ModuleLibraryPlugin {
  fn apply(&self, hooks: &mut CompilerHooks) -> BuildResult<()> {
    hooks.compilation.tap(self.name(), Arc::new(compilation));
    Ok(())
  }
}

fn compilation(compilation: &mut Compilation) -> BuildResult<()> {
  let hooks = &mut compilation.hooks;
  hooks.exports_definitions.tap("ModuleLibraryPlugin", Arc::new(exports_definitions));
  hooks.render_startup.tap("ModuleLibraryPlugin", Arc::new(render_library_exports));
  Ok(())
}

fn exports_definitions(compilation: &Compilation) -> Option<bool> {
  // Final names can't be shared across chunks yet.
  if compilation.options.split_chunks {
    return None;
  }
  Some(true)
}

#[cfg(test)]
mod tests {
  use esmpack_common::{normalize_options, CompilerOptions, OptimizationOptions};

  use super::exports_definitions;
  use crate::Compilation;

  #[test]
  fn split_chunks_disables_final_names() {
    let compilation = Compilation::new(normalize_options(CompilerOptions::default()).into());
    assert_eq!(exports_definitions(&compilation), Some(true));

    let options = CompilerOptions {
      optimization: Some(OptimizationOptions { split_chunks: Some(true), ..Default::default() }),
      ..Default::default()
    };
    let compilation = Compilation::new(normalize_options(options).into());
    assert_eq!(exports_definitions(&compilation), None);
  }
}
