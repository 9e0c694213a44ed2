use std::sync::Arc;

use esmpack_common::DependencyType;
use esmpack_error::BuildResult;

use crate::{
  dependency_templates::ExternalImportTemplate, rewrite_external_references, Compilation,
  CompilerHooks, Plugin,
};

/// Keeps requests listed in the `externals` option out of the bundle. Once every module is built,
/// references to them are pointed at their external requests.
#[derive(Debug, Default)]
pub struct ExternalsPlugin;

impl Plugin for ExternalsPlugin {
  fn apply(&self, hooks: &mut CompilerHooks) -> BuildResult<()> {
    hooks.compilation.tap(self.name(), Arc::new(compilation));
    Ok(())
  }
}

fn compilation(compilation: &mut Compilation) -> BuildResult<()> {
  compilation.dependency_templates.set(DependencyType::ExternalImport, ExternalImportTemplate);
  compilation.hooks.finish_modules.tap("ExternalsPlugin", Arc::new(finish_modules));
  Ok(())
}

fn finish_modules(compilation: &mut Compilation) -> BuildResult<()> {
  rewrite_external_references(compilation)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use esmpack_common::{normalize_options, CompilerOptions, DependencyType};

  use super::ExternalsPlugin;
  use crate::{Compilation, CompilerHooks, Plugin};

  #[test]
  fn registers_template_and_finish_modules() {
    let mut hooks = CompilerHooks::default();
    ExternalsPlugin.apply(&mut hooks).unwrap();
    assert_eq!(hooks.compilation.tap_names().collect::<Vec<_>>(), ["ExternalsPlugin"]);

    let mut compilation = Compilation::new(normalize_options(CompilerOptions::default()).into());
    assert!(!compilation.dependency_templates.has(DependencyType::ExternalImport));
    for callback in hooks.compilation.callbacks() {
      callback(&mut compilation).unwrap();
    }
    assert!(compilation.dependency_templates.has(DependencyType::ExternalImport));
    assert!(compilation.hooks.finish_modules.is_used());
  }
}
