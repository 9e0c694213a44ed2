use std::sync::Arc;

use esmpack_common::{normalize_options, CompilerOptions, LibraryType};
use esmpack_error::BuildResult;

use crate::{
  utils::chunk::render_chunk::render_chunk, Compilation, CompilerHooks, CompileOutput,
  ExternalsPlugin, ModernModuleLibraryPlugin, ModuleBuilder, ModuleLibraryPlugin, Plugin,
  SharedOptions,
};

/// Entry point: owns the options and the taps plugins registered, and drives compilations.
pub struct Compiler {
  pub options: SharedOptions,
  pub hooks: CompilerHooks,
  module_builder: Option<Arc<dyn ModuleBuilder>>,
}

impl Compiler {
  /// Normalizes `options` and applies the built-in plugins they ask for, then `plugins` in order.
  pub fn new(options: CompilerOptions, plugins: Vec<Box<dyn Plugin>>) -> BuildResult<Self> {
    esmpack_tracing::init();
    let options: SharedOptions = Arc::new(normalize_options(options));

    let mut builtin_plugins: Vec<Box<dyn Plugin>> = vec![];
    if let Some(library) = &options.library {
      match library.library_type {
        LibraryType::Module => builtin_plugins.push(Box::new(ModuleLibraryPlugin::new(library)?)),
        LibraryType::ModernModule => {
          builtin_plugins.push(Box::new(ModernModuleLibraryPlugin::new(library)?));
        }
      }
    }
    if !options.externals.is_empty() {
      builtin_plugins.push(Box::new(ExternalsPlugin));
    }

    let mut hooks = CompilerHooks::default();
    for plugin in builtin_plugins.iter().chain(&plugins) {
      tracing::trace!("Applying plugin {}", plugin.name());
      plugin.apply(&mut hooks)?;
    }

    Ok(Self { options, hooks, module_builder: None })
  }

  /// Replaces the builder used for concatenated modules.
  #[must_use]
  pub fn with_module_builder(mut self, module_builder: Arc<dyn ModuleBuilder>) -> Self {
    self.module_builder = Some(module_builder);
    self
  }

  /// Runs one compilation. `setup` populates the module graph and the chunks; everything after
  /// that is driven by the hooks.
  #[tracing::instrument(level = "debug", skip_all)]
  pub async fn compile(
    &self,
    setup: impl FnOnce(&mut Compilation) -> BuildResult<()>,
  ) -> BuildResult<CompileOutput> {
    let mut compilation = Compilation::new(Arc::clone(&self.options));
    if let Some(module_builder) = &self.module_builder {
      compilation.module_builder = Arc::clone(module_builder);
    }
    for callback in self.hooks.compilation.callbacks() {
      callback(&mut compilation)?;
    }

    setup(&mut compilation)?;

    compilation.call_finish_modules()?;
    compilation.call_optimize_chunk_modules().await?;

    let chunks = compilation
      .chunk_graph
      .chunk_table
      .indices()
      .map(|chunk| render_chunk(&compilation, chunk))
      .collect::<BuildResult<Vec<_>>>()?;

    Ok(CompileOutput { chunks, compilation })
  }
}
