mod compilation;
mod compiler;
mod dependency_templates;
mod hooks;
mod plugins;
mod stages;
mod types;
mod utils;

pub use crate::{
  compilation::Compilation,
  compiler::Compiler,
  dependency_templates::{DependencyTemplate, DependencyTemplates, TemplateContext},
  hooks::{
    CompilationFn, CompilationHooks, CompilerHooks, ExportsDefinitionsFn, FinishModulesFn, Hook,
    OptimizeChunkModulesFn, RenderStartupContext, RenderStartupFn, Tap, STAGE_DEFAULT,
  },
  plugins::{
    externals_plugin::ExternalsPlugin,
    library::{
      modern_module_library_plugin::ModernModuleLibraryPlugin,
      module_library_plugin::ModuleLibraryPlugin, parse_library_options,
    },
    Plugin,
  },
  stages::{
    concatenate::{
      concatenate,
      module_builder::{BuildContext, ConcatenatedModuleBuilder, ModuleBuilder},
      ConcatConfiguration,
    },
    rewrite_externals::{rewrite_external_references, RewriteExternalsStats},
  },
  types::{compile_output::CompileOutput, rendered_chunk::RenderedChunk, SharedOptions},
  utils::{
    chunk::render_chunk_exports::{render_exports, RenderedExports},
    render_module::render_module,
  },
};
pub use esmpack_common::*;
pub use esmpack_error::{BuildError, BuildResult, ConfigError, ModuleBuildError};
