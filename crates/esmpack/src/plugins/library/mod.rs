pub mod modern_module_library_plugin;
pub mod module_library_plugin;

use esmpack_common::{LibraryName, LibraryOptions};
use esmpack_error::{BuildResult, ConfigError};

use crate::{hooks::RenderStartupContext, render_exports, Compilation};

/// ES module output has no global to assign the library to, so a `name` is a mistake.
pub fn parse_library_options(options: &LibraryOptions) -> Result<(), ConfigError> {
  if options.name.as_ref().is_some_and(LibraryName::is_set) {
    return Err(ConfigError::LibraryNameMustBeUnset);
  }
  Ok(())
}

/// Appends the export clause of the chunk's entry module.
fn render_library_exports(
  compilation: &Compilation,
  ctx: &RenderStartupContext,
  source: &mut String,
) -> BuildResult<()> {
  let module = compilation.module(ctx.module);
  let runtime = &compilation.chunk_graph.chunk(ctx.chunk).runtime;
  let final_names = module.build_meta().exports_final_name.as_ref();
  if let Some(exports) = render_exports(compilation, ctx.module, final_names, runtime).to_source() {
    if !source.is_empty() && !source.ends_with('\n') {
      source.push('\n');
    }
    source.push_str(&exports);
    source.push('\n');
  }
  Ok(())
}
