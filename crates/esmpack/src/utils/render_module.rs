use esmpack_common::{ConcatenatedModule, Module, ModuleIdx, NormalModule, SourceJoiner};
use esmpack_error::BuildResult;
use esmpack_utils::concat_string;
use string_wizard::MagicString;

use crate::{dependency_templates::remove_range, Compilation, TemplateContext};

/// Renders the body of `module` with every registered dependency template applied. Externals
/// have no body.
pub fn render_module(compilation: &Compilation, module: ModuleIdx) -> BuildResult<String> {
  match compilation.module(module) {
    Module::Normal(normal) => Ok(render_normal_module(compilation, normal, None)),
    Module::External(_) => Ok(String::new()),
    Module::Concatenated(concatenated) => {
      let mut joiner = SourceJoiner::default();
      for member in &concatenated.modules {
        let Some(normal) = compilation.module(*member).as_normal() else {
          return Err(
            anyhow::anyhow!(
              "Module {} can't be rendered as part of {}",
              compilation.module(*member).identifier(),
              concatenated.id
            )
            .into(),
          );
        };
        joiner.append_source(render_normal_module(compilation, normal, Some(concatenated)));
      }
      Ok(joiner.join())
    }
  }
}

fn render_normal_module(
  compilation: &Compilation,
  module: &NormalModule,
  concatenation_scope: Option<&ConcatenatedModule>,
) -> String {
  let mut source = MagicString::new(module.source.as_str());

  for dependency_idx in compilation.module(module.idx).all_dependencies() {
    let dependency = compilation.module_graph.dependency(dependency_idx);
    let Some(template) = compilation.dependency_templates.get(dependency.dependency_type()) else {
      continue;
    };
    let ctx = TemplateContext {
      compilation,
      module: module.idx,
      dependency: dependency_idx,
      concatenation_scope,
    };
    template.apply(dependency, &mut source, &ctx);
  }

  for reexport in &module.build_info.reexported_externals {
    remove_range(&mut source, reexport.range);
  }

  let code = source.to_string();
  let code = code.trim_start_matches(['\n', '\r']).trim_end();
  if code.is_empty() {
    return String::new();
  }
  concat_string!("//#region ", module.id, "\n", code, "\n//#endregion")
}
