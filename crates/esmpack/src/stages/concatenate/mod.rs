pub mod module_builder;
mod renamer;

use std::sync::Arc;

use esmpack_common::{ConcatenatedModule, Module, ModuleIdx, RuntimeSpec};
use esmpack_error::{BuildResult, ModuleBuildError};
use esmpack_utils::indexmap::FxIndexSet;

use crate::Compilation;

use self::module_builder::BuildContext;

/// A root module and the modules that get inlined into it.
#[derive(Debug, Clone)]
pub struct ConcatConfiguration {
  pub root: ModuleIdx,
  pub runtime: RuntimeSpec,
  modules: FxIndexSet<ModuleIdx>,
}

impl ConcatConfiguration {
  pub fn new(root: ModuleIdx, runtime: RuntimeSpec) -> Self {
    Self { root, runtime, modules: FxIndexSet::from_iter([root]) }
  }

  pub fn add(&mut self, module: ModuleIdx) {
    self.modules.insert(module);
  }

  /// Every module of the configuration, root first.
  pub fn modules(&self) -> &FxIndexSet<ModuleIdx> {
    &self.modules
  }
}

/// Merges the modules of `config` into one concatenated module that takes the place of the root
/// in both graphs.
///
/// Nothing is mutated until the new module was built. A failed build leaves the compilation as it
/// was and is returned tagged with the concatenated module.
#[tracing::instrument(level = "debug", skip_all, fields(root = ?config.root))]
pub async fn concatenate(
  compilation: &mut Compilation,
  config: ConcatConfiguration,
) -> BuildResult<ModuleIdx> {
  let ConcatConfiguration { root, runtime, modules } = config;
  let root_id = match compilation.module_table.get(root) {
    Some(Module::Normal(normal)) if compilation.modules.contains(&root) => normal.id.clone(),
    Some(module) => {
      return Err(
        anyhow::anyhow!("{} can't be the root of a concatenation", module.identifier()).into(),
      );
    }
    None => return Err(anyhow::anyhow!("Unknown root module {root:?}").into()),
  };

  let runtime = compilation
    .chunk_graph
    .get_module_runtimes(root)
    .into_iter()
    .fold(runtime, |merged, runtime| merged.merge(runtime));

  let idx = compilation.module_table.next_idx();
  let mut new_module = ConcatenatedModule::create(idx, &root_id, root, modules, runtime);

  let builder = Arc::clone(&compilation.module_builder);
  let ctx = BuildContext {
    module_table: &compilation.module_table,
    module_graph: &compilation.module_graph,
    exports_definitions: compilation.call_exports_definitions(),
  };
  builder
    .build(&mut new_module, ctx)
    .await
    .map_err(|error| ModuleBuildError::tag_module_if_missing(error, &new_module.id))?;

  Ok(integrate(compilation, new_module))
}

/// Puts the built module in the place of its root.
fn integrate(compilation: &mut Compilation, new_module: ConcatenatedModule) -> ModuleIdx {
  let root = new_module.root;
  let members = new_module.modules.clone();
  let new_idx = compilation.module_table.push(new_module);

  compilation.module_graph.clone_module_attributes(root, new_idx);
  if members.iter().any(|member| compilation.built_modules.contains(member)) {
    compilation.built_modules.insert(new_idx);
  }

  compilation.modules.shift_remove(&root);
  let root_chunks = compilation.chunk_graph.module_chunks(root).collect::<Vec<_>>();
  for member in members.iter().filter(|member| **member != root) {
    for chunk in &root_chunks {
      compilation.chunk_graph.disconnect_chunk_and_module(*chunk, *member);
    }
  }
  compilation.chunk_graph.replace_module(root, new_idx);
  compilation.chunk_graph.clear_chunk_graph_for_module(root);

  let module_graph = &mut compilation.module_graph;
  let internal = |module: ModuleIdx| members.contains(&module);
  module_graph.move_module_connections(root, new_idx, |connection, dependency| {
    !(dependency.is_harmony_import() && internal(connection.other_end(root)))
  });
  // What's left on the root are the edges inlined away between members.
  module_graph.clear_module_graph_for_module(root);

  compilation.modules.insert(new_idx);
  tracing::debug!(
    "Concatenated {} modules into {}",
    members.len(),
    compilation.module_table[new_idx].identifier()
  );
  new_idx
}

#[cfg(test)]
mod tests {
  use esmpack_common::{ModuleIdx, RuntimeSpec};

  use super::ConcatConfiguration;

  #[test]
  fn root_comes_first() {
    let root = ModuleIdx::from_usize(3);
    let mut config = ConcatConfiguration::new(root, RuntimeSpec::default());
    config.add(ModuleIdx::from_usize(1));
    config.add(root);
    let modules = config.modules().iter().copied().collect::<Vec<_>>();
    assert_eq!(modules, [root, ModuleIdx::from_usize(1)]);
  }
}
