use esmpack_common::{
  Dependency, DependencyIdx, DependencyKind, ExternalModule, ModuleIdx, ReexportedExternal,
};
use esmpack_error::BuildResult;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::Compilation;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteExternalsStats {
  pub pruned_star_exports: usize,
  pub removed_markers: usize,
  pub rewritten_imports: usize,
}

/// Points every reference to an external module at its external request once all modules are
/// built.
///
/// - `export * from '<external>'` can't be expanded, so the dependency is dropped together with
///   the zero-width header markers inside its statement. The statement is re-emitted at startup
///   from `BuildInfo::reexported_externals`.
/// - `import('<external>')` becomes an external import dependency that renders as
///   `import("<request>")` and has no connection of its own.
///
/// Modules and dependencies are visited in their stored order. Running the pass again changes
/// nothing, since neither kind of dependency it produces is a rewrite target.
#[tracing::instrument(level = "debug", skip_all)]
pub fn rewrite_external_references(
  compilation: &mut Compilation,
) -> BuildResult<RewriteExternalsStats> {
  let mut stats = RewriteExternalsStats::default();
  let modules = compilation.modules.iter().copied().collect::<Vec<_>>();

  for module in &modules {
    prune_external_star_exports(compilation, *module, &mut stats);
  }
  for module in &modules {
    rewrite_external_dynamic_imports(compilation, *module, &mut stats);
  }

  tracing::debug!(
    "Pruned {} star exports and {} markers, rewrote {} imports of externals",
    stats.pruned_star_exports,
    stats.removed_markers,
    stats.rewritten_imports
  );
  Ok(stats)
}

/// The external module `dependency` refers to. Falls back to matching the request against the
/// requests importers wrote, for dependencies that were never connected.
fn external_target<'a>(
  compilation: &'a Compilation,
  dependency_idx: DependencyIdx,
  dependency: &Dependency,
) -> Option<&'a ExternalModule> {
  match compilation.module_graph.get_module(dependency_idx) {
    Some(module) => compilation.module(module).as_external(),
    None => compilation
      .module_table
      .externals()
      .filter_map(|module| module.as_external())
      .find(|external| external.user_request == dependency.request),
  }
}

fn prune_external_star_exports(
  compilation: &mut Compilation,
  module: ModuleIdx,
  stats: &mut RewriteExternalsStats,
) {
  let dependencies = compilation.module(module).dependencies().to_vec();
  let mut reexports = vec![];
  for dependency_idx in &dependencies {
    let dependency = compilation.module_graph.dependency(*dependency_idx);
    if !dependency.is_export_star() {
      continue;
    }
    if let Some(external) = external_target(compilation, *dependency_idx, dependency) {
      reexports.push((
        *dependency_idx,
        ReexportedExternal { request: external.request.clone(), range: dependency.range },
      ));
    }
  }
  if reexports.is_empty() {
    return;
  }

  let mut removed = reexports.iter().map(|(idx, _)| *idx).collect::<FxHashSet<_>>();
  for dependency_idx in &dependencies {
    let dependency = compilation.module_graph.dependency(*dependency_idx);
    if !matches!(dependency.kind, DependencyKind::ExportHeaderMarker) {
      continue;
    }
    let position = dependency.range.start;
    let is_orphaned = reexports
      .iter()
      .any(|(_, reexport)| reexport.range.start <= position && position <= reexport.range.end);
    if is_orphaned && removed.insert(*dependency_idx) {
      stats.removed_markers += 1;
    }
  }

  let module_mut = &mut compilation.module_table[module];
  module_mut.dependencies_mut().retain(|idx| !removed.contains(idx));
  for (dependency_idx, reexport) in reexports {
    tracing::trace!(
      "Pruned `export * from {:?}` of {}",
      reexport.request,
      module_mut.identifier()
    );
    module_mut.build_info_mut().reexported_externals.push(reexport);
    compilation.module_graph.remove_connection(dependency_idx);
    stats.pruned_star_exports += 1;
  }
}

fn rewrite_external_dynamic_imports(
  compilation: &mut Compilation,
  module: ModuleIdx,
  stats: &mut RewriteExternalsStats,
) {
  let mut rewrites = vec![];
  for dependency_idx in compilation.module(module).all_dependencies() {
    let dependency = compilation.module_graph.dependency(dependency_idx);
    if !dependency.is_dynamic_import() {
      continue;
    }
    if let Some(external) = external_target(compilation, dependency_idx, dependency) {
      tracing::trace!("Rewrote import({:?}) to import({:?})", dependency.request, external.request);
      let replacement = Dependency::external_import(
        dependency.request.clone(),
        external.request.clone(),
        dependency.range,
      );
      rewrites.push((dependency_idx, replacement));
    }
  }
  if rewrites.is_empty() {
    return;
  }

  let mut replacements = FxHashMap::default();
  for (dependency_idx, replacement) in rewrites {
    let new_idx = compilation.module_graph.add_dependency(replacement);
    compilation.module_graph.remove_connection(dependency_idx);
    replacements.insert(dependency_idx, new_idx);
    stats.rewritten_imports += 1;
  }

  let replace = |dependencies: &mut Vec<DependencyIdx>| {
    for dependency in dependencies.iter_mut() {
      if let Some(new_idx) = replacements.get(dependency) {
        *dependency = *new_idx;
      }
    }
  };
  let module = &mut compilation.module_table[module];
  replace(module.dependencies_mut());
  if let Some(blocks) = module.blocks_mut() {
    for block in blocks {
      block.for_each_block_mut(&mut |block| replace(&mut block.dependencies));
    }
  }
}

#[cfg(test)]
mod tests {
  use esmpack_common::{
    normalize_options, CompilerOptions, Dependency, DependencyKind, DependencyType, ExternalType,
    ReexportedExternal,
  };
  use oxc::span::Span;

  use super::{rewrite_external_references, RewriteExternalsStats};
  use crate::Compilation;

  fn compilation() -> Compilation {
    Compilation::new(normalize_options(CompilerOptions::default()).into())
  }

  fn dynamic_import(request: &str, range: Span) -> Dependency {
    Dependency::new(request, range, DependencyKind::DynamicImport)
  }

  #[test]
  fn prunes_star_export_of_external_and_its_marker() {
    let mut compilation = compilation();
    let index =
      compilation.add_normal_module("./index.js", "export * from 'ext';\nexport const a = 1;\n");
    let local = compilation.add_normal_module("./local.js", "");
    let external = compilation.add_external_module("ext", "ext-request", ExternalType::Module);

    let marker = compilation.add_dependency(
      index,
      Dependency::new("", Span::new(0, 0), DependencyKind::ExportHeaderMarker),
    );
    let star = compilation
      .add_dependency(index, Dependency::new("ext", Span::new(0, 20), DependencyKind::ExportStar));
    let local_star = compilation.add_dependency(
      index,
      Dependency::new("./local.js", Span::new(21, 21), DependencyKind::ExportStar),
    );
    compilation.connect(index, star, external);
    compilation.connect(index, local_star, local);

    let stats = rewrite_external_references(&mut compilation).unwrap();
    assert_eq!(
      stats,
      RewriteExternalsStats { pruned_star_exports: 1, removed_markers: 1, rewritten_imports: 0 }
    );
    assert_eq!(compilation.module(index).dependencies(), [local_star]);
    assert!(compilation.module_graph.get_module(star).is_none());
    assert_eq!(compilation.module_graph.get_module(local_star), Some(local));
    assert_eq!(
      compilation.module(index).build_info().reexported_externals,
      [ReexportedExternal { request: "ext-request".into(), range: Span::new(0, 20) }]
    );
    assert!(!compilation.module(index).dependencies().contains(&marker));
  }

  #[test]
  fn rewrites_dynamic_import_in_blocks() {
    let mut compilation = compilation();
    let index =
      compilation.add_normal_module("./index.js", "import('ext');\nimport('./lazy.js');\n");
    let lazy = compilation.add_normal_module("./lazy.js", "");
    let external = compilation.add_external_module("ext", "ext-request", ExternalType::Import);
    let to_external = compilation
      .add_dynamic_import(index, dynamic_import("ext", Span::new(0, 13)))
      .unwrap();
    let to_lazy = compilation
      .add_dynamic_import(index, dynamic_import("./lazy.js", Span::new(15, 34)))
      .unwrap();
    compilation.connect(index, to_external, external);
    compilation.connect(index, to_lazy, lazy);

    let stats = rewrite_external_references(&mut compilation).unwrap();
    assert_eq!(stats.rewritten_imports, 1);

    let rewritten = compilation.module(index).blocks()[0].dependencies[0];
    assert_ne!(rewritten, to_external);
    assert_eq!(
      compilation.module_graph.dependency(rewritten).kind,
      DependencyKind::ExternalImport { target_request: "ext-request".into() }
    );
    assert_eq!(compilation.module_graph.dependency(rewritten).range, Span::new(0, 13));
    assert!(compilation.module_graph.get_module(rewritten).is_none());
    assert!(compilation.module_graph.get_module(to_external).is_none());
    assert_eq!(compilation.module(index).blocks()[1].dependencies, [to_lazy]);
  }

  #[test]
  fn unconnected_dynamic_import_falls_back_to_user_request() {
    let mut compilation = compilation();
    let index = compilation.add_normal_module("./index.js", "import('ext');");
    compilation.add_external_module("ext", "ext-request", ExternalType::Import);
    compilation.add_dynamic_import(index, dynamic_import("ext", Span::new(0, 13))).unwrap();
    compilation.add_dynamic_import(index, dynamic_import("missing", Span::new(0, 0))).unwrap();

    let stats = rewrite_external_references(&mut compilation).unwrap();
    assert_eq!(stats.rewritten_imports, 1);
    let kinds = compilation
      .module(index)
      .all_dependencies()
      .into_iter()
      .map(|idx| compilation.module_graph.dependency(idx).dependency_type())
      .collect::<Vec<_>>();
    assert_eq!(kinds, [DependencyType::ExternalImport, DependencyType::DynamicImport]);
  }
}
