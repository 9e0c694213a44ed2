use anyhow::Context;
use esmpack_common::{
  ConcatenatedModule, DependencyKind, ModuleGraph, ModuleIdx, ModuleTable, NormalModule,
};
use esmpack_error::ModuleBuildError;
use esmpack_utils::{indexmap::FxIndexMap, rstr::Rstr};
use futures::future::BoxFuture;
use rustc_hash::FxHashMap;

use super::renamer::Renamer;

/// What a module builder may read while the concatenated module is being built.
#[derive(Clone, Copy)]
pub struct BuildContext<'a> {
  pub module_table: &'a ModuleTable,
  pub module_graph: &'a ModuleGraph,
  /// Answer of the `exports_definitions` hook. Final export names are only computed when set.
  pub exports_definitions: bool,
}

/// Builds a freshly created concatenated module. This is the only point where concatenation
/// waits on something else.
pub trait ModuleBuilder: Send + Sync {
  fn build<'a>(
    &'a self,
    module: &'a mut ConcatenatedModule,
    ctx: BuildContext<'a>,
  ) -> BoxFuture<'a, anyhow::Result<()>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ConcatenatedModuleBuilder;

impl ModuleBuilder for ConcatenatedModuleBuilder {
  fn build<'a>(
    &'a self,
    module: &'a mut ConcatenatedModule,
    ctx: BuildContext<'a>,
  ) -> BoxFuture<'a, anyhow::Result<()>> {
    Box::pin(async move { build_concatenated_module(module, ctx) })
  }
}

fn build_concatenated_module(
  module: &mut ConcatenatedModule,
  ctx: BuildContext<'_>,
) -> anyhow::Result<()> {
  let members = module
    .modules
    .iter()
    .map(|idx| {
      let member = &ctx.module_table[*idx];
      member.as_normal().ok_or_else(|| {
        ModuleBuildError {
          module: Some(member.identifier().into_owned()),
          source: anyhow::anyhow!("only normal modules can be concatenated"),
        }
        .into()
      })
    })
    .collect::<anyhow::Result<Vec<&NormalModule>>>()?;

  for member in &members {
    for dependency_idx in &member.dependencies {
      let dependency = ctx.module_graph.dependency(*dependency_idx);
      let is_internal = dependency.is_harmony_import()
        && ctx.module_graph.get_module(*dependency_idx).is_some_and(|m| module.contains(m));
      // Only the root's own export clause stays part of the module's surface.
      let is_inner_export = member.idx != module.root
        && matches!(dependency.kind, DependencyKind::ExportSpecifier { .. });
      if is_internal {
        module.inlined_dependencies.insert(*dependency_idx);
      } else if !is_inner_export {
        module.dependencies.push(*dependency_idx);
      }
    }
    module.blocks.extend(member.blocks.iter().cloned());

    module.build_meta.flags |= member.build_meta.flags;
    let info = &mut module.build_info;
    info.top_level_declarations.extend(member.build_info.top_level_declarations.iter().cloned());
    info.reexported_externals.extend(member.build_info.reexported_externals.iter().cloned());
  }

  if ctx.exports_definitions {
    let final_names = compute_exports_final_name(module, &members, ctx)?;
    module.build_meta.exports_final_name = Some(final_names);
  }

  module.built = true;
  Ok(())
}

/// Maps every used export of the root to the top level name it has after the members' scopes
/// were merged.
fn compute_exports_final_name(
  module: &ConcatenatedModule,
  members: &[&NormalModule],
  ctx: BuildContext<'_>,
) -> anyhow::Result<FxIndexMap<Rstr, Rstr>> {
  let mut renamer = Renamer::new();
  let mut canonical_names = FxHashMap::<(ModuleIdx, Rstr), Rstr>::default();
  // The root's body is emitted as written, so its declarations keep their names.
  let (roots, others): (Vec<&NormalModule>, Vec<&NormalModule>) =
    members.iter().copied().partition(|member| member.idx == module.root);
  for member in roots {
    for name in &member.build_info.top_level_declarations {
      canonical_names.insert((member.idx, name.clone()), renamer.claim(name));
    }
  }
  for member in others {
    for name in &member.build_info.top_level_declarations {
      let canonical = renamer.create_conflictless_name(name);
      canonical_names.insert((member.idx, name.clone()), canonical);
    }
  }

  let root = &ctx.module_table[module.root];
  let local_of = |exported: &Rstr| {
    root.dependencies().iter().find_map(|idx| match &ctx.module_graph.dependency(*idx).kind {
      DependencyKind::ExportSpecifier { local, exported: e } if e == exported => Some(local.clone()),
      _ => None,
    })
  };

  let mut final_names = FxIndexMap::default();
  let Some(exports_info) = ctx.module_graph.exports_info(module.root) else {
    return Ok(final_names);
  };
  for export_info in exports_info.ordered_exports() {
    if export_info.provided.is_not_provided() {
      continue;
    }
    let name = export_info.name();
    let Some(used_name) = export_info.get_used_name(name, &module.runtime) else {
      continue;
    };
    if export_info.is_reexport() {
      final_names.insert(used_name.clone(), used_name);
      continue;
    }
    let local = local_of(name).unwrap_or_else(|| name.clone());
    let final_name = canonical_names.get(&(module.root, local.clone())).with_context(|| {
      format!("export {name:?} refers to {local:?}, which {} doesn't declare", root.identifier())
    })?;
    final_names.insert(used_name, final_name.clone());
  }
  Ok(final_names)
}

#[cfg(test)]
mod tests {
  use esmpack_common::{
    ConcatenatedModule, Dependency, DependencyKind, ModuleGraph, ModuleId, ModuleTable,
    NormalModule, RuntimeSpec,
  };
  use esmpack_utils::{indexmap::FxIndexSet, rstr::Rstr};
  use oxc::span::Span;

  use super::{build_concatenated_module, BuildContext};

  fn normal(table: &mut ModuleTable, id: &str, declarations: &[&str]) -> esmpack_common::ModuleIdx {
    let idx = table.next_idx();
    let mut module = NormalModule::new(idx, ModuleId::new(id), "".into());
    module.build_info.top_level_declarations = declarations.iter().map(|d| Rstr::new(d)).collect();
    table.push(module)
  }

  #[test]
  fn drops_internal_edges_and_renames_members() {
    let mut table = ModuleTable::default();
    let mut graph = ModuleGraph::default();
    let root = normal(&mut table, "./index.js", &["value"]);
    let inner = normal(&mut table, "./inner.js", &["value"]);

    let import =
      graph.add_dependency(Dependency::new("./inner.js", Span::new(0, 10), DependencyKind::Import));
    let export = graph.add_dependency(Dependency::new(
      "",
      Span::new(10, 20),
      DependencyKind::ExportSpecifier { local: "value".into(), exported: "x".into() },
    ));
    let inner_export = graph.add_dependency(Dependency::new(
      "",
      Span::new(0, 5),
      DependencyKind::ExportSpecifier { local: "value".into(), exported: "value".into() },
    ));
    table[root].dependencies_mut().extend([import, export]);
    table[inner].dependencies_mut().push(inner_export);
    graph.set_resolved_module(root, import, inner);
    graph.exports_info_mut(root).provide("x");

    let mut module = ConcatenatedModule::create(
      table.next_idx(),
      &ModuleId::new("./index.js"),
      root,
      FxIndexSet::from_iter([root, inner]),
      RuntimeSpec::default(),
    );
    let ctx = BuildContext { module_table: &table, module_graph: &graph, exports_definitions: true };
    build_concatenated_module(&mut module, ctx).unwrap();

    assert!(module.built);
    assert_eq!(module.dependencies, [export]);
    assert!(module.is_inlined(import));
    let final_names = module.build_meta.exports_final_name.unwrap();
    assert_eq!(final_names.get("x").map(Rstr::as_str), Some("value"));
    assert!(module.build_info.top_level_declarations.contains("value"));
  }

  #[test]
  fn rejects_external_members() {
    let mut table = ModuleTable::default();
    let graph = ModuleGraph::default();
    let root = normal(&mut table, "./index.js", &[]);
    let external = table.push(esmpack_common::ExternalModule::new(
      table.next_idx(),
      "ext".into(),
      "ext".into(),
      esmpack_common::ExternalType::Module,
    ));
    let mut module = ConcatenatedModule::create(
      table.next_idx(),
      &ModuleId::new("./index.js"),
      root,
      FxIndexSet::from_iter([root, external]),
      RuntimeSpec::default(),
    );
    let ctx = BuildContext { module_table: &table, module_graph: &graph, exports_definitions: false };
    let error = build_concatenated_module(&mut module, ctx).unwrap_err();
    assert!(error.downcast_ref::<esmpack_error::ModuleBuildError>().is_some());
    assert!(!module.built);
  }
}
