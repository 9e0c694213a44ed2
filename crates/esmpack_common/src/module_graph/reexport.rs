use esmpack_utils::rstr::Rstr;
use rustc_hash::FxHashSet;

use crate::{ExportProvided, ModuleGraph, ModuleIdx, ModuleTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReexportResolution {
  /// The export is declared by the module itself, or the module has no entry for it.
  NotReexport,
  /// The chain ends at `export` of `module`. `export: None` is the namespace object of `module`.
  Resolved { module: ModuleIdx, export: Option<Rstr>, provided: ExportProvided },
  /// The chain loops back onto itself.
  Unresolvable,
}

impl ReexportResolution {
  /// Whether the export may be emitted. Only a definite "not provided" or a loop rules it out.
  pub fn is_emittable(&self) -> bool {
    match self {
      Self::NotReexport => true,
      Self::Resolved { provided, .. } => !provided.is_not_provided(),
      Self::Unresolvable => false,
    }
  }
}

impl ModuleGraph {
  /// Follows the re-export chain of `name` on `module` until it reaches a binding that isn't
  /// forwarded any further.
  ///
  /// Each step asks a single export info for its next hop, so the walk is a loop over one-hop
  /// queries rather than recursion. A `(module, export)` pair seen twice ends the walk as
  /// [`ReexportResolution::Unresolvable`].
  pub fn resolve_reexport(
    &self,
    modules: &ModuleTable,
    module: ModuleIdx,
    name: &str,
  ) -> ReexportResolution {
    let Some(info) = self.exports_info(module).and_then(|exports| exports.export_info(name)) else {
      return ReexportResolution::NotReexport;
    };
    if !info.is_reexport() {
      return ReexportResolution::NotReexport;
    }

    let mut visited = FxHashSet::default();
    visited.insert((module, Rstr::new(name)));
    let mut next = info.target().cloned();

    while let Some(target) = next.take() {
      let Some(export_name) = target.first_export().cloned() else {
        return ReexportResolution::Resolved {
          module: target.module,
          export: None,
          provided: ExportProvided::Provided,
        };
      };
      if !visited.insert((target.module, export_name.clone())) {
        return ReexportResolution::Unresolvable;
      }

      let exports = self.exports_info(target.module);
      match exports.and_then(|exports| exports.export_info(&export_name)) {
        Some(info) if info.is_reexport() => next = info.target().cloned(),
        Some(info) => {
          return ReexportResolution::Resolved {
            module: target.module,
            export: Some(export_name),
            provided: info.provided,
          };
        }
        None => {
          let is_external = modules.get(target.module).is_some_and(|m| m.is_external());
          let provided = if is_external {
            ExportProvided::Unknown
          } else {
            exports.map_or(ExportProvided::NotProvided, |exports| match exports
              .other_exports_provided
            {
              ExportProvided::Unknown => ExportProvided::NotProvided,
              provided => provided,
            })
          };
          return ReexportResolution::Resolved {
            module: target.module,
            export: Some(export_name),
            provided,
          };
        }
      }
    }

    ReexportResolution::NotReexport
  }
}

#[cfg(test)]
mod tests {
  use arcstr::ArcStr;
  use esmpack_utils::rstr::Rstr;

  use super::ReexportResolution;
  use crate::{
    ExportProvided, ExportTarget, ExternalModule, ExternalType, ModuleGraph, ModuleIdx, ModuleTable,
    NormalModule,
  };

  fn table(externals: &[usize], count: usize) -> ModuleTable {
    let mut table = ModuleTable::default();
    for i in 0..count {
      let idx = ModuleIdx::from_usize(i);
      if externals.contains(&i) {
        table.push(ExternalModule::new(idx, Rstr::new("ext"), Rstr::new("ext"), ExternalType::Module));
      } else {
        table.push(NormalModule::new(idx, format!("./{i}.js").as_str().into(), ArcStr::new()));
      }
    }
    table
  }

  fn forward(graph: &mut ModuleGraph, from: usize, name: &str, to: usize, export: &str) {
    graph.exports_info_mut(ModuleIdx::from_usize(from)).provide_reexport(
      name,
      ExportTarget::new(ModuleIdx::from_usize(to), Some(vec![Rstr::new(export)])),
    );
  }

  #[test]
  fn follows_multiple_hops() {
    let modules = table(&[], 3);
    let mut graph = ModuleGraph::default();
    forward(&mut graph, 0, "a", 1, "b");
    forward(&mut graph, 1, "b", 2, "c");
    graph.exports_info_mut(ModuleIdx::from_usize(2)).provide("c");

    assert_eq!(
      graph.resolve_reexport(&modules, ModuleIdx::from_usize(0), "a"),
      ReexportResolution::Resolved {
        module: ModuleIdx::from_usize(2),
        export: Some(Rstr::new("c")),
        provided: ExportProvided::Provided,
      }
    );
    assert_eq!(
      graph.resolve_reexport(&modules, ModuleIdx::from_usize(2), "c"),
      ReexportResolution::NotReexport
    );
  }

  #[test]
  fn cycle_terminates() {
    let modules = table(&[], 2);
    let mut graph = ModuleGraph::default();
    forward(&mut graph, 0, "a", 1, "b");
    forward(&mut graph, 1, "b", 0, "a");

    let resolution = graph.resolve_reexport(&modules, ModuleIdx::from_usize(0), "a");
    assert_eq!(resolution, ReexportResolution::Unresolvable);
    assert!(!resolution.is_emittable());
  }

  #[test]
  fn missing_name_depends_on_externality() {
    let modules = table(&[1], 3);
    let mut graph = ModuleGraph::default();
    forward(&mut graph, 0, "a", 1, "b");
    forward(&mut graph, 0, "c", 2, "d");
    graph.exports_info_mut(ModuleIdx::from_usize(2)).provide("x");

    let external = graph.resolve_reexport(&modules, ModuleIdx::from_usize(0), "a");
    assert!(external.is_emittable());
    let internal = graph.resolve_reexport(&modules, ModuleIdx::from_usize(0), "c");
    assert!(!internal.is_emittable());
  }

  #[test]
  fn not_provided_target_is_suppressed() {
    let modules = table(&[1], 2);
    let mut graph = ModuleGraph::default();
    forward(&mut graph, 0, "a", 1, "b");
    graph.exports_info_mut(ModuleIdx::from_usize(1)).export_info_mut("b").provided =
      ExportProvided::NotProvided;

    assert!(!graph.resolve_reexport(&modules, ModuleIdx::from_usize(0), "a").is_emittable());
  }
}
