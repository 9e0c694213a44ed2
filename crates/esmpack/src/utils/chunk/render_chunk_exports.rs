use std::borrow::Cow;

use esmpack_common::{DependencyKind, ExportInfo, Module, ModuleIdx, RuntimeSpec};
use esmpack_utils::{
  concat_string,
  ecmascript::{property_access_str, to_identifier, to_module_import_export_name, to_string_literal},
  indexmap::{FxIndexMap, FxIndexSet},
  rstr::Rstr,
};
use itertools::Itertools;
use rustc_hash::FxHashSet;

use crate::Compilation;

/// Name of the runtime binding that holds the exports object of the entry module.
const EXPORTS_BINDING: &str = "exports";

/// The export surface of an entry module.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RenderedExports {
  /// Statements that bind the locals the export clause refers to, in emission order.
  pub aliases: Vec<String>,
  /// `(local, exported)` pairs of the export clause, in `orderedExports` order.
  pub specifiers: Vec<(Rstr, Rstr)>,
  /// Requests re-exported wholesale with `export * from`.
  pub star_reexports: Vec<Rstr>,
}

impl RenderedExports {
  pub fn is_empty(&self) -> bool {
    self.specifiers.is_empty() && self.star_reexports.is_empty()
  }

  /// Alias lines, a blank line, then a single export clause followed by the star re-exports.
  /// `None` when there is nothing to export, so not even `export {}` is emitted.
  pub fn to_source(&self) -> Option<String> {
    if self.is_empty() {
      return None;
    }

    let mut s = String::new();
    if !self.specifiers.is_empty() {
      for alias in &self.aliases {
        s.push_str(alias);
        s.push('\n');
      }
      if !self.aliases.is_empty() {
        s.push('\n');
      }
      let rendered_items = self
        .specifiers
        .iter()
        .map(|(local, exported)| {
          if local == exported {
            Cow::Borrowed(local.as_str())
          } else {
            Cow::Owned(concat_string!(local, " as ", to_module_import_export_name(exported)))
          }
        })
        .join(", ");
      s.push_str(&concat_string!("export { ", rendered_items, " };"));
    }

    for request in &self.star_reexports {
      if !s.is_empty() {
        s.push('\n');
      }
      s.push_str(&concat_string!("export * from ", to_string_literal(request), ";"));
    }
    Some(s)
  }
}

/// Computes the export surface of `module` for `runtime`.
///
/// With `final_names`, every emitted export is looked up there by its used name. A missing entry
/// is a broken invariant of the module that produced the map and panics.
pub fn render_exports(
  compilation: &Compilation,
  module: ModuleIdx,
  final_names: Option<&FxIndexMap<Rstr, Rstr>>,
  runtime: &RuntimeSpec,
) -> RenderedExports {
  let mut rendered = RenderedExports::default();
  let module_ref = compilation.module(module);

  match final_names {
    Some(final_names) => {
      let mut aliases = AliasNames::new(final_names.values());
      for export_info in emittable_exports(compilation, module) {
        let name = export_info.name();
        let Some(used_name) = export_info.get_used_name(name, runtime) else {
          continue;
        };
        let final_name = &final_names[&used_name];
        if export_info.is_reexport() {
          let alias = aliases.create(name);
          rendered.aliases.push(concat_string!(
            "var ",
            alias,
            " = ",
            property_access_str(EXPORTS_BINDING, final_name),
            ";"
          ));
          rendered.specifiers.push((alias, name.clone()));
        } else {
          rendered.specifiers.push((final_name.clone(), name.clone()));
        }
      }
    }
    None => {
      let is_async = compilation.module_graph.is_async(module);
      let specifiers = export_specifiers(compilation, module_ref);
      if is_async || specifiers.is_empty() {
        if is_async {
          // The exports object is a promise until the module finished evaluating.
          rendered.aliases.push(concat_string!(EXPORTS_BINDING, " = await ", EXPORTS_BINDING, ";"));
        }
        let mut aliases = AliasNames::new(std::iter::empty());
        for export_info in emittable_exports(compilation, module) {
          let name = export_info.name();
          let Some(used_name) = export_info.get_used_name(name, runtime) else {
            continue;
          };
          let alias = aliases.create(name);
          rendered.aliases.push(concat_string!(
            "var ",
            alias,
            " = ",
            property_access_str(EXPORTS_BINDING, &used_name),
            ";"
          ));
          rendered.specifiers.push((alias, name.clone()));
        }
      } else {
        rendered.specifiers = specifiers;
      }
    }
  }

  let mut seen = FxHashSet::default();
  rendered.star_reexports = module_ref
    .build_info()
    .reexported_externals
    .iter()
    .filter(|reexport| seen.insert(reexport.request.clone()))
    .map(|reexport| reexport.request.clone())
    .collect();

  rendered
}

/// Exports known to be provided, minus re-exports whose chain ends at something that isn't.
fn emittable_exports(compilation: &Compilation, module: ModuleIdx) -> Vec<&ExportInfo> {
  let Some(exports_info) = compilation.module_graph.exports_info(module) else {
    return vec![];
  };
  exports_info
    .ordered_exports()
    .filter(|export_info| export_info.provided.is_provided())
    .filter(|export_info| {
      !export_info.is_reexport()
        || compilation
          .module_graph
          .resolve_reexport(&compilation.module_table, module, export_info.name())
          .is_emittable()
    })
    .collect()
}

/// `(local, exported)` pairs of the module's own `export { local as exported }` statements.
fn export_specifiers(compilation: &Compilation, module: &Module) -> Vec<(Rstr, Rstr)> {
  module
    .dependencies()
    .iter()
    .filter_map(|idx| match &compilation.module_graph.dependency(*idx).kind {
      DependencyKind::ExportSpecifier { local, exported } => Some((local.clone(), exported.clone())),
      _ => None,
    })
    .collect()
}

/// Hands out `exports_<name>` bindings that don't collide with each other or with `taken`.
struct AliasNames {
  used: FxIndexSet<Rstr>,
}

impl AliasNames {
  fn new<'a>(taken: impl Iterator<Item = &'a Rstr>) -> Self {
    Self { used: taken.cloned().collect() }
  }

  fn create(&mut self, export_name: &str) -> Rstr {
    let base = concat_string!(EXPORTS_BINDING, "_", to_identifier(export_name));
    let mut candidate = Rstr::from(base.as_str());
    let mut count = 0u32;
    while self.used.contains(&candidate) {
      count += 1;
      candidate = Rstr::from(concat_string!(base, "_", itoa::Buffer::new().format(count)));
    }
    self.used.insert(candidate.clone());
    candidate
  }
}
