use esmpack_common::Dependency;
use string_wizard::MagicString;

use super::{remove_range, DependencyTemplate, TemplateContext};

/// Drops `export { local as exported }` statements. The export clause is rendered again at chunk
/// startup from the module's exports info.
pub struct ExportSpecifierTemplate;

impl DependencyTemplate for ExportSpecifierTemplate {
  fn apply(&self, dependency: &Dependency, source: &mut MagicString<'_>, _: &TemplateContext<'_>) {
    remove_range(source, dependency.range);
  }
}

/// Drops `export ... from` statements whose target is still connected or was inlined. Once the
/// external rewrite pass unlinks a star re-export of an external, its statement is handled through
/// `BuildInfo::reexported_externals` instead.
pub struct ExportStatementTemplate;

impl DependencyTemplate for ExportStatementTemplate {
  fn apply(&self, dependency: &Dependency, source: &mut MagicString<'_>, ctx: &TemplateContext<'_>) {
    if ctx.is_inlined() || ctx.compilation.module_graph.get_module(ctx.dependency).is_some() {
      remove_range(source, dependency.range);
    }
  }
}
