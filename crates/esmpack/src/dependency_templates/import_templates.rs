use esmpack_common::Dependency;
use string_wizard::MagicString;

use super::{DependencyTemplate, TemplateContext};

/// Leaves the dependency's source text untouched.
pub struct NoopTemplate;

impl DependencyTemplate for NoopTemplate {
  fn apply(&self, _: &Dependency, _: &mut MagicString<'_>, _: &TemplateContext<'_>) {}
}

/// Drops `import` statements of modules inlined into the same concatenated module.
pub struct ImportTemplate;

impl DependencyTemplate for ImportTemplate {
  fn apply(&self, dependency: &Dependency, source: &mut MagicString<'_>, ctx: &TemplateContext<'_>) {
    if ctx.is_inlined() {
      super::remove_range(source, dependency.range);
    }
  }
}
