use esmpack_common::{Dependency, DependencyKind};
use esmpack_utils::{concat_string, ecmascript::to_string_literal};
use string_wizard::MagicString;

use super::{DependencyTemplate, TemplateContext};

/// Renders a rewritten `import()` of an external as `import("<target request>")`.
pub struct ExternalImportTemplate;

impl DependencyTemplate for ExternalImportTemplate {
  fn apply(&self, dependency: &Dependency, source: &mut MagicString<'_>, _: &TemplateContext<'_>) {
    let DependencyKind::ExternalImport { target_request } = &dependency.kind else {
      return;
    };
    if dependency.range.is_empty() {
      return;
    }
    let content = concat_string!("import(", to_string_literal(target_request), ")");
    source.update(dependency.range.start as usize, dependency.range.end as usize, content);
  }
}
