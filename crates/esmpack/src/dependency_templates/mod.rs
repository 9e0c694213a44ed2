mod export_templates;
mod external_import_template;
mod import_templates;

use esmpack_common::{ConcatenatedModule, Dependency, DependencyIdx, DependencyType, ModuleIdx};
use oxc::span::Span;
use rustc_hash::FxHashMap;
use string_wizard::MagicString;

use crate::Compilation;

pub use self::{
  export_templates::{ExportSpecifierTemplate, ExportStatementTemplate},
  external_import_template::ExternalImportTemplate,
  import_templates::{ImportTemplate, NoopTemplate},
};

pub struct TemplateContext<'a> {
  pub compilation: &'a Compilation,
  /// The module whose source is being rendered.
  pub module: ModuleIdx,
  /// Handle of the dependency the template is applied to.
  pub dependency: DependencyIdx,
  /// The concatenated module `module` is rendered as a member of, if any.
  pub concatenation_scope: Option<&'a ConcatenatedModule>,
}

impl TemplateContext<'_> {
  pub fn is_in_scope(&self, module: ModuleIdx) -> bool {
    self.concatenation_scope.is_some_and(|scope| scope.contains(module))
  }

  /// Whether the dependency was an edge between two members of the concatenation scope.
  pub fn is_inlined(&self) -> bool {
    self.concatenation_scope.is_some_and(|scope| scope.is_inlined(self.dependency))
      || self
        .compilation
        .module_graph
        .get_module(self.dependency)
        .is_some_and(|module| self.is_in_scope(module))
  }
}

pub(crate) fn remove_range(source: &mut MagicString<'_>, range: Span) {
  if !range.is_empty() {
    source.remove(range.start as usize, range.end as usize);
  }
}

/// Rewrites the source text a dependency covers.
pub trait DependencyTemplate: Send + Sync {
  fn apply(&self, dependency: &Dependency, source: &mut MagicString<'_>, ctx: &TemplateContext<'_>);
}

/// Registration table of templates keyed by dependency type. Types without a template are left
/// as written.
pub struct DependencyTemplates {
  templates: FxHashMap<DependencyType, Box<dyn DependencyTemplate>>,
}

impl Default for DependencyTemplates {
  fn default() -> Self {
    let mut templates = Self { templates: FxHashMap::default() };
    templates.set(DependencyType::Import, ImportTemplate);
    templates.set(DependencyType::DynamicImport, NoopTemplate);
    templates.set(DependencyType::RawDynamicImport, NoopTemplate);
    templates.set(DependencyType::ExportSpecifier, ExportSpecifierTemplate);
    templates.set(DependencyType::ExportImportedSpecifier, ExportStatementTemplate);
    templates.set(DependencyType::ExportStar, ExportStatementTemplate);
    templates.set(DependencyType::ExportHeaderMarker, NoopTemplate);
    templates
  }
}

impl DependencyTemplates {
  pub fn set(&mut self, dependency_type: DependencyType, template: impl DependencyTemplate + 'static) {
    self.templates.insert(dependency_type, Box::new(template));
  }

  pub fn get(&self, dependency_type: DependencyType) -> Option<&dyn DependencyTemplate> {
    self.templates.get(&dependency_type).map(Box::as_ref)
  }

  pub fn has(&self, dependency_type: DependencyType) -> bool {
    self.templates.contains_key(&dependency_type)
  }
}
