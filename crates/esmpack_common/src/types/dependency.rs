use std::fmt::Display;

use esmpack_utils::rstr::Rstr;
use oxc::span::Span;

use crate::DependencyIdx;

/// What a dependency edge means for the module that emits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DependencyKind {
  /// `import { a } from './a'` or `import './a'`
  Import,
  /// `import('./a')`
  DynamicImport,
  /// `import('./a')` that is emitted as written instead of going through the chunk loading runtime.
  RawDynamicImport,
  /// `export { local as exported }`
  ExportSpecifier { local: Rstr, exported: Rstr },
  /// `export { imported as exported } from './a'`. `ids` is empty for `export * as exported`.
  ExportImportedSpecifier { ids: Vec<Rstr>, exported: Rstr },
  /// `export * from './a'`
  ExportStar,
  /// Zero-width marker sitting at the start of an `export * from` statement. It keeps the
  /// statement's own text out of the output.
  ExportHeaderMarker,
  /// `import('./a')` after it was pointed at an external request. It is rendered as a literal
  /// `import("<target_request>")` and has no connection in the module graph.
  ExternalImport { target_request: Rstr },
}

/// Fieldless mirror of [`DependencyKind`], used as the key of dependency template tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyType {
  Import,
  DynamicImport,
  RawDynamicImport,
  ExportSpecifier,
  ExportImportedSpecifier,
  ExportStar,
  ExportHeaderMarker,
  ExternalImport,
}

impl Display for DependencyType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Import => write!(f, "harmony side effect evaluation"),
      Self::DynamicImport => write!(f, "import()"),
      Self::RawDynamicImport => write!(f, "import() raw"),
      Self::ExportSpecifier => write!(f, "harmony export specifier"),
      Self::ExportImportedSpecifier => write!(f, "harmony export imported specifier"),
      Self::ExportStar => write!(f, "harmony export star"),
      Self::ExportHeaderMarker => write!(f, "harmony export header"),
      Self::ExternalImport => write!(f, "external module import"),
    }
  }
}

#[derive(Debug, Clone)]
pub struct Dependency {
  /// `./lib.js` in `import { foo } from './lib.js';`
  pub request: Rstr,
  /// Position of the statement or expression in the owning module's source.
  pub range: Span,
  pub kind: DependencyKind,
}

impl Dependency {
  pub fn new(request: impl Into<Rstr>, range: Span, kind: DependencyKind) -> Self {
    Self { request: request.into(), range, kind }
  }

  pub fn external_import(request: Rstr, target_request: Rstr, range: Span) -> Self {
    Self { request, range, kind: DependencyKind::ExternalImport { target_request } }
  }

  pub fn dependency_type(&self) -> DependencyType {
    match &self.kind {
      DependencyKind::Import => DependencyType::Import,
      DependencyKind::DynamicImport => DependencyType::DynamicImport,
      DependencyKind::RawDynamicImport => DependencyType::RawDynamicImport,
      DependencyKind::ExportSpecifier { .. } => DependencyType::ExportSpecifier,
      DependencyKind::ExportImportedSpecifier { .. } => DependencyType::ExportImportedSpecifier,
      DependencyKind::ExportStar => DependencyType::ExportStar,
      DependencyKind::ExportHeaderMarker => DependencyType::ExportHeaderMarker,
      DependencyKind::ExternalImport { .. } => DependencyType::ExternalImport,
    }
  }

  /// Static ESM edges. Between two modules of one concatenation these are inlined away.
  pub fn is_harmony_import(&self) -> bool {
    matches!(
      self.kind,
      DependencyKind::Import
        | DependencyKind::ExportImportedSpecifier { .. }
        | DependencyKind::ExportStar
    )
  }

  pub fn is_dynamic_import(&self) -> bool {
    matches!(self.kind, DependencyKind::DynamicImport | DependencyKind::RawDynamicImport)
  }

  pub fn is_export_star(&self) -> bool {
    matches!(self.kind, DependencyKind::ExportStar)
  }

}

/// A nested group of dependencies, e.g. the site of a dynamic `import()`.
#[derive(Debug, Default, Clone)]
pub struct DependencyBlock {
  pub chunk_name: Option<Rstr>,
  pub dependencies: Vec<DependencyIdx>,
  pub blocks: Vec<DependencyBlock>,
}

impl DependencyBlock {
  pub fn new(dependencies: Vec<DependencyIdx>) -> Self {
    Self { chunk_name: None, dependencies, blocks: vec![] }
  }

  /// Visits every dependency of this block and its nested blocks, depth first.
  pub fn all_dependencies(&self) -> Vec<DependencyIdx> {
    let mut ret = self.dependencies.clone();
    for block in &self.blocks {
      ret.extend(block.all_dependencies());
    }
    ret
  }

  pub fn for_each_block_mut(&mut self, f: &mut impl FnMut(&mut DependencyBlock)) {
    f(self);
    for block in &mut self.blocks {
      block.for_each_block_mut(f);
    }
  }
}
