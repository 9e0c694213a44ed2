use bitflags::bitflags;
use esmpack_utils::{
  indexmap::{FxIndexMap, FxIndexSet},
  rstr::Rstr,
};
use oxc::span::Span;

bitflags! {
  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
  pub struct BuildMetaFlags: u8 {
    /// The module is strict ESM (`.mjs` or `"type": "module"`).
    const STRICT_HARMONY_MODULE = 1;
  }
}

#[derive(Debug, Default, Clone)]
pub struct BuildMeta {
  pub flags: BuildMetaFlags,
  /// Maps the exports-object property of every export to the local identifier it ends up as in
  /// the output. Only concatenated modules whose exports were fully resolved carry it. Every used
  /// export name must be present; lookups index it directly.
  pub exports_final_name: Option<FxIndexMap<Rstr, Rstr>>,
}

#[derive(Debug, Default, Clone)]
pub struct BuildInfo {
  /// Names declared at the top level of the module.
  pub top_level_declarations: FxIndexSet<Rstr>,
  /// `export * from '<external>'` statements whose dependency was pruned.
  pub reexported_externals: Vec<ReexportedExternal>,
}

/// A star re-export of an external module. The statement at `range` is dropped from the module
/// body and re-emitted as `export * from "<request>";` after the export clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReexportedExternal {
  /// The external request, e.g. `external111` for a source that wrote `external1`.
  pub request: Rstr,
  pub range: Span,
}
