use esmpack_utils::{indexmap::FxIndexMap, rstr::Rstr};

use crate::{ModuleIdx, RuntimeSpec};

/// Whether an export is statically known to exist.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExportProvided {
  Provided,
  NotProvided,
  #[default]
  Unknown,
}

impl ExportProvided {
  pub fn is_provided(self) -> bool {
    matches!(self, Self::Provided)
  }

  pub fn is_not_provided(self) -> bool {
    matches!(self, Self::NotProvided)
  }
}

/// Where a re-export forwards to. `export: None` forwards the whole namespace object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
  pub module: ModuleIdx,
  pub export: Option<Vec<Rstr>>,
}

impl ExportTarget {
  pub fn new(module: ModuleIdx, export: Option<Vec<Rstr>>) -> Self {
    Self { module, export }
  }

  /// The first name of the forwarded export path, if any.
  pub fn first_export(&self) -> Option<&Rstr> {
    self.export.as_ref().and_then(|names| names.first())
  }
}

#[derive(Debug, Clone)]
pub struct ExportInfo {
  name: Rstr,
  pub provided: ExportProvided,
  /// Set when minification or mangling gave the export another property name.
  pub used_name: Option<Rstr>,
  /// Runtimes the export is used in. `None` means usage isn't tracked per runtime, so the export
  /// counts as used everywhere.
  pub used_in_runtime: Option<RuntimeSpec>,
  /// The export is declared by its own module even though a target might be recorded.
  pub terminal_binding: bool,
  target: Option<ExportTarget>,
}

impl ExportInfo {
  pub fn new(name: Rstr) -> Self {
    Self {
      name,
      provided: ExportProvided::Unknown,
      used_name: None,
      used_in_runtime: None,
      terminal_binding: false,
      target: None,
    }
  }

  pub fn name(&self) -> &Rstr {
    &self.name
  }

  /// The property name the export is stored under in `runtime`, or `None` when it's unused
  /// there.
  pub fn get_used_name(&self, fallback_name: &Rstr, runtime: &RuntimeSpec) -> Option<Rstr> {
    if let Some(used_in) = &self.used_in_runtime {
      if runtime.is_unspecified() {
        if used_in.is_empty() {
          return None;
        }
      } else if !runtime.iter().any(|runtime| used_in.contains(runtime)) {
        return None;
      }
    }
    Some(self.used_name.clone().unwrap_or_else(|| fallback_name.clone()))
  }

  pub fn set_provided(&mut self, provided: ExportProvided) {
    self.provided = provided;
  }

  pub fn is_reexport(&self) -> bool {
    !self.terminal_binding && self.target.is_some()
  }

  /// One hop of the re-export chain. Use `ModuleGraph::resolve_reexport` to walk all of it.
  pub fn target(&self) -> Option<&ExportTarget> {
    self.target.as_ref()
  }

  pub fn set_target(&mut self, target: Option<ExportTarget>) {
    self.target = target;
  }
}

/// The export surface of one module.
#[derive(Debug, Default, Clone)]
pub struct ExportsInfo {
  exports: FxIndexMap<Rstr, ExportInfo>,
  /// Answer for names without an entry of their own.
  pub other_exports_provided: ExportProvided,
}

impl ExportsInfo {
  /// Exports in their stable order. Rendering must follow this order.
  pub fn ordered_exports(&self) -> impl Iterator<Item = &ExportInfo> {
    self.exports.values()
  }

  pub fn export_info(&self, name: &str) -> Option<&ExportInfo> {
    self.exports.get(name)
  }

  /// Gets the entry for `name`, appending a new one at the end of the order if missing.
  pub fn export_info_mut(&mut self, name: &str) -> &mut ExportInfo {
    self.exports.entry(Rstr::new(name)).or_insert_with(|| ExportInfo::new(Rstr::new(name)))
  }

  pub fn is_export_provided(&self, name: &str) -> ExportProvided {
    self.exports.get(name).map_or(self.other_exports_provided, |info| info.provided)
  }

  pub fn len(&self) -> usize {
    self.exports.len()
  }

  pub fn is_empty(&self) -> bool {
    self.exports.is_empty()
  }

  /// Shorthand for declaring a provided, local export.
  pub fn provide(&mut self, name: &str) -> &mut ExportInfo {
    let info = self.export_info_mut(name);
    info.provided = ExportProvided::Provided;
    info.terminal_binding = true;
    info
  }

  /// Shorthand for declaring a provided re-export of `target`.
  pub fn provide_reexport(&mut self, name: &str, target: ExportTarget) -> &mut ExportInfo {
    let info = self.export_info_mut(name);
    info.provided = ExportProvided::Provided;
    info.terminal_binding = false;
    info.set_target(Some(target));
    info
  }
}

#[cfg(test)]
mod tests {
  use esmpack_utils::rstr::Rstr;

  use super::{ExportProvided, ExportTarget, ExportsInfo};
  use crate::{ModuleIdx, RuntimeSpec};

  #[test]
  fn ordered_exports_keep_insertion_order() {
    let mut info = ExportsInfo::default();
    info.provide("z");
    info.provide("a");
    info.provide("m");
    info.provide("a");
    let names = info.ordered_exports().map(|e| e.name().as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["z", "a", "m"]);
  }

  #[test]
  fn used_name_depends_on_runtime() {
    let mut info = ExportsInfo::default();
    let export = info.provide("foo");
    export.used_name = Some(Rstr::new("a"));
    export.used_in_runtime = Some(RuntimeSpec::single("main"));

    let export = info.export_info("foo").unwrap();
    let name = Rstr::new("foo");
    assert_eq!(export.get_used_name(&name, &RuntimeSpec::single("main")), Some(Rstr::new("a")));
    assert_eq!(export.get_used_name(&name, &RuntimeSpec::single("worker")), None);
    assert_eq!(export.get_used_name(&name, &RuntimeSpec::default()), Some(Rstr::new("a")));
  }

  #[test]
  fn reexport_requires_non_terminal_target() {
    let mut info = ExportsInfo::default();
    info.provide_reexport("foo", ExportTarget::new(ModuleIdx::from_usize(1), None));
    assert!(info.export_info("foo").unwrap().is_reexport());
    info.export_info_mut("foo").terminal_binding = true;
    assert!(!info.export_info("foo").unwrap().is_reexport());
    assert_eq!(info.is_export_provided("missing"), ExportProvided::Unknown);
  }
}
