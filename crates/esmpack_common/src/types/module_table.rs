use oxc_index::IndexVec;

use crate::{Module, ModuleIdx};

pub type IndexModules = IndexVec<ModuleIdx, Module>;

/// Owns every module ever created in a compilation, including the ones that were replaced by a
/// concatenated module. Which of them are still part of the output is tracked by the compilation.
#[derive(Debug, Default)]
pub struct ModuleTable {
  pub modules: IndexModules,
}

impl ModuleTable {
  /// Reserves the next index so the module can be constructed knowing its own idx.
  pub fn next_idx(&self) -> ModuleIdx {
    self.modules.next_idx()
  }

  pub fn push(&mut self, module: impl Into<Module>) -> ModuleIdx {
    let module = module.into();
    debug_assert_eq!(module.idx(), self.modules.next_idx());
    self.modules.push(module)
  }

  pub fn get(&self, idx: ModuleIdx) -> Option<&Module> {
    self.modules.get(idx)
  }

  pub fn get_mut(&mut self, idx: ModuleIdx) -> Option<&mut Module> {
    self.modules.get_mut(idx)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Module> {
    self.modules.iter()
  }

  pub fn externals(&self) -> impl Iterator<Item = &Module> {
    self.modules.iter().filter(|module| module.is_external())
  }
}

impl std::ops::Index<ModuleIdx> for ModuleTable {
  type Output = Module;

  fn index(&self, idx: ModuleIdx) -> &Self::Output {
    &self.modules[idx]
  }
}

impl std::ops::IndexMut<ModuleIdx> for ModuleTable {
  fn index_mut(&mut self, idx: ModuleIdx) -> &mut Self::Output {
    &mut self.modules[idx]
  }
}
