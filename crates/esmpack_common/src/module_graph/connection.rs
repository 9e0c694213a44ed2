use crate::{DependencyIdx, ModuleIdx};

/// A resolved dependency: `origin_module` reaches `module` through `dependency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleGraphConnection {
  pub dependency: DependencyIdx,
  pub origin_module: ModuleIdx,
  pub module: ModuleIdx,
}

impl ModuleGraphConnection {
  pub fn new(dependency: DependencyIdx, origin_module: ModuleIdx, module: ModuleIdx) -> Self {
    Self { dependency, origin_module, module }
  }

  /// The endpoint that isn't `module`.
  pub fn other_end(&self, module: ModuleIdx) -> ModuleIdx {
    if self.module == module { self.origin_module } else { self.module }
  }
}
