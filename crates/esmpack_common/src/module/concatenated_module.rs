use esmpack_utils::indexmap::FxIndexSet;
use rustc_hash::FxHashSet;

use crate::{BuildInfo, BuildMeta, DependencyBlock, DependencyIdx, ModuleId, ModuleIdx, RuntimeSpec};

/// The merge of a root module and the modules inlined into it.
#[derive(Debug)]
pub struct ConcatenatedModule {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  pub root: ModuleIdx,
  /// Members in concatenation order, root included.
  pub modules: FxIndexSet<ModuleIdx>,
  pub runtime: RuntimeSpec,
  pub dependencies: Vec<DependencyIdx>,
  /// Static imports between two members. Their statements disappear from the rendered body.
  pub inlined_dependencies: FxHashSet<DependencyIdx>,
  pub blocks: Vec<DependencyBlock>,
  pub build_meta: BuildMeta,
  pub build_info: BuildInfo,
  pub built: bool,
}

impl ConcatenatedModule {
  pub fn create(
    idx: ModuleIdx,
    root_id: &ModuleId,
    root: ModuleIdx,
    modules: FxIndexSet<ModuleIdx>,
    runtime: RuntimeSpec,
  ) -> Self {
    let id = ModuleId::new(format!("{root_id}|concatenated({})|{runtime}", modules.len()));
    Self {
      idx,
      id,
      root,
      modules,
      runtime,
      dependencies: vec![],
      inlined_dependencies: FxHashSet::default(),
      blocks: vec![],
      build_meta: BuildMeta::default(),
      build_info: BuildInfo::default(),
      built: false,
    }
  }

  pub fn contains(&self, module: ModuleIdx) -> bool {
    self.modules.contains(&module)
  }

  pub fn is_inlined(&self, dependency: DependencyIdx) -> bool {
    self.inlined_dependencies.contains(&dependency)
  }
}
