use arcstr::ArcStr;

use crate::{BuildInfo, BuildMeta, DependencyBlock, DependencyIdx, ModuleId, ModuleIdx};

#[derive(Debug)]
pub struct NormalModule {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  pub source: ArcStr,
  pub dependencies: Vec<DependencyIdx>,
  pub blocks: Vec<DependencyBlock>,
  pub build_meta: BuildMeta,
  pub build_info: BuildInfo,
}

impl NormalModule {
  pub fn new(idx: ModuleIdx, id: ModuleId, source: ArcStr) -> Self {
    Self {
      idx,
      id,
      source,
      dependencies: vec![],
      blocks: vec![],
      build_meta: BuildMeta::default(),
      build_info: BuildInfo::default(),
    }
  }
}
