pub mod concatenated_module;
pub mod external_module;
pub mod normal_module;

use std::borrow::Cow;

use crate::{
  BuildInfo, BuildMeta, ConcatenatedModule, DependencyBlock, DependencyIdx, ExternalModule,
  ModuleIdx, NormalModule,
};

#[derive(Debug)]
pub enum Module {
  Normal(Box<NormalModule>),
  External(Box<ExternalModule>),
  Concatenated(Box<ConcatenatedModule>),
}

impl Module {
  pub fn idx(&self) -> ModuleIdx {
    match self {
      Self::Normal(v) => v.idx,
      Self::External(v) => v.idx,
      Self::Concatenated(v) => v.idx,
    }
  }

  pub fn identifier(&self) -> Cow<'_, str> {
    match self {
      Self::Normal(v) => Cow::Borrowed(&v.id),
      Self::External(v) => Cow::Owned(v.identifier()),
      Self::Concatenated(v) => Cow::Borrowed(&v.id),
    }
  }

  pub fn dependencies(&self) -> &[DependencyIdx] {
    match self {
      Self::Normal(v) => &v.dependencies,
      Self::External(v) => &v.dependencies,
      Self::Concatenated(v) => &v.dependencies,
    }
  }

  pub fn dependencies_mut(&mut self) -> &mut Vec<DependencyIdx> {
    match self {
      Self::Normal(v) => &mut v.dependencies,
      Self::External(v) => &mut v.dependencies,
      Self::Concatenated(v) => &mut v.dependencies,
    }
  }

  pub fn blocks(&self) -> &[DependencyBlock] {
    match self {
      Self::Normal(v) => &v.blocks,
      Self::External(_) => &[],
      Self::Concatenated(v) => &v.blocks,
    }
  }

  /// `None` for externals, which never have nested blocks.
  pub fn blocks_mut(&mut self) -> Option<&mut Vec<DependencyBlock>> {
    match self {
      Self::Normal(v) => Some(&mut v.blocks),
      Self::External(_) => None,
      Self::Concatenated(v) => Some(&mut v.blocks),
    }
  }

  /// Dependencies of the module itself followed by those of its blocks, depth first.
  pub fn all_dependencies(&self) -> Vec<DependencyIdx> {
    let mut ret = self.dependencies().to_vec();
    for block in self.blocks() {
      ret.extend(block.all_dependencies());
    }
    ret
  }

  pub fn build_meta(&self) -> &BuildMeta {
    match self {
      Self::Normal(v) => &v.build_meta,
      Self::External(v) => &v.build_meta,
      Self::Concatenated(v) => &v.build_meta,
    }
  }

  pub fn build_meta_mut(&mut self) -> &mut BuildMeta {
    match self {
      Self::Normal(v) => &mut v.build_meta,
      Self::External(v) => &mut v.build_meta,
      Self::Concatenated(v) => &mut v.build_meta,
    }
  }

  pub fn build_info(&self) -> &BuildInfo {
    match self {
      Self::Normal(v) => &v.build_info,
      Self::External(v) => &v.build_info,
      Self::Concatenated(v) => &v.build_info,
    }
  }

  pub fn build_info_mut(&mut self) -> &mut BuildInfo {
    match self {
      Self::Normal(v) => &mut v.build_info,
      Self::External(v) => &mut v.build_info,
      Self::Concatenated(v) => &mut v.build_info,
    }
  }

  pub fn as_normal(&self) -> Option<&NormalModule> {
    match self {
      Self::Normal(v) => Some(v),
      _ => None,
    }
  }

  pub fn as_external(&self) -> Option<&ExternalModule> {
    match self {
      Self::External(v) => Some(v),
      _ => None,
    }
  }

  pub fn as_concatenated(&self) -> Option<&ConcatenatedModule> {
    match self {
      Self::Concatenated(v) => Some(v),
      _ => None,
    }
  }

  pub fn is_external(&self) -> bool {
    matches!(self, Self::External(..))
  }
}

impl From<NormalModule> for Module {
  fn from(module: NormalModule) -> Self {
    Self::Normal(Box::new(module))
  }
}

impl From<ExternalModule> for Module {
  fn from(module: ExternalModule) -> Self {
    Self::External(Box::new(module))
  }
}

impl From<ConcatenatedModule> for Module {
  fn from(module: ConcatenatedModule) -> Self {
    Self::Concatenated(Box::new(module))
  }
}
