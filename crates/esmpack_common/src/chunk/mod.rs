mod chunk_graph;

use esmpack_utils::{indexmap::FxIndexSet, rstr::Rstr};

use crate::{ChunkIdx, ModuleIdx, RuntimeSpec};

pub use self::chunk_graph::ChunkGraph;

#[derive(Debug, Default)]
pub struct Chunk {
  pub idx: ChunkIdx,
  pub name: Option<Rstr>,
  pub runtime: RuntimeSpec,
  /// Module whose exports become the chunk's export surface.
  pub entry_module: Option<ModuleIdx>,
  pub modules: FxIndexSet<ModuleIdx>,
}

impl Chunk {
  pub fn new(idx: ChunkIdx, name: Option<Rstr>, runtime: RuntimeSpec) -> Self {
    Self { idx, name, runtime, entry_module: None, modules: FxIndexSet::default() }
  }
}
