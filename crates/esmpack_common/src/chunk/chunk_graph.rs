use esmpack_utils::{indexmap::FxIndexSet, rstr::Rstr};
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;

use crate::{Chunk, ChunkIdx, ModuleIdx, RuntimeSpec};

#[derive(Debug, Default)]
pub struct ChunkGraph {
  pub chunk_table: IndexVec<ChunkIdx, Chunk>,
  module_to_chunks: FxHashMap<ModuleIdx, FxIndexSet<ChunkIdx>>,
}

impl ChunkGraph {
  pub fn add_chunk(&mut self, name: Option<Rstr>, runtime: RuntimeSpec) -> ChunkIdx {
    let idx = self.chunk_table.next_idx();
    self.chunk_table.push(Chunk::new(idx, name, runtime))
  }

  pub fn chunk(&self, idx: ChunkIdx) -> &Chunk {
    &self.chunk_table[idx]
  }

  pub fn connect_chunk_and_module(&mut self, chunk: ChunkIdx, module: ModuleIdx) {
    self.chunk_table[chunk].modules.insert(module);
    self.module_to_chunks.entry(module).or_default().insert(chunk);
  }

  pub fn connect_chunk_and_entry_module(&mut self, chunk: ChunkIdx, module: ModuleIdx) {
    self.connect_chunk_and_module(chunk, module);
    self.chunk_table[chunk].entry_module = Some(module);
  }

  pub fn disconnect_chunk_and_module(&mut self, chunk: ChunkIdx, module: ModuleIdx) {
    self.chunk_table[chunk].modules.shift_remove(&module);
    if let Some(chunks) = self.module_to_chunks.get_mut(&module) {
      chunks.shift_remove(&chunk);
    }
  }

  pub fn chunk_modules(&self, chunk: ChunkIdx) -> impl Iterator<Item = ModuleIdx> + '_ {
    self.chunk_table[chunk].modules.iter().copied()
  }

  pub fn module_chunks(&self, module: ModuleIdx) -> impl Iterator<Item = ChunkIdx> + '_ {
    self.module_to_chunks.get(&module).into_iter().flat_map(|chunks| chunks.iter().copied())
  }

  /// Runtimes of every chunk `module` belongs to, in chunk order.
  pub fn get_module_runtimes(&self, module: ModuleIdx) -> Vec<&RuntimeSpec> {
    self.module_chunks(module).map(|chunk| &self.chunk_table[chunk].runtime).collect()
  }

  /// Puts `new_module` in every chunk that holds `old_module`, at the same position, and makes it
  /// the entry where `old_module` was.
  pub fn replace_module(&mut self, old_module: ModuleIdx, new_module: ModuleIdx) {
    let Some(chunks) = self.module_to_chunks.remove(&old_module) else {
      return;
    };
    for chunk_idx in &chunks {
      let chunk = &mut self.chunk_table[*chunk_idx];
      if let Some(position) = chunk.modules.get_index_of(&old_module) {
        chunk.modules.shift_remove(&old_module);
        let (inserted, _) = chunk.modules.insert_full(new_module);
        chunk.modules.move_index(inserted, position.min(chunk.modules.len() - 1));
      }
      if chunk.entry_module == Some(old_module) {
        chunk.entry_module = Some(new_module);
      }
    }
    self.module_to_chunks.entry(new_module).or_default().extend(chunks);
  }

  /// Drops the chunk membership of `module`.
  pub fn clear_chunk_graph_for_module(&mut self, module: ModuleIdx) {
    let Some(chunks) = self.module_to_chunks.remove(&module) else {
      return;
    };
    for chunk in chunks {
      let chunk = &mut self.chunk_table[chunk];
      chunk.modules.shift_remove(&module);
      if chunk.entry_module == Some(module) {
        chunk.entry_module = None;
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::ChunkGraph;
  use crate::{ModuleIdx, RuntimeSpec};

  #[test]
  fn replace_module_keeps_position_and_entry() {
    let mut graph = ChunkGraph::default();
    let chunk = graph.add_chunk(Some("main".into()), RuntimeSpec::single("main"));
    let (a, b, c) = (ModuleIdx::from_usize(0), ModuleIdx::from_usize(1), ModuleIdx::from_usize(2));
    graph.connect_chunk_and_entry_module(chunk, a);
    graph.connect_chunk_and_module(chunk, b);

    graph.replace_module(a, c);
    assert_eq!(graph.chunk_modules(chunk).collect::<Vec<_>>(), [c, b]);
    assert_eq!(graph.chunk(chunk).entry_module, Some(c));
    assert_eq!(graph.module_chunks(a).count(), 0);
    assert_eq!(graph.get_module_runtimes(c), [&RuntimeSpec::single("main")]);
  }

  #[test]
  fn clear_chunk_graph_removes_membership() {
    let mut graph = ChunkGraph::default();
    let chunk = graph.add_chunk(None, RuntimeSpec::default());
    let a = ModuleIdx::from_usize(0);
    graph.connect_chunk_and_entry_module(chunk, a);
    graph.clear_chunk_graph_for_module(a);
    assert_eq!(graph.chunk_modules(chunk).count(), 0);
    assert_eq!(graph.chunk(chunk).entry_module, None);
  }
}
