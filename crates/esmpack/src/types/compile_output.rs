use crate::{Compilation, RenderedChunk};

pub struct CompileOutput {
  pub chunks: Vec<RenderedChunk>,
  /// The sealed compilation, kept so callers can inspect the final graph.
  pub compilation: Compilation,
}

impl CompileOutput {
  pub fn chunk_by_name(&self, name: &str) -> Option<&RenderedChunk> {
    self.chunks.iter().find(|chunk| chunk.name.as_ref().is_some_and(|n| n == name))
  }
}
