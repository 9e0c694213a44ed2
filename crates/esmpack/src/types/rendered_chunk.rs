use esmpack_common::ChunkIdx;
use esmpack_utils::rstr::Rstr;

#[derive(Debug, Clone)]
pub struct RenderedChunk {
  pub idx: ChunkIdx,
  pub name: Option<Rstr>,
  pub code: String,
}
