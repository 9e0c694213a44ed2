use esmpack_common::{ChunkIdx, SourceJoiner};
use esmpack_error::BuildResult;

use crate::{hooks::RenderStartupContext, render_module, Compilation, RenderedChunk};

/// Joins the bodies of the chunk's modules and appends the startup code of its entry module.
#[tracing::instrument(level = "trace", skip(compilation))]
pub fn render_chunk(compilation: &Compilation, chunk_idx: ChunkIdx) -> BuildResult<RenderedChunk> {
  let chunk = compilation.chunk_graph.chunk(chunk_idx);
  let mut joiner = SourceJoiner::default();

  for module in compilation.chunk_graph.chunk_modules(chunk_idx) {
    joiner.append_source(render_module(compilation, module)?);
  }

  if let Some(entry_module) = chunk.entry_module {
    let mut startup = String::new();
    compilation.call_render_startup(
      &RenderStartupContext { chunk: chunk_idx, module: entry_module },
      &mut startup,
    )?;
    joiner.append_source(startup);
  }

  Ok(RenderedChunk { idx: chunk_idx, name: chunk.name.clone(), code: joiner.join() })
}
