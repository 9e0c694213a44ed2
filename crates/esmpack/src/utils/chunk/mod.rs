pub mod render_chunk;
pub mod render_chunk_exports;
