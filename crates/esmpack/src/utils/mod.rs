pub mod chunk;
pub mod render_module;
