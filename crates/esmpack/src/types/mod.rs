pub mod compile_output;
pub mod rendered_chunk;

use std::sync::Arc;

use esmpack_common::NormalizedCompilerOptions;

pub type SharedOptions = Arc<NormalizedCompilerOptions>;
