pub mod externals;
pub mod library;
pub mod normalized_compiler_options;

use esmpack_utils::indexmap::FxIndexMap;
use serde::Deserialize;

use crate::{ExternalItemValue, ExternalsType, LibraryOptions, NormalizedCompilerOptions};

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationOptions {
  pub concatenate_modules: Option<bool>,
  /// Set when chunks may hold modules shared with other chunks. Final export names can't be
  /// relied on then.
  pub split_chunks: Option<bool>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompilerOptions {
  pub library: Option<LibraryOptions>,
  pub optimization: Option<OptimizationOptions>,
  pub externals: Option<FxIndexMap<String, ExternalItemValue>>,
  pub externals_type: Option<ExternalsType>,
}

pub fn normalize_options(raw_options: CompilerOptions) -> NormalizedCompilerOptions {
  let optimization = raw_options.optimization.unwrap_or_default();
  NormalizedCompilerOptions {
    library: raw_options.library,
    concatenate_modules: optimization.concatenate_modules.unwrap_or(true),
    split_chunks: optimization.split_chunks.unwrap_or(false),
    externals: raw_options.externals.unwrap_or_default(),
    externals_type: raw_options.externals_type.unwrap_or_default(),
  }
}
