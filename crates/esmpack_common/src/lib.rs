mod chunk;
mod module;
mod module_graph;
mod options;
mod types;

pub use crate::{
  chunk::{Chunk, ChunkGraph},
  module::{
    concatenated_module::ConcatenatedModule,
    external_module::{ExternalModule, ExternalType},
    normal_module::NormalModule,
    Module,
  },
  module_graph::{ModuleGraph, ModuleGraphConnection, ModuleGraphModule, ReexportResolution},
  options::{
    externals::{
      parse_external_value, DependencyCategory, ExternalItemValue, ExternalsType,
      ExternalsTypeByCategory, ResolvedExternal,
    },
    library::{LibraryName, LibraryOptions, LibraryType},
    normalize_options,
    normalized_compiler_options::NormalizedCompilerOptions,
    CompilerOptions, OptimizationOptions,
  },
  types::{
    build_meta::{BuildInfo, BuildMeta, BuildMetaFlags, ReexportedExternal},
    dependency::{Dependency, DependencyBlock, DependencyKind, DependencyType},
    exports_info::{ExportInfo, ExportProvided, ExportTarget, ExportsInfo},
    module_id::ModuleId,
    module_table::{IndexModules, ModuleTable},
    raw_idx::{ChunkIdx, ConnectionIdx, DependencyIdx, ModuleIdx},
    runtime_spec::RuntimeSpec,
    source_joiner::{Source, SourceJoiner},
  },
};
