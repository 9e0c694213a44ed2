use std::sync::Arc;

use arcstr::ArcStr;
use esmpack_common::{
  ChunkGraph, Dependency, DependencyBlock, DependencyCategory, DependencyIdx, DependencyKind,
  ExternalModule, ExternalType, Module, ModuleGraph, ModuleId, ModuleIdx, ModuleTable,
  NormalModule,
};
use esmpack_error::BuildResult;
use esmpack_utils::{indexmap::FxIndexSet, rstr::Rstr};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
  hooks::RenderStartupContext, CompilationHooks, ConcatenatedModuleBuilder, DependencyTemplates,
  ModuleBuilder, SharedOptions,
};

/// State of one compilation: every module, both graphs and the hooks plugins registered.
pub struct Compilation {
  pub options: SharedOptions,
  pub module_table: ModuleTable,
  pub module_graph: ModuleGraph,
  pub chunk_graph: ChunkGraph,
  /// Modules that are part of the output. Replaced modules stay in `module_table` but leave this
  /// set.
  pub modules: FxIndexSet<ModuleIdx>,
  /// Modules built during this compilation, as opposed to restored ones.
  pub built_modules: FxHashSet<ModuleIdx>,
  pub hooks: CompilationHooks,
  pub dependency_templates: DependencyTemplates,
  pub module_builder: Arc<dyn ModuleBuilder>,
  external_modules: FxHashMap<String, ModuleIdx>,
}

impl Compilation {
  pub fn new(options: SharedOptions) -> Self {
    Self {
      options,
      module_table: ModuleTable::default(),
      module_graph: ModuleGraph::default(),
      chunk_graph: ChunkGraph::default(),
      modules: FxIndexSet::default(),
      built_modules: FxHashSet::default(),
      hooks: CompilationHooks::default(),
      dependency_templates: DependencyTemplates::default(),
      module_builder: Arc::new(ConcatenatedModuleBuilder),
      external_modules: FxHashMap::default(),
    }
  }

  pub fn module(&self, idx: ModuleIdx) -> &Module {
    &self.module_table[idx]
  }

  pub fn add_normal_module(&mut self, id: impl Into<ModuleId>, source: impl Into<ArcStr>) -> ModuleIdx {
    let idx = self.module_table.next_idx();
    self.module_table.push(NormalModule::new(idx, id.into(), source.into()));
    self.module_graph.module_graph_module_mut(idx);
    self.modules.insert(idx);
    self.built_modules.insert(idx);
    idx
  }

  /// Returns the external module for `request`, creating it on first use.
  pub fn add_external_module(
    &mut self,
    user_request: impl Into<Rstr>,
    request: impl Into<Rstr>,
    external_type: ExternalType,
  ) -> ModuleIdx {
    let idx = self.module_table.next_idx();
    let module = ExternalModule::new(idx, user_request.into(), request.into(), external_type);
    if let Some(existing) = self.external_modules.get(&module.identifier()) {
      return *existing;
    }
    self.external_modules.insert(module.identifier(), idx);
    self.module_table.push(module);
    self.module_graph.module_graph_module_mut(idx);
    self.modules.insert(idx);
    idx
  }

  /// Appends `dependency` to the dependency list of `module`.
  pub fn add_dependency(&mut self, module: ModuleIdx, dependency: Dependency) -> DependencyIdx {
    let idx = self.module_graph.add_dependency(dependency);
    self.module_table[module].dependencies_mut().push(idx);
    idx
  }

  /// Adds a block holding a single `import()` of `request`. Externals can't own blocks, so
  /// nothing is added to them.
  pub fn add_dynamic_import(
    &mut self,
    module: ModuleIdx,
    dependency: Dependency,
  ) -> Option<DependencyIdx> {
    let blocks = self.module_table[module].blocks_mut()?;
    let idx = self.module_graph.add_dependency(dependency);
    blocks.push(DependencyBlock::new(vec![idx]));
    Some(idx)
  }

  pub fn connect(&mut self, origin: ModuleIdx, dependency: DependencyIdx, module: ModuleIdx) {
    self.module_graph.set_resolved_module(origin, dependency, module);
  }

  /// Resolves `dependency` of `origin` against the `externals` option. When the request is
  /// external, the external module is created if needed and connected.
  pub fn connect_external(
    &mut self,
    origin: ModuleIdx,
    dependency: DependencyIdx,
  ) -> BuildResult<Option<ModuleIdx>> {
    let dep = self.module_graph.dependency(dependency);
    let category = match dep.kind {
      DependencyKind::DynamicImport | DependencyKind::RawDynamicImport => {
        DependencyCategory::DynamicImport
      }
      DependencyKind::Import
      | DependencyKind::ExportImportedSpecifier { .. }
      | DependencyKind::ExportStar => DependencyCategory::StaticImport,
      _ => DependencyCategory::Other,
    };
    let user_request = dep.request.clone();
    let Some(resolved) = self.options.resolve_external(&user_request, category)? else {
      return Ok(None);
    };
    let external = self.add_external_module(user_request, resolved.request, resolved.external_type);
    self.connect(origin, dependency, external);
    Ok(Some(external))
  }

  /// Asks the `exports_definitions` taps whether final export names should be computed. The first
  /// tap with an answer wins.
  pub fn call_exports_definitions(&self) -> bool {
    self
      .hooks
      .exports_definitions
      .callbacks()
      .iter()
      .find_map(|callback| callback(self))
      .unwrap_or(false)
  }

  pub fn call_finish_modules(&mut self) -> BuildResult<()> {
    for callback in self.hooks.finish_modules.callbacks() {
      callback(self)?;
    }
    Ok(())
  }

  pub async fn call_optimize_chunk_modules(&mut self) -> BuildResult<()> {
    for callback in self.hooks.optimize_chunk_modules.callbacks() {
      callback(self).await?;
    }
    Ok(())
  }

  pub fn call_render_startup(
    &self,
    ctx: &RenderStartupContext,
    source: &mut String,
  ) -> BuildResult<()> {
    for callback in self.hooks.render_startup.callbacks() {
      callback(self, ctx, source)?;
    }
    Ok(())
  }
}
