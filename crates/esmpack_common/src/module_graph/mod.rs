mod connection;
mod reexport;

use esmpack_utils::indexmap::FxIndexSet;
use oxc_index::IndexVec;
use rustc_hash::FxHashMap;

use crate::{ConnectionIdx, Dependency, DependencyIdx, ExportsInfo, ModuleIdx};

pub use self::{connection::ModuleGraphConnection, reexport::ReexportResolution};

/// Graph bookkeeping of one module.
#[derive(Debug, Default, Clone)]
pub struct ModuleGraphModule {
  pub incoming: FxIndexSet<ConnectionIdx>,
  pub outgoing: FxIndexSet<ConnectionIdx>,
  pub exports: ExportsInfo,
  pub depth: Option<u32>,
  pub pre_order_index: Option<u32>,
  pub post_order_index: Option<u32>,
  pub is_async: bool,
}

#[derive(Debug, Default)]
pub struct ModuleGraph {
  /// Dependencies are never removed from the arena. Dropping one from a module only unlinks it.
  dependencies: IndexVec<DependencyIdx, Dependency>,
  connections: IndexVec<ConnectionIdx, Option<ModuleGraphConnection>>,
  dependency_connections: FxHashMap<DependencyIdx, ConnectionIdx>,
  modules: FxHashMap<ModuleIdx, ModuleGraphModule>,
}

impl ModuleGraph {
  pub fn module_graph_module(&self, module: ModuleIdx) -> Option<&ModuleGraphModule> {
    self.modules.get(&module)
  }

  pub fn module_graph_module_mut(&mut self, module: ModuleIdx) -> &mut ModuleGraphModule {
    self.modules.entry(module).or_default()
  }

  pub fn add_dependency(&mut self, dependency: Dependency) -> DependencyIdx {
    self.dependencies.push(dependency)
  }

  pub fn dependency(&self, idx: DependencyIdx) -> &Dependency {
    &self.dependencies[idx]
  }

  /// Connects `dependency` of `origin_module` to `module`, replacing any earlier resolution.
  pub fn set_resolved_module(
    &mut self,
    origin_module: ModuleIdx,
    dependency: DependencyIdx,
    module: ModuleIdx,
  ) -> ConnectionIdx {
    self.remove_connection(dependency);
    let idx =
      self.connections.push(Some(ModuleGraphConnection::new(dependency, origin_module, module)));
    self.dependency_connections.insert(dependency, idx);
    self.module_graph_module_mut(origin_module).outgoing.insert(idx);
    self.module_graph_module_mut(module).incoming.insert(idx);
    idx
  }

  /// The module `dependency` resolves to, if it is still connected.
  pub fn get_module(&self, dependency: DependencyIdx) -> Option<ModuleIdx> {
    self.connection_by_dependency(dependency).map(|connection| connection.module)
  }

  pub fn connection_by_dependency(&self, dependency: DependencyIdx) -> Option<&ModuleGraphConnection> {
    self.dependency_connections.get(&dependency).and_then(|idx| self.get_connection(*idx))
  }

  pub fn get_connection(&self, idx: ConnectionIdx) -> Option<&ModuleGraphConnection> {
    self.connections.get(idx).and_then(Option::as_ref)
  }

  pub fn incoming_connections(
    &self,
    module: ModuleIdx,
  ) -> impl Iterator<Item = &ModuleGraphConnection> + '_ {
    self
      .modules
      .get(&module)
      .into_iter()
      .flat_map(|mgm| mgm.incoming.iter())
      .filter_map(|idx| self.get_connection(*idx))
  }

  pub fn outgoing_connections(
    &self,
    module: ModuleIdx,
  ) -> impl Iterator<Item = &ModuleGraphConnection> + '_ {
    self
      .modules
      .get(&module)
      .into_iter()
      .flat_map(|mgm| mgm.outgoing.iter())
      .filter_map(|idx| self.get_connection(*idx))
  }

  /// Removes the connection created for `dependency`. The dependency itself stays valid.
  pub fn remove_connection(&mut self, dependency: DependencyIdx) -> Option<ModuleGraphConnection> {
    let idx = self.dependency_connections.remove(&dependency)?;
    let connection = self.connections.get_mut(idx).and_then(Option::take)?;
    if let Some(mgm) = self.modules.get_mut(&connection.origin_module) {
      mgm.outgoing.shift_remove(&idx);
    }
    if let Some(mgm) = self.modules.get_mut(&connection.module) {
      mgm.incoming.shift_remove(&idx);
    }
    Some(connection)
  }

  /// Re-points every connection of `old_module` accepted by `filter` at `new_module`. Rejected
  /// connections stay where they are.
  pub fn move_module_connections(
    &mut self,
    old_module: ModuleIdx,
    new_module: ModuleIdx,
    filter: impl Fn(&ModuleGraphConnection, &Dependency) -> bool,
  ) {
    if old_module == new_module {
      return;
    }
    let Some(old) = self.modules.get(&old_module) else {
      return;
    };
    let outgoing = old.outgoing.iter().copied().collect::<Vec<_>>();
    let incoming = old.incoming.iter().copied().collect::<Vec<_>>();

    let mut moved_outgoing = vec![];
    for idx in outgoing {
      let Some(connection) = self.connections.get_mut(idx).and_then(Option::as_mut) else {
        continue;
      };
      if filter(connection, &self.dependencies[connection.dependency]) {
        connection.origin_module = new_module;
        moved_outgoing.push(idx);
      }
    }
    let mut moved_incoming = vec![];
    for idx in incoming {
      let Some(connection) = self.connections.get_mut(idx).and_then(Option::as_mut) else {
        continue;
      };
      if filter(connection, &self.dependencies[connection.dependency]) {
        connection.module = new_module;
        moved_incoming.push(idx);
      }
    }

    let old = self.module_graph_module_mut(old_module);
    for idx in &moved_outgoing {
      old.outgoing.shift_remove(idx);
    }
    for idx in &moved_incoming {
      old.incoming.shift_remove(idx);
    }
    let new = self.module_graph_module_mut(new_module);
    new.outgoing.extend(moved_outgoing);
    new.incoming.extend(moved_incoming);
  }

  /// Copies ordering, depth, exports and async-ness of `source` onto `target`.
  pub fn clone_module_attributes(&mut self, source: ModuleIdx, target: ModuleIdx) {
    let Some(source) = self.modules.get(&source) else {
      return;
    };
    let depth = source.depth;
    let pre_order_index = source.pre_order_index;
    let post_order_index = source.post_order_index;
    let exports = source.exports.clone();
    let is_async = source.is_async;

    let target = self.module_graph_module_mut(target);
    target.depth = depth;
    target.pre_order_index = pre_order_index;
    target.post_order_index = post_order_index;
    target.exports = exports;
    target.is_async = is_async;
  }

  /// Forgets `module`. Connections still attached to it are removed so nothing points at it
  /// afterwards.
  pub fn clear_module_graph_for_module(&mut self, module: ModuleIdx) {
    let Some(mgm) = self.modules.remove(&module) else {
      return;
    };
    for idx in mgm.incoming.into_iter().chain(mgm.outgoing) {
      if let Some(connection) = self.connections.get(idx).copied().flatten() {
        self.remove_connection(connection.dependency);
      }
    }
  }

  pub fn exports_info(&self, module: ModuleIdx) -> Option<&ExportsInfo> {
    self.modules.get(&module).map(|mgm| &mgm.exports)
  }

  pub fn exports_info_mut(&mut self, module: ModuleIdx) -> &mut ExportsInfo {
    &mut self.module_graph_module_mut(module).exports
  }

  pub fn is_async(&self, module: ModuleIdx) -> bool {
    self.modules.get(&module).is_some_and(|mgm| mgm.is_async)
  }

  pub fn set_async(&mut self, module: ModuleIdx, is_async: bool) {
    self.module_graph_module_mut(module).is_async = is_async;
  }

  /// Whether any live connection starts or ends at `module`.
  pub fn has_connections(&self, module: ModuleIdx) -> bool {
    self.connections.iter().flatten().any(|c| c.module == module || c.origin_module == module)
  }
}

#[cfg(test)]
mod tests {
  use oxc::span::Span;

  use super::ModuleGraph;
  use crate::{Dependency, DependencyKind, ModuleIdx};

  fn import(graph: &mut ModuleGraph, request: &str) -> crate::DependencyIdx {
    graph.add_dependency(Dependency::new(request, Span::default(), DependencyKind::Import))
  }

  #[test]
  fn move_connections_respects_filter() {
    let mut graph = ModuleGraph::default();
    let (a, b, c, d) = (
      ModuleIdx::from_usize(0),
      ModuleIdx::from_usize(1),
      ModuleIdx::from_usize(2),
      ModuleIdx::from_usize(3),
    );
    let a_to_b = import(&mut graph, "./b");
    let b_to_c = import(&mut graph, "./c");
    graph.set_resolved_module(a, a_to_b, b);
    graph.set_resolved_module(b, b_to_c, c);

    graph.move_module_connections(b, d, |connection, _| connection.other_end(b) == a);
    assert_eq!(graph.get_module(a_to_b), Some(d));
    assert_eq!(graph.connection_by_dependency(b_to_c).map(|c| c.origin_module), Some(b));
    assert_eq!(graph.incoming_connections(d).count(), 1);
    assert_eq!(graph.incoming_connections(b).count(), 0);

    graph.clear_module_graph_for_module(b);
    assert!(!graph.has_connections(b));
    assert_eq!(graph.get_module(b_to_c), None);
    assert_eq!(graph.outgoing_connections(a).count(), 1);
  }

  #[test]
  fn resolving_again_replaces_the_connection() {
    let mut graph = ModuleGraph::default();
    let (a, b, c) = (ModuleIdx::from_usize(0), ModuleIdx::from_usize(1), ModuleIdx::from_usize(2));
    let dep = import(&mut graph, "./x");
    graph.set_resolved_module(a, dep, b);
    graph.set_resolved_module(a, dep, c);
    assert_eq!(graph.get_module(dep), Some(c));
    assert_eq!(graph.incoming_connections(b).count(), 0);
    assert_eq!(graph.outgoing_connections(a).count(), 1);
    assert!(graph.remove_connection(dep).is_some());
    assert!(graph.remove_connection(dep).is_none());
  }

  #[test]
  fn clone_attributes_copies_exports_and_async() {
    let mut graph = ModuleGraph::default();
    let (a, b) = (ModuleIdx::from_usize(0), ModuleIdx::from_usize(1));
    graph.exports_info_mut(a).provide("x");
    graph.set_async(a, true);
    graph.module_graph_module_mut(a).depth = Some(2);

    graph.clone_module_attributes(a, b);
    assert!(graph.is_async(b));
    assert_eq!(graph.module_graph_module(b).and_then(|m| m.depth), Some(2));
    assert!(graph.exports_info(b).is_some_and(|e| e.export_info("x").is_some()));
  }
}
