use std::iter;

use rustc_hash::{FxHashMap, FxHashSet};

use wirepack_common::{ModuleGraph, ModuleIdx};

#[derive(PartialEq, Eq, Hash, Debug)]
enum Status {
  ToBeExecuted(ModuleIdx),
  WaitForExit(ModuleIdx),
}

/// Post-order DFS over static edges with an explicit stack. Entries are
/// visited first (in configuration order), then any module reachable only
/// through dynamic imports, in first-discovery order. The result is a
/// deterministic execution order: dependencies before dependents, and stable
/// across repeated builds of an unchanged graph.
pub fn sort_modules(graph: &ModuleGraph, warnings: &mut Vec<anyhow::Error>) -> Vec<ModuleIdx> {
  let mut execution_stack = graph
    .modules
    .iter()
    .map(|module| module.idx)
    .rev()
    .chain(graph.entries.iter().map(|entry| entry.idx).rev())
    .map(Status::ToBeExecuted)
    .collect::<Vec<_>>();

  let mut executed_ids = FxHashSet::default();
  let mut stack_indexes_of_executing_id = FxHashMap::default();

  let mut circular_dependencies = FxHashSet::default();
  let mut sorted_modules = Vec::with_capacity(graph.len());

  while let Some(status) = execution_stack.pop() {
    match status {
      Status::ToBeExecuted(id) => {
        if executed_ids.contains(&id) {
          if let Some(index) = stack_indexes_of_executing_id.get(&id).copied() {
            // Still executing, so this back edge closes a cycle
            let cycle = execution_stack[index..]
              .iter()
              .filter_map(|action| match action {
                Status::ToBeExecuted(_) => None,
                Status::WaitForExit(id) => Some(*id),
              })
              .chain(iter::once(id))
              .collect::<Box<[_]>>();
            circular_dependencies.insert(cycle);
          }
        } else {
          executed_ids.insert(id);
          execution_stack.push(Status::WaitForExit(id));
          stack_indexes_of_executing_id.insert(id, execution_stack.len() - 1);

          execution_stack
            .extend(graph[id].static_dep_indices().rev().map(Status::ToBeExecuted));
        }
      }
      Status::WaitForExit(id) => {
        sorted_modules.push(id);
        stack_indexes_of_executing_id.remove(&id);
      }
    }
  }

  for cycle in circular_dependencies {
    let paths =
      cycle.iter().map(|id| graph[*id].stable_id.as_str()).collect::<Vec<_>>();
    warnings.push(anyhow::anyhow!("Circular dependency: {}.", paths.join(" -> ")));
  }

  sorted_modules
}

#[cfg(test)]
mod tests {
  use arcstr::ArcStr;

  use wirepack_common::{
    DependencyRequest, EntryPoint, ImportKind, Module, ModuleGraph, ModuleId, ResolvedDep,
  };
  use wirepack_utils::indexmap::{FxIndexMap, FxIndexSet};

  use super::*;

  fn module(idx: usize, path: &str, deps: &[usize], kinds: &[ImportKind]) -> Module {
    Module {
      idx: ModuleIdx::new(idx),
      id: ModuleId::new(path),
      stable_id: path.trim_start_matches('/').to_string(),
      raw_source: String::new(),
      source: String::new(),
      dependencies: deps
        .iter()
        .zip(kinds)
        .map(|(_, kind)| DependencyRequest { specifier: ArcStr::from("./dep"), kind: *kind })
        .collect(),
      resolved_deps: deps.iter().map(|dep| ResolvedDep::Module(ModuleIdx::new(*dep))).collect(),
      importers: Vec::new(),
    }
  }

  fn graph(modules: Vec<Module>, entries: &[usize]) -> ModuleGraph {
    let mut paths = FxIndexMap::default();
    for module in &modules {
      paths.insert(ArcStr::from(module.id.as_ref()), module.idx);
    }
    ModuleGraph {
      modules,
      paths,
      entries: entries
        .iter()
        .map(|idx| EntryPoint { idx: ModuleIdx::new(*idx), name: None })
        .collect(),
      externals: FxIndexSet::default(),
    }
  }

  #[test]
  fn dependencies_execute_before_dependents() {
    use ImportKind::Import;
    // entry -> a -> shared, entry -> shared
    let graph = graph(
      vec![
        module(0, "/app/entry.js", &[1, 2], &[Import, Import]),
        module(1, "/app/a.js", &[2], &[Import]),
        module(2, "/app/shared.js", &[], &[]),
      ],
      &[0],
    );

    let mut warnings = Vec::new();
    let order = sort_modules(&graph, &mut warnings);

    assert!(warnings.is_empty());
    assert_eq!(order, [ModuleIdx::new(2), ModuleIdx::new(1), ModuleIdx::new(0)]);
  }

  #[test]
  fn cycles_complete_with_a_warning() {
    use ImportKind::Import;
    // entry -> a -> b -> a
    let graph = graph(
      vec![
        module(0, "/app/entry.js", &[1], &[Import]),
        module(1, "/app/a.js", &[2], &[Import]),
        module(2, "/app/b.js", &[1], &[Import]),
      ],
      &[0],
    );

    let mut warnings = Vec::new();
    let order = sort_modules(&graph, &mut warnings);

    assert_eq!(order.len(), 3);
    assert_eq!(warnings.len(), 1);
    assert_eq!(
      warnings[0].to_string(),
      "Circular dependency: app/a.js -> app/b.js -> app/a.js."
    );
  }

  #[test]
  fn dynamic_only_modules_sort_after_entry_subtrees() {
    let graph = graph(
      vec![
        module(0, "/app/entry.js", &[1], &[ImportKind::DynamicImport]),
        module(1, "/app/lazy.js", &[], &[]),
      ],
      &[0],
    );

    let mut warnings = Vec::new();
    let order = sort_modules(&graph, &mut warnings);

    // The dynamic edge does not constrain order; lazy.js is picked up by
    // the discovery-order sweep after the entry finishes.
    assert_eq!(order, [ModuleIdx::new(0), ModuleIdx::new(1)]);
  }
}
