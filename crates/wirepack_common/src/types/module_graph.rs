use arcstr::ArcStr;

use wirepack_utils::indexmap::{FxIndexMap, FxIndexSet};

use crate::{EntryPoint, Module, ModuleIdx};

/// The directed module graph produced by the graph stage.
///
/// Invariant: every path reachable from an entry appears exactly once in
/// `modules`; `paths` maps each resolved path to its index and its insertion
/// order is the first-discovery order used as the deterministic tie-break
/// during emission. Edges may form cycles.
#[derive(Debug, Default)]
pub struct ModuleGraph {
  pub modules: Vec<Module>,
  pub paths: FxIndexMap<ArcStr, ModuleIdx>,
  pub entries: Vec<EntryPoint>,
  pub externals: FxIndexSet<ArcStr>,
}

impl ModuleGraph {
  pub fn module(&self, idx: ModuleIdx) -> &Module {
    &self.modules[idx.raw()]
  }

  pub fn module_mut(&mut self, idx: ModuleIdx) -> &mut Module {
    &mut self.modules[idx.raw()]
  }

  pub fn idx_of(&self, path: &str) -> Option<ModuleIdx> {
    self.paths.get(path).copied()
  }

  pub fn len(&self) -> usize {
    self.modules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.modules.is_empty()
  }
}

impl std::ops::Index<ModuleIdx> for ModuleGraph {
  type Output = Module;

  fn index(&self, idx: ModuleIdx) -> &Self::Output {
    self.module(idx)
  }
}
