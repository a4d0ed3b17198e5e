use arcstr::ArcStr;

use crate::{ImportKind, ModuleId, ModuleIdx};

/// One dependency specifier as written in the source.
#[derive(Debug, Clone)]
pub struct DependencyRequest {
  pub specifier: ArcStr,
  pub kind: ImportKind,
}

/// Where a dependency specifier ended up after resolution.
#[derive(Debug, Clone)]
pub enum ResolvedDep {
  Module(ModuleIdx),
  /// Bare specifier or excluded-directory hit; satisfied by the runtime
  /// loader stub instead of being inlined.
  External(ArcStr),
}

/// A fully loaded module: resolved path, transformed source and resolved
/// dependency edges. Created once per resolved path during graph
/// construction and immutable afterwards.
#[derive(Debug)]
pub struct Module {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  /// Slash-separated path relative to cwd; the key used in emitted bundles.
  pub stable_id: String,
  pub raw_source: String,
  pub source: String,
  pub dependencies: Vec<DependencyRequest>,
  /// Parallel to `dependencies`.
  pub resolved_deps: Vec<ResolvedDep>,
  pub importers: Vec<ModuleIdx>,
}

impl Module {
  /// Statically imported module indices, in source order. Dynamic imports
  /// are edges too, but do not constrain execution order.
  pub fn static_dep_indices(&self) -> impl DoubleEndedIterator<Item = ModuleIdx> + '_ {
    self.dependencies.iter().zip(&self.resolved_deps).filter_map(|(request, resolved)| {
      match resolved {
        ResolvedDep::Module(idx) if request.kind.is_static() => Some(*idx),
        _ => None,
      }
    })
  }

  pub fn dep_indices(&self) -> impl Iterator<Item = ModuleIdx> + '_ {
    self.resolved_deps.iter().filter_map(|resolved| match resolved {
      ResolvedDep::Module(idx) => Some(*idx),
      ResolvedDep::External(_) => None,
    })
  }
}
