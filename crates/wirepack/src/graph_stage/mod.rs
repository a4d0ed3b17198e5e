pub mod scan_imports;

use std::collections::VecDeque;
use std::path::Path;

use arcstr::ArcStr;

use wirepack_common::{
  DependencyRequest, EntryPoint, Module, ModuleGraph, ModuleId, ModuleIdx, ResolvedDep,
};
use wirepack_error::{BuildError, BuildResult};
use wirepack_fs::FileSystem;
use wirepack_resolver::{Resolution, Resolver};
use wirepack_transform::TransformPipeline;
use wirepack_utils::indexmap::{FxIndexMap, FxIndexSet};
use wirepack_utils::path_ext::PathExt;

use crate::types::SharedOptions;
use self::scan_imports::scan_imports;

/// Builds the module graph with a worklist traversal: entries seed the list,
/// every popped module is read, transformed and scanned, and each resolved
/// dependency is enqueued unless its path was already discovered. The
/// visited map makes cycles terminate without any further bookkeeping.
pub struct GraphStage<'a, F: FileSystem> {
  fs: &'a F,
  options: &'a SharedOptions,
  resolver: &'a Resolver<F>,
  pipeline: &'a TransformPipeline,
}

struct GraphBuilder {
  paths: FxIndexMap<ArcStr, ModuleIdx>,
  stable_ids: Vec<String>,
  /// First importer of each module; `None` for entries. Used to report the
  /// dependency chain when a module deep in the graph fails.
  importer_of: Vec<Option<ModuleIdx>>,
  modules: Vec<Option<Module>>,
  externals: FxIndexSet<ArcStr>,
  worklist: VecDeque<ModuleIdx>,
}

impl GraphBuilder {
  fn ensure_module(&mut self, path: ArcStr, cwd: &Path, importer: Option<ModuleIdx>) -> ModuleIdx {
    if let Some(idx) = self.paths.get(&path) {
      return *idx;
    }

    let idx = ModuleIdx::new(self.modules.len());
    self.stable_ids.push(Path::new(path.as_str()).stabilize(cwd));
    self.paths.insert(path, idx);
    self.importer_of.push(importer);
    self.modules.push(None);
    self.worklist.push_back(idx);
    idx
  }

  fn import_chain(&self, failing: ModuleIdx) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = Some(failing);
    while let Some(idx) = current {
      chain.push(self.stable_ids[idx.raw()].clone());
      current = self.importer_of[idx.raw()];
    }
    chain.reverse();
    chain
  }

  fn annotate(&self, mut error: BuildError, failing: ModuleIdx) -> BuildError {
    for link in self.import_chain(failing).into_iter().rev() {
      error = error.with_link(link);
    }
    error
  }
}

impl<'a, F: FileSystem> GraphStage<'a, F> {
  pub fn new(
    fs: &'a F,
    options: &'a SharedOptions,
    resolver: &'a Resolver<F>,
    pipeline: &'a TransformPipeline,
  ) -> Self {
    Self { fs, options, resolver, pipeline }
  }

  pub fn build(&mut self) -> BuildResult<ModuleGraph> {
    if self.options.entry.is_empty() {
      Err(anyhow::anyhow!("You must supply at least one entry"))?;
    }

    let mut builder = GraphBuilder {
      paths: FxIndexMap::default(),
      stable_ids: Vec::new(),
      importer_of: Vec::new(),
      modules: Vec::new(),
      externals: FxIndexSet::default(),
      worklist: VecDeque::new(),
    };

    let mut entries = Vec::with_capacity(self.options.entry.len());
    for input in &self.options.entry {
      match self.resolver.resolve(&input.import, None)? {
        Resolution::External(specifier) => {
          Err(anyhow::anyhow!(
            "Failed to resolve {:?} - entry can't be external",
            specifier.as_str()
          ))?;
        }
        Resolution::Path(path) => {
          let idx = builder.ensure_module(path, &self.options.cwd, None);
          entries.push(EntryPoint { idx, name: input.name.clone().map(ArcStr::from) });
        }
      }
    }

    while let Some(idx) = builder.worklist.pop_front() {
      self.process_module(&mut builder, idx).map_err(|err| builder.annotate(err, idx))?;
    }

    let mut modules: Vec<Module> = builder
      .modules
      .into_iter()
      .map(|module| module.expect("Worklist did not visit every discovered module"))
      .collect();

    for idx in 0..modules.len() {
      let deps: Vec<ModuleIdx> = modules[idx].dep_indices().collect();
      for dep in deps {
        modules[dep.raw()].importers.push(ModuleIdx::new(idx));
      }
    }

    tracing::debug!(
      modules = modules.len(),
      externals = builder.externals.len(),
      "module graph complete"
    );

    Ok(ModuleGraph { modules, paths: builder.paths, entries, externals: builder.externals })
  }

  fn process_module(&self, builder: &mut GraphBuilder, idx: ModuleIdx) -> BuildResult<()> {
    let (path, _) = builder.paths.get_index(idx.raw()).expect("Discovered path for index");
    let path = path.clone();
    let stable_id = builder.stable_ids[idx.raw()].clone();

    let raw_source = self
      .fs
      .read_to_string(Path::new(path.as_str()))
      .map_err(|err| anyhow::anyhow!("Failed to read {stable_id}: {err}"))?;

    let source = self.pipeline.transform(&stable_id, raw_source.clone())?;

    let dependencies = scan_imports(&source);
    let resolved_deps = self.resolve_dependencies(builder, &path, idx, &dependencies)?;

    builder.modules[idx.raw()] = Some(Module {
      idx,
      id: ModuleId::new(path),
      stable_id,
      raw_source,
      source,
      dependencies,
      resolved_deps,
      importers: Vec::new(),
    });

    Ok(())
  }

  fn resolve_dependencies(
    &self,
    builder: &mut GraphBuilder,
    importer_path: &ArcStr,
    importer_idx: ModuleIdx,
    dependencies: &[DependencyRequest],
  ) -> BuildResult<Vec<ResolvedDep>> {
    dependencies
      .iter()
      .map(|request| {
        let resolution =
          self.resolver.resolve(&request.specifier, Some(Path::new(importer_path.as_str())))?;

        Ok(match resolution {
          Resolution::Path(path) => {
            let idx = builder.ensure_module(path, &self.options.cwd, Some(importer_idx));
            ResolvedDep::Module(idx)
          }
          Resolution::External(specifier) => {
            builder.externals.insert(specifier.clone());
            ResolvedDep::External(specifier)
          }
        })
      })
      .collect()
  }
}
