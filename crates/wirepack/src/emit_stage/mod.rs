mod runtime;
mod sort_modules;

use wirepack_common::{ModuleGraph, OutputAsset};
use wirepack_utils::xxhash::xxhash_hex;

use crate::types::SharedOptions;

use self::sort_modules::sort_modules;

/// Turns a finished module graph into output assets. Pure: reads the graph
/// and options, never touches the filesystem.
pub struct EmitStage<'a> {
  graph: &'a ModuleGraph,
  options: &'a SharedOptions,
}

impl<'a> EmitStage<'a> {
  pub fn new(graph: &'a ModuleGraph, options: &'a SharedOptions) -> Self {
    Self { graph, options }
  }

  pub fn render(&self, warnings: &mut Vec<anyhow::Error>) -> Vec<OutputAsset> {
    let order = sort_modules(self.graph, warnings);
    let content = runtime::render_bundle(self.graph, &order);

    let name = self
      .graph
      .entries
      .first()
      .and_then(|entry| entry.name.as_deref())
      .unwrap_or("main");
    let hash = self.options.filename.has_hash().then(|| xxhash_hex(content.as_bytes()));
    let filename = self.options.filename.render(name, hash.as_deref());

    tracing::debug!(filename, modules = order.len(), "bundle rendered");

    vec![OutputAsset { filename, content, hash }]
  }
}
