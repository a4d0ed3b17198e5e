mod bundler_options;
mod module;
mod types;

pub use bundler_options::{
  BundlerOptions, DevServerOptions, HtmlPluginOptions, ModuleOptions, OutputOptions,
  PluginOptions, ResolveOptions, StaticDirOptions, filename_template::FilenameTemplate,
  input_item::InputItem, module_rule::ModuleRule,
  normalized_bundler_options::NormalizedBundlerOptions,
};

pub use crate::{
  module::{DependencyRequest, Module, ResolvedDep},
  types::{
    entry_point::EntryPoint,
    import_kind::ImportKind,
    module_graph::ModuleGraph,
    module_id::ModuleId,
    module_idx::ModuleIdx,
    output_asset::OutputAsset,
    source_joiner::SourceJoiner,
  },
};
