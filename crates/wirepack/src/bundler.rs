use std::sync::Arc;
use std::time::Instant;

use wirepack_common::{BundlerOptions, OutputAsset};
use wirepack_error::{BuildError, BuildResult};
use wirepack_fs::{FileSystem, OsFileSystem};
use wirepack_resolver::Resolver;
use wirepack_transform::{TransformPipeline, TransformRegistry};

use crate::emit_stage::EmitStage;
use crate::graph_stage::GraphStage;
use crate::html_stage::HtmlStage;
use crate::types::bundle_output::BundleOutput;
use crate::types::{SharedOptions, SharedResolver};
use crate::utils::normalize_options::normalize_options;

pub struct Bundler<F: FileSystem + Clone = OsFileSystem> {
  pub closed: bool,
  fs: F,
  options: SharedOptions,
  resolver: SharedResolver<F>,
  pipeline: TransformPipeline,
}

impl Bundler<OsFileSystem> {
  pub fn new(options: BundlerOptions) -> BuildResult<Self> {
    Self::with_file_system(options, OsFileSystem)
  }
}

impl<F: FileSystem + Clone> Bundler<F> {
  pub fn with_file_system(options: BundlerOptions, fs: F) -> BuildResult<Self> {
    Self::with_transform_registry(options, fs, TransformRegistry::with_builtins())
  }

  /// Entry point for callers that register their own transforms on top of
  /// the built-in set.
  pub fn with_transform_registry(
    options: BundlerOptions,
    fs: F,
    registry: TransformRegistry,
  ) -> BuildResult<Self> {
    let options = normalize_options(options);
    let pipeline = TransformPipeline::new(&options.rules, &registry)?;

    let resolver: SharedResolver<F> = Resolver::new(
      options.cwd.clone(),
      options.extensions.clone(),
      vec!["node_modules".to_string()],
      fs.clone(),
    )
    .into();

    Ok(Self { closed: false, fs, options: Arc::new(options), resolver, pipeline })
  }

  pub fn options(&self) -> &SharedOptions {
    &self.options
  }

  pub fn file_system(&self) -> &F {
    &self.fs
  }

  /// Builds the bundle in memory without touching the output directory.
  pub fn generate(&mut self) -> BuildResult<BundleOutput> {
    self.build(false)
  }

  /// Builds the bundle and writes every asset to the output directory.
  pub fn write(&mut self) -> BuildResult<BundleOutput> {
    self.build(true)
  }

  pub fn close(&mut self) {
    self.closed = true;
  }

  fn build(&mut self, is_write: bool) -> BuildResult<BundleOutput> {
    if self.closed {
      Err(anyhow::anyhow!("Bundler is already closed"))?;
    }

    let start = Instant::now();

    let graph =
      GraphStage::new(&self.fs, &self.options, &self.resolver, &self.pipeline).build()?;

    let mut warnings = Vec::new();
    let mut assets = EmitStage::new(&graph, &self.options).render(&mut warnings);

    if let Some(html) = HtmlStage::new(&self.fs, &self.options).render(&assets)? {
      assets.push(html);
    }

    // Every asset is fully rendered before the first write, so a failing
    // build never leaves a partial artifact on disk.
    if is_write {
      self.write_assets(&assets)?;
    }

    tracing::info!(
      modules = graph.len(),
      assets = assets.len(),
      elapsed = ?start.elapsed(),
      "build finished"
    );

    Ok(BundleOutput { assets, warnings })
  }

  fn write_assets(&self, assets: &[OutputAsset]) -> BuildResult<()> {
    let out_dir = self.options.out_dir();
    self.fs.create_dir_all(&out_dir).map_err(|err| BuildError::emit(&out_dir, err))?;

    for asset in assets {
      let path = out_dir.join(&asset.filename);
      self.fs.write(&path, asset.content.as_bytes()).map_err(|err| BuildError::emit(&path, err))?;
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use wirepack_common::{ModuleOptions, ModuleRule, OutputOptions};
  use wirepack_fs::MemoryFileSystem;

  use super::*;

  fn bundler(files: &[(&str, &str)]) -> Bundler<MemoryFileSystem> {
    bundler_with(files, BundlerOptions::default())
  }

  fn bundler_with(files: &[(&str, &str)], mut options: BundlerOptions) -> Bundler<MemoryFileSystem> {
    let fs = MemoryFileSystem::new(files.iter().copied());
    options.cwd = Some("/app".into());
    Bundler::with_file_system(options, fs).unwrap()
  }

  #[test]
  fn shared_dependency_is_bundled_once() {
    let mut bundler = bundler(&[
      ("/app/src/index.js", "require('./a'); require('./shared');"),
      ("/app/src/a.js", "require('./shared');"),
      ("/app/src/shared.js", "module.exports = 1;"),
    ]);

    let output = bundler.generate().unwrap();
    let bundle = &output.assets[0].content;

    assert_eq!(output.assets.len(), 1);
    assert_eq!(bundle.matches("\"src/shared.js\": [function").count(), 1);
    // Single evaluation comes from the prelude cache
    assert!(bundle.contains("cache[id] = module;"));
  }

  #[test]
  fn rebuild_of_unchanged_input_is_byte_identical() {
    let files: &[(&str, &str)] = &[
      ("/app/src/index.js", "require('./b'); require('./a');"),
      ("/app/src/a.js", "module.exports = 'a';"),
      ("/app/src/b.js", "module.exports = 'b';"),
    ];

    let first = bundler(files).generate().unwrap();
    let second = bundler(files).generate().unwrap();
    assert_eq!(first.assets[0].content, second.assets[0].content);
  }

  #[test]
  fn cycle_completes_with_warning() {
    let mut bundler = bundler(&[
      ("/app/src/index.js", "require('./a');"),
      ("/app/src/a.js", "require('./b');"),
      ("/app/src/b.js", "require('./a');"),
    ]);

    let output = bundler.generate().unwrap();
    let bundle = &output.assets[0].content;

    assert_eq!(bundle.matches("\"src/a.js\": [function").count(), 1);
    assert_eq!(bundle.matches("\"src/b.js\": [function").count(), 1);
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(
      output.warnings[0].to_string(),
      "Circular dependency: src/a.js -> src/b.js -> src/a.js."
    );
  }

  #[test]
  fn transform_failure_reports_the_import_chain() {
    let options = BundlerOptions {
      entry: Some(vec!["./src/entry.js".into()]),
      module: Some(ModuleOptions {
        rules: vec![ModuleRule {
          test: Some("**/broken.js".to_string()),
          exclude: None,
          transforms: vec!["json".to_string()],
        }],
      }),
      ..BundlerOptions::default()
    };

    let mut bundler = bundler_with(
      &[
        ("/app/src/entry.js", "require('./a');"),
        ("/app/src/a.js", "require('./broken.js');"),
        ("/app/src/broken.js", "{ not json"),
      ],
      options,
    );

    let err = bundler.generate().unwrap_err();
    assert!(err.to_string().contains("src/entry.js -> src/a.js -> src/broken.js"));
  }

  #[test]
  fn bare_import_becomes_external_runtime_lookup() {
    let mut bundler = bundler(&[("/app/src/index.js", "const react = require('react');")]);

    let output = bundler.generate().unwrap();
    let bundle = &output.assets[0].content;

    assert!(bundle.contains("{\"react\":null}"));
    assert!(bundle.contains("loadExternal"));
  }

  #[test]
  fn missing_dependency_fails_the_build() {
    let mut bundler = bundler(&[("/app/src/index.js", "require('./missing');")]);

    let err = bundler.generate().unwrap_err();
    assert!(err.to_string().contains("./missing"));
  }

  #[test]
  fn hashed_filename_substitutes_content_hash() {
    let options = BundlerOptions {
      output: Some(OutputOptions {
        filename: Some("[name]-[hash].js".to_string()),
        path: None,
      }),
      ..BundlerOptions::default()
    };

    let mut bundler =
      bundler_with(&[("/app/src/index.js", "module.exports = 1;")], options);

    let output = bundler.generate().unwrap();
    let asset = &output.assets[0];
    let hash = asset.hash.as_deref().unwrap();

    assert_eq!(asset.filename, format!("main-{hash}.js"));
    assert_eq!(hash.len(), 8);
  }

  #[test]
  fn write_places_assets_in_the_output_directory() {
    let mut bundler = bundler(&[("/app/src/index.js", "module.exports = 1;")]);
    bundler.write().unwrap();

    let written = bundler.file_system().read_to_string(Path::new("/app/dist/main.js")).unwrap();
    assert!(written.contains("\"src/index.js\": [function"));
  }

  #[test]
  fn html_template_gets_script_injection() {
    let options = BundlerOptions {
      plugins: Some(vec![wirepack_common::PluginOptions::Html(
        wirepack_common::HtmlPluginOptions { template: "public/index.html".into() },
      )]),
      ..BundlerOptions::default()
    };

    let mut bundler = bundler_with(
      &[
        ("/app/src/index.js", "module.exports = 1;"),
        ("/app/public/index.html", "<html><body></body></html>"),
      ],
      options,
    );

    let output = bundler.generate().unwrap();
    let html = output.assets.iter().find(|asset| asset.filename == "index.html").unwrap();
    assert!(html.content.contains("<script defer src=\"main.js\"></script>\n</body>"));
  }

  #[test]
  fn closed_bundler_refuses_to_build() {
    let mut bundler = bundler(&[("/app/src/index.js", "module.exports = 1;")]);
    bundler.close();
    assert!(bundler.generate().is_err());
  }
}
