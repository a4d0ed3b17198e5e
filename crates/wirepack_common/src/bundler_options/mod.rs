pub mod filename_template;
pub mod input_item;
pub mod module_rule;
pub mod normalized_bundler_options;

use std::path::PathBuf;

use serde::Deserialize;

use crate::{InputItem, ModuleRule};

/// The raw configuration surface. Every field is optional; defaults are
/// applied by `normalize_options` in the core crate, so this struct can be
/// deserialized straight from a `wirepack.config.json` mirroring the webpack
/// option names.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BundlerOptions {
  // --- Input
  pub entry: Option<Vec<InputItem>>,
  pub cwd: Option<PathBuf>,

  // --- Output
  pub output: Option<OutputOptions>,

  // --- Transforms
  pub module: Option<ModuleOptions>,

  // --- Resolve
  pub resolve: Option<ResolveOptions>,

  // --- Plugins
  pub plugins: Option<Vec<PluginOptions>>,

  // --- Dev server
  pub dev_server: Option<DevServerOptions>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputOptions {
  pub filename: Option<String>,
  pub path: Option<PathBuf>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModuleOptions {
  pub rules: Vec<ModuleRule>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolveOptions {
  pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PluginOptions {
  /// `{ "html": { "template": "public/index.html" } }`
  Html(HtmlPluginOptions),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlPluginOptions {
  pub template: PathBuf,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevServerOptions {
  #[serde(rename = "static")]
  pub static_dir: Option<StaticDirOptions>,
  pub port: Option<u16>,
  pub host: Option<String>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticDirOptions {
  pub directory: Option<PathBuf>,
}

#[test]
fn deserializes_webpack_shaped_config() {
  let config: BundlerOptions = serde_json::from_str(
    r#"{
      "entry": ["./src/index.js"],
      "output": { "filename": "main.js", "path": "build" },
      "plugins": [{ "html": { "template": "public/index.html" } }],
      "devServer": { "static": { "directory": "build" }, "port": 3000 },
      "module": {
        "rules": [{ "test": "**/*.{js,jsx}", "exclude": "**/node_modules/**", "use": ["babel-loader"] }]
      },
      "resolve": { "extensions": ["*", ".js", ".jsx"] }
    }"#,
  )
  .unwrap();

  assert_eq!(config.entry.as_deref().unwrap()[0].import, "./src/index.js");
  assert_eq!(config.dev_server.unwrap().port, Some(3000));
  assert_eq!(config.module.unwrap().rules[0].transforms, ["babel-loader"]);
  let Some(PluginOptions::Html(html)) = config.plugins.as_deref().unwrap().first() else {
    panic!("expected html plugin");
  };
  assert_eq!(html.template, PathBuf::from("public/index.html"));
}
