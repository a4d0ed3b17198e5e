use wirepack_common::{BundlerOptions, NormalizedBundlerOptions, PluginOptions};

pub fn normalize_options(mut raw_options: BundlerOptions) -> NormalizedBundlerOptions {
  let output = raw_options.output.take().unwrap_or_default();
  let module = raw_options.module.take().unwrap_or_default();
  let resolve = raw_options.resolve.take().unwrap_or_default();
  let dev_server = raw_options.dev_server.take().unwrap_or_default();

  // Webpack's `"*"` extension entry means "try the specifier verbatim",
  // which the resolver always does first; it is not a real extension.
  let extensions = resolve
    .extensions
    .unwrap_or_else(|| vec![".js".to_string(), ".jsx".to_string()])
    .into_iter()
    .filter(|ext| ext != "*")
    .collect();

  let html_template = raw_options
    .plugins
    .unwrap_or_default()
    .into_iter()
    .map(|PluginOptions::Html(html)| html.template)
    .next();

  NormalizedBundlerOptions {
    entry: raw_options.entry.unwrap_or_else(|| vec!["./src/index.js".into()]),
    cwd: raw_options
      .cwd
      .unwrap_or_else(|| std::env::current_dir().expect("Failed to get current dir")),
    filename: output.filename.unwrap_or_else(|| "main.js".to_string()).into(),
    dir: output.path.unwrap_or_else(|| "dist".into()),
    rules: module.rules,
    extensions,
    html_template,
    port: dev_server.port.unwrap_or(3000),
    host: dev_server.host.unwrap_or_else(|| "127.0.0.1".to_string()),
    static_dir: dev_server.static_dir.and_then(|dir| dir.directory),
  }
}

#[test]
fn defaults_mirror_the_webpack_surface() {
  let options = normalize_options(BundlerOptions {
    cwd: Some("/app".into()),
    ..BundlerOptions::default()
  });

  assert_eq!(options.entry[0].import, "./src/index.js");
  assert_eq!(options.filename.render("main", None), "main.js");
  assert_eq!(options.dir, std::path::PathBuf::from("dist"));
  assert_eq!(options.extensions, [".js", ".jsx"]);
  assert_eq!(options.port, 3000);
}

#[test]
fn star_extension_is_dropped() {
  let options = normalize_options(BundlerOptions {
    cwd: Some("/app".into()),
    resolve: Some(wirepack_common::ResolveOptions {
      extensions: Some(vec!["*".to_string(), ".js".to_string(), ".jsx".to_string()]),
    }),
    ..BundlerOptions::default()
  });

  assert_eq!(options.extensions, [".js", ".jsx"]);
}
