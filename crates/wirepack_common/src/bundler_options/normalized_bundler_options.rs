use std::path::{Path, PathBuf};

use crate::{FilenameTemplate, InputItem, ModuleRule};

#[derive(Debug)]
pub struct NormalizedBundlerOptions {
  // --- Input
  pub entry: Vec<InputItem>,
  pub cwd: PathBuf,

  // --- Output
  pub filename: FilenameTemplate,
  pub dir: PathBuf,

  // --- Transforms
  pub rules: Vec<ModuleRule>,

  // --- Resolve
  pub extensions: Vec<String>,

  // --- Plugins
  pub html_template: Option<PathBuf>,

  // --- Dev server
  pub port: u16,
  pub host: String,
  pub static_dir: Option<PathBuf>,
}

impl NormalizedBundlerOptions {
  /// The absolute output directory.
  pub fn out_dir(&self) -> PathBuf {
    self.resolve_against_cwd(&self.dir)
  }

  pub fn resolve_against_cwd(&self, path: &Path) -> PathBuf {
    if path.is_absolute() { path.to_path_buf() } else { self.cwd.join(path) }
  }
}
