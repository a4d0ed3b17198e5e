use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum BuildErrorKind {
  #[error("Cannot resolve '{specifier}' from '{importer}'")]
  Resolution { specifier: String, importer: String },

  #[error("Transform '{rule}' failed on {path}:{line}:{column}: {message}")]
  Transform { rule: String, path: String, line: usize, column: usize, message: String },

  #[error("HTML template not found: {}", path.display())]
  Template { path: PathBuf },

  #[error("Failed to emit {}: {source}", path.display())]
  Emit {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Any(#[from] anyhow::Error),
}

/// A fatal error of a single build attempt.
///
/// Carries the import chain from an entry down to the failing module, so a
/// failure deep in the graph reports `entry.js -> a.js -> broken.js` instead
/// of only the leaf.
#[derive(Debug)]
pub struct BuildError {
  kind: BuildErrorKind,
  chain: Vec<String>,
}

pub type BuildResult<T> = Result<T, BuildError>;

impl BuildError {
  pub fn resolution(specifier: impl Into<String>, importer: impl Into<String>) -> Self {
    BuildErrorKind::Resolution { specifier: specifier.into(), importer: importer.into() }.into()
  }

  pub fn transform(
    rule: impl Into<String>,
    path: impl Into<String>,
    line: usize,
    column: usize,
    message: impl Into<String>,
  ) -> Self {
    BuildErrorKind::Transform {
      rule: rule.into(),
      path: path.into(),
      line,
      column,
      message: message.into(),
    }
    .into()
  }

  pub fn template(path: impl Into<PathBuf>) -> Self {
    BuildErrorKind::Template { path: path.into() }.into()
  }

  pub fn emit(path: impl AsRef<Path>, source: std::io::Error) -> Self {
    BuildErrorKind::Emit { path: path.as_ref().to_path_buf(), source }.into()
  }

  pub fn kind(&self) -> &BuildErrorKind {
    &self.kind
  }

  /// Prepends `importer` to the recorded import chain. Called at each level
  /// while an error propagates from a dependency back towards its entry.
  pub fn with_link(mut self, importer: impl Into<String>) -> Self {
    self.chain.insert(0, importer.into());
    self
  }

  pub fn chain(&self) -> &[String] {
    &self.chain
  }
}

impl fmt::Display for BuildError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.chain.is_empty() {
      write!(f, "{}", self.kind)
    } else {
      write!(f, "{} (import chain: {})", self.kind, self.chain.join(" -> "))
    }
  }
}

impl std::error::Error for BuildError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    self.kind.source()
  }
}

impl From<BuildErrorKind> for BuildError {
  fn from(kind: BuildErrorKind) -> Self {
    Self { kind, chain: Vec::new() }
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    BuildErrorKind::Any(error).into()
  }
}

#[test]
fn display_renders_import_chain() {
  let err = BuildError::transform("json", "broken.js", 1, 5, "expected value")
    .with_link("a.js")
    .with_link("entry.js");

  let rendered = err.to_string();
  assert!(rendered.contains("broken.js:1:5"));
  assert!(rendered.contains("entry.js -> a.js"));
}

#[test]
fn display_without_chain_is_single_line() {
  let err = BuildError::resolution("./missing", "src/index.js");
  assert_eq!(err.to_string(), "Cannot resolve './missing' from 'src/index.js'");
}
