use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use sugar_path::SugarPath;

use wirepack_error::{BuildError, BuildResult};
use wirepack_fs::{FileSystem, OsFileSystem};
use wirepack_utils::path_ext::PathExt;

/// Outcome of resolving one specifier.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolution {
  /// Absolute path of a file that will become a graph node.
  Path(ArcStr),
  /// Bare specifier or excluded-directory hit. Left to the runtime loader
  /// stub; never inlined into the bundle.
  External(ArcStr),
}

#[derive(Debug)]
pub struct Resolver<F: FileSystem = OsFileSystem> {
  cwd: PathBuf,
  /// Tried in order after the verbatim candidate; first match wins. Each
  /// entry includes its leading dot (`.js`).
  extensions: Vec<String>,
  /// Directory names whose contents are never resolved into the graph.
  excluded_dirs: Vec<String>,
  fs: F,
}

impl<F: FileSystem> Resolver<F> {
  pub fn new(cwd: PathBuf, extensions: Vec<String>, excluded_dirs: Vec<String>, fs: F) -> Self {
    Self { cwd, extensions, excluded_dirs, fs }
  }

  pub fn cwd(&self) -> &Path {
    &self.cwd
  }

  /// Resolves `specifier` relative to the directory of `importer` (or the
  /// cwd for entries). Purely a function of the filesystem contents, so
  /// repeated calls in any order return the same result.
  pub fn resolve(&self, specifier: &str, importer: Option<&Path>) -> BuildResult<Resolution> {
    if !is_path_like(specifier) {
      return Ok(Resolution::External(specifier.into()));
    }

    let base_dir = importer
      .and_then(Path::parent)
      .filter(|parent| parent.components().next().is_some())
      .unwrap_or(self.cwd.as_path());

    let candidate = base_dir.join(specifier).absolutize_with(&self.cwd);

    if self.is_excluded(&candidate) {
      return Ok(Resolution::External(specifier.into()));
    }

    if let Some(path) = self.try_file(&candidate) {
      return Ok(Resolution::Path(path));
    }

    // `./util` -> `./util.js` before `./util/index.js`: the extension pass
    // runs to completion before the directory-index fallback is considered.
    for ext in &self.extensions {
      if let Some(path) = self.try_file(&append_extension(&candidate, ext)) {
        return Ok(Resolution::Path(path));
      }
    }

    if self.fs.is_dir(&candidate) {
      for ext in &self.extensions {
        if let Some(path) = self.try_file(&candidate.join(format!("index{ext}"))) {
          return Ok(Resolution::Path(path));
        }
      }
    }

    let importer = importer.map_or_else(|| self.cwd.expect_to_slash(), PathExt::expect_to_slash);
    Err(BuildError::resolution(specifier, importer))
  }

  fn try_file(&self, candidate: &Path) -> Option<ArcStr> {
    self.fs.is_file(candidate).then(|| candidate.expect_to_slash().into())
  }

  fn is_excluded(&self, candidate: &Path) -> bool {
    candidate.components().any(|component| {
      component.as_os_str().to_str().is_some_and(|name| {
        self.excluded_dirs.iter().any(|excluded| excluded == name)
      })
    })
  }
}

fn is_path_like(specifier: &str) -> bool {
  specifier.starts_with("./") || specifier.starts_with("../") || specifier.starts_with('/')
}

fn append_extension(candidate: &Path, ext: &str) -> PathBuf {
  let mut raw = candidate.as_os_str().to_os_string();
  raw.push(ext);
  PathBuf::from(raw)
}

#[cfg(test)]
mod tests {
  use wirepack_fs::MemoryFileSystem;

  use super::*;

  fn resolver(files: &[&str]) -> Resolver<MemoryFileSystem> {
    let fs = MemoryFileSystem::new(files.iter().map(|path| (*path, "")));
    Resolver::new(
      PathBuf::from("/app"),
      vec![".js".to_string(), ".jsx".to_string()],
      vec!["node_modules".to_string()],
      fs,
    )
  }

  #[test]
  fn verbatim_before_extensions() {
    let resolver = resolver(&["/app/src/a.js", "/app/src/a.js.js"]);
    let resolved = resolver.resolve("./a.js", Some(Path::new("/app/src/index.js"))).unwrap();
    assert_eq!(resolved, Resolution::Path("/app/src/a.js".into()));
  }

  #[test]
  fn extension_match_precedes_directory_index() {
    let resolver = resolver(&["/app/src/util.js", "/app/src/util/index.js"]);
    let resolved = resolver.resolve("./util", Some(Path::new("/app/src/index.js"))).unwrap();
    assert_eq!(resolved, Resolution::Path("/app/src/util.js".into()));
  }

  #[test]
  fn directory_index_fallback() {
    let resolver = resolver(&["/app/src/util/index.jsx"]);
    let resolved = resolver.resolve("./util", Some(Path::new("/app/src/index.js"))).unwrap();
    assert_eq!(resolved, Resolution::Path("/app/src/util/index.jsx".into()));
  }

  #[test]
  fn bare_specifier_is_external() {
    let resolver = resolver(&[]);
    let resolved = resolver.resolve("react", Some(Path::new("/app/src/index.js"))).unwrap();
    assert_eq!(resolved, Resolution::External("react".into()));
  }

  #[test]
  fn excluded_directory_is_external_even_when_present() {
    let resolver = resolver(&["/app/node_modules/react/index.js"]);
    let resolved = resolver
      .resolve("../node_modules/react/index.js", Some(Path::new("/app/src/index.js")))
      .unwrap();
    assert_eq!(resolved, Resolution::External("../node_modules/react/index.js".into()));
  }

  #[test]
  fn missing_file_is_resolution_error() {
    let resolver = resolver(&["/app/src/index.js"]);
    let err = resolver.resolve("./missing", Some(Path::new("/app/src/index.js"))).unwrap_err();
    assert!(err.to_string().contains("./missing"));
  }

  #[test]
  fn resolution_is_idempotent_across_call_order() {
    let resolver = resolver(&["/app/src/util.js", "/app/src/util/index.js", "/app/src/a.js"]);
    let importer = Path::new("/app/src/index.js");

    let first = resolver.resolve("./util", Some(importer)).unwrap();
    let _ = resolver.resolve("./a", Some(importer)).unwrap();
    let second = resolver.resolve("./util", Some(importer)).unwrap();
    assert_eq!(first, second);
  }
}
