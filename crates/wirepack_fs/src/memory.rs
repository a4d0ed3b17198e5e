use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use sugar_path::SugarPath;

use crate::FileSystem;

/// An in-memory filesystem. Directories exist implicitly as ancestors of
/// stored files, plus whatever `create_dir_all` was called with.
///
/// Cloning is cheap and shares the underlying storage, so a clone handed to a
/// bundler observes writes made through the original.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
  files: Arc<DashMap<PathBuf, Vec<u8>>>,
  dirs: Arc<DashSet<PathBuf>>,
}

impl MemoryFileSystem {
  pub fn new<P: AsRef<Path>, C: AsRef<[u8]>>(files: impl IntoIterator<Item = (P, C)>) -> Self {
    let fs = Self::default();
    for (path, content) in files {
      fs.add_file(path.as_ref(), content.as_ref());
    }
    fs
  }

  pub fn add_file(&self, path: &Path, content: &[u8]) {
    self.files.insert(path.normalize(), content.to_vec());
  }

  pub fn remove_file(&self, path: &Path) {
    self.files.remove(&path.normalize());
  }
}

fn not_found(path: &Path) -> io::Error {
  io::Error::new(io::ErrorKind::NotFound, format!("No such file: {}", path.display()))
}

impl FileSystem for MemoryFileSystem {
  fn read_to_string(&self, path: &Path) -> io::Result<String> {
    let content = self.read(path)?;
    String::from_utf8(content)
      .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    self.files.get(&path.normalize()).map(|entry| entry.clone()).ok_or_else(|| not_found(path))
  }

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
    self.add_file(path, content);
    Ok(())
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    self.dirs.insert(path.normalize());
    Ok(())
  }

  fn exists(&self, path: &Path) -> bool {
    self.is_file(path) || self.is_dir(path)
  }

  fn is_file(&self, path: &Path) -> bool {
    self.files.contains_key(&path.normalize())
  }

  fn is_dir(&self, path: &Path) -> bool {
    let path = path.normalize();
    self.dirs.contains(&path)
      || self.files.iter().any(|entry| entry.key().ancestors().skip(1).any(|dir| dir == path))
  }
}

#[test]
fn implied_directories_are_visible() {
  let fs = MemoryFileSystem::new([("/app/src/util/index.js", "module.exports = 1;")]);

  assert!(fs.is_file(Path::new("/app/src/util/index.js")));
  assert!(fs.is_dir(Path::new("/app/src/util")));
  assert!(fs.is_dir(Path::new("/app/src")));
  assert!(!fs.is_dir(Path::new("/app/src/util/index.js")));
  assert!(!fs.is_file(Path::new("/app/src/missing.js")));
}

#[test]
fn clones_share_storage() {
  let fs = MemoryFileSystem::default();
  let clone = fs.clone();
  clone.write(Path::new("/out/main.js"), b"x").unwrap();

  assert_eq!(fs.read_to_string(Path::new("/out/main.js")).unwrap(), "x");
}
