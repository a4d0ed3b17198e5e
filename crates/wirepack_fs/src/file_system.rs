use std::io;
use std::path::Path;

/// The filesystem surface the bundler needs. Kept synchronous so it can sit
/// behind generics in the resolver and graph stage without an async runtime.
pub trait FileSystem: Send + Sync {
  fn read_to_string(&self, path: &Path) -> io::Result<String>;

  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

  fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

  fn create_dir_all(&self, path: &Path) -> io::Result<()>;

  fn exists(&self, path: &Path) -> bool;

  fn is_file(&self, path: &Path) -> bool;

  fn is_dir(&self, path: &Path) -> bool;
}
