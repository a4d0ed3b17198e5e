use std::path::Path;

use sugar_path::SugarPath;

pub trait PathExt {
  fn expect_to_str(&self) -> &str;

  fn expect_to_slash(&self) -> String;

  /// The stable, slash-separated form of this path relative to `cwd`; used
  /// as the module key inside emitted bundles so output does not depend on
  /// the machine's absolute paths.
  fn stabilize(&self, cwd: &Path) -> String;
}

impl PathExt for Path {
  fn expect_to_str(&self) -> &str {
    self.to_str().unwrap_or_else(|| {
      panic!("Failed to convert {:?} to valid utf8 str", self.display());
    })
  }

  fn expect_to_slash(&self) -> String {
    self
      .to_slash()
      .unwrap_or_else(|| panic!("Failed to convert {:?} to slash str", self.display()))
      .into_owned()
  }

  fn stabilize(&self, cwd: &Path) -> String {
    if self.is_absolute() {
      self.relative(cwd).as_path().to_slash_lossy().into_owned()
    } else {
      self.expect_to_slash()
    }
  }
}

#[test]
fn test_stabilize() {
  let cwd = Path::new("/app");
  assert_eq!(Path::new("/app/src/index.js").stabilize(cwd), "src/index.js");
  assert_eq!(Path::new("src/index.js").stabilize(cwd), "src/index.js");
  assert_eq!(Path::new("/elsewhere/a.js").stabilize(cwd), "../elsewhere/a.js");
}
