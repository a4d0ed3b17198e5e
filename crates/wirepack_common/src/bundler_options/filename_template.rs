/// Output filename with optional `[name]` and `[hash]` placeholders, e.g.
/// `main.js` or `[name]-[hash].js`.
#[derive(Debug, Clone)]
pub struct FilenameTemplate(String);

impl FilenameTemplate {
  pub fn new(template: impl Into<String>) -> Self {
    Self(template.into())
  }

  pub fn has_hash(&self) -> bool {
    self.0.contains("[hash]")
  }

  pub fn render(&self, name: &str, hash: Option<&str>) -> String {
    let mut filename = self.0.replace("[name]", name);
    if let Some(hash) = hash {
      filename = filename.replace("[hash]", hash);
    }
    filename
  }
}

impl From<String> for FilenameTemplate {
  fn from(template: String) -> Self {
    Self::new(template)
  }
}

#[test]
fn test_render() {
  let template = FilenameTemplate::new("[name]-[hash].js");
  assert!(template.has_hash());
  assert_eq!(template.render("main", Some("abc123")), "main-abc123.js");

  let plain = FilenameTemplate::new("main.js");
  assert!(!plain.has_hash());
  assert_eq!(plain.render("main", None), "main.js");
}
