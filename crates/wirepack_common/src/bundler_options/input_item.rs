use std::borrow::Cow;

use serde::Deserialize;

/// One entry point. Deserializes from either a plain specifier string or a
/// `{ "name": ..., "import": ... }` object.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(from = "RawInputItem")]
pub struct InputItem {
  pub name: Option<String>,
  pub import: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInputItem {
  Import(String),
  Named { name: Option<String>, import: String },
}

impl From<RawInputItem> for InputItem {
  fn from(raw: RawInputItem) -> Self {
    match raw {
      RawInputItem::Import(import) => Self { name: None, import },
      RawInputItem::Named { name, import } => Self { name, import },
    }
  }
}

impl From<&str> for InputItem {
  fn from(value: &str) -> Self {
    Self { name: None, import: value.to_string() }
  }
}

impl From<Cow<'_, str>> for InputItem {
  fn from(value: Cow<'_, str>) -> Self {
    Self { name: None, import: value.to_string() }
  }
}
