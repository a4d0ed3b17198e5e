use std::sync::Arc;

use rustc_hash::FxHashMap;

use wirepack_error::{BuildError, BuildResult};

/// One per-file transform. The heavy lifting (parsing, codegen) lives in the
/// implementations; the bundler only sees source in, source out.
pub trait Transform: Send + Sync {
  fn name(&self) -> &str;

  fn apply(&self, path: &str, source: &str) -> BuildResult<String>;
}

/// Transforms addressable by the names used in `module.rules[].use`.
#[derive(Default)]
pub struct TransformRegistry {
  transforms: FxHashMap<String, Arc<dyn Transform>>,
}

impl TransformRegistry {
  pub fn with_builtins() -> Self {
    let mut registry = Self::default();
    registry.register(Arc::new(JsonTransform));
    registry
  }

  pub fn register(&mut self, transform: Arc<dyn Transform>) {
    self.transforms.insert(transform.name().to_string(), transform);
  }

  pub fn get(&self, name: &str) -> Option<Arc<dyn Transform>> {
    self.transforms.get(name).map(Arc::clone)
  }
}

/// Turns a JSON document into a CommonJS module exporting the parsed value.
pub struct JsonTransform;

impl Transform for JsonTransform {
  fn name(&self) -> &str {
    "json"
  }

  fn apply(&self, path: &str, source: &str) -> BuildResult<String> {
    let value: serde_json::Value = serde_json::from_str(source).map_err(|err| {
      BuildError::transform(self.name(), path, err.line(), err.column(), err.to_string())
    })?;

    Ok(format!("module.exports = {value};"))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn json_transform_wraps_document() {
    let out = JsonTransform.apply("data.json", r#"{ "a": 1 }"#).unwrap();
    assert_eq!(out, r#"module.exports = {"a":1};"#);
  }

  #[test]
  fn json_transform_reports_position() {
    let err = JsonTransform.apply("data.json", "{ broken").unwrap_err();
    let rendered = err.to_string();
    assert!(rendered.contains("data.json:1:"), "got: {rendered}");
  }

  #[test]
  fn registry_lookup() {
    let registry = TransformRegistry::with_builtins();
    assert!(registry.get("json").is_some());
    assert!(registry.get("babel-loader").is_none());
  }
}
