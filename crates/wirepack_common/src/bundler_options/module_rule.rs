use serde::Deserialize;

/// One transform rule. `test` and `exclude` are glob patterns matched
/// against the slash-normalized module path; `transforms` names registered
/// transforms applied in order. Multiple matching rules chain in
/// configuration order.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleRule {
  pub test: Option<String>,
  pub exclude: Option<String>,
  #[serde(rename = "use", alias = "transforms")]
  pub transforms: Vec<String>,
}
