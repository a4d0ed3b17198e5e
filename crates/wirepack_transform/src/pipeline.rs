use std::sync::Arc;

use wirepack_common::ModuleRule;
use wirepack_error::{BuildError, BuildResult};

use crate::{Transform, TransformRegistry};

struct CompiledRule {
  test: Option<String>,
  exclude: Option<String>,
  chain: Vec<Arc<dyn Transform>>,
}

impl CompiledRule {
  /// A rule applies when its test pattern matches the path and its exclude
  /// pattern does not. A rule without a test matches everything.
  fn matches(&self, path: &str) -> bool {
    let tested = self.test.as_deref().is_none_or(|test| fast_glob::glob_match(test, path));
    let excluded =
      self.exclude.as_deref().is_some_and(|exclude| fast_glob::glob_match(exclude, path));
    tested && !excluded
  }
}

/// The configured rule list, compiled against a transform registry. Rules
/// are evaluated in configuration order and every matching rule's chain is
/// applied in sequence, the output of one feeding the next.
pub struct TransformPipeline {
  rules: Vec<CompiledRule>,
}

impl TransformPipeline {
  /// Fails when a rule names a transform the registry does not know;
  /// a silently dropped transform would bundle untransformed source.
  pub fn new(rules: &[ModuleRule], registry: &TransformRegistry) -> BuildResult<Self> {
    let rules = rules
      .iter()
      .map(|rule| {
        let chain = rule
          .transforms
          .iter()
          .map(|name| {
            registry.get(name).ok_or_else(|| {
              BuildError::transform(name.as_str(), "<configuration>", 0, 0, "unknown transform")
            })
          })
          .collect::<BuildResult<Vec<_>>>()?;

        Ok(CompiledRule { test: rule.test.clone(), exclude: rule.exclude.clone(), chain })
      })
      .collect::<BuildResult<Vec<_>>>()?;

    Ok(Self { rules })
  }

  /// Files matching no rule pass through unchanged.
  pub fn transform(&self, path: &str, source: String) -> BuildResult<String> {
    let mut source = source;
    for rule in self.rules.iter().filter(|rule| rule.matches(path)) {
      for transform in &rule.chain {
        source = transform.apply(path, &source)?;
      }
    }
    Ok(source)
  }
}
