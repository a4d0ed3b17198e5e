use std::sync::LazyLock;

use regex::Regex;

use wirepack_common::{DependencyRequest, ImportKind};
use wirepack_utils::indexmap::FxIndexSet;

/// `import d from './a'`, `import { x } from './a'`, `export * from './a'`
static IMPORT_FROM_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"(?m)^\s*(?:import|export)\s[^;'"]*?from\s*['"]([^'"]+)['"]"#).unwrap()
});

/// `import './a'`
static SIDE_EFFECT_IMPORT_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"(?m)^\s*import\s*['"]([^'"]+)['"]"#).unwrap());

/// `require('./a')`
static REQUIRE_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"\brequire\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

/// `import('./a')`
static DYNAMIC_IMPORT_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#"\bimport\s*\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap());

/// Extracts dependency specifiers from transformed source. String-literal
/// arguments only; a dynamic import of a computed expression is invisible to
/// the graph. Static forms are scanned first so a specifier used both ways
/// keeps its static edge.
pub fn scan_imports(source: &str) -> Vec<DependencyRequest> {
  let mut seen = FxIndexSet::default();
  let mut requests = Vec::new();

  let passes = [
    (&IMPORT_FROM_RE, ImportKind::Import),
    (&SIDE_EFFECT_IMPORT_RE, ImportKind::Import),
    (&REQUIRE_RE, ImportKind::Require),
    (&DYNAMIC_IMPORT_RE, ImportKind::DynamicImport),
  ];

  for (regex, kind) in passes {
    for captures in regex.captures_iter(source) {
      let specifier = &captures[1];
      if seen.insert(arcstr::ArcStr::from(specifier)) {
        requests.push(DependencyRequest { specifier: specifier.into(), kind });
      }
    }
  }

  requests
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scans_static_import_forms() {
    let source = r"
      import React from 'react';
      import { useState } from 'react';
      import * as utils from './utils';
      import './styles.css';
      export { helper } from './helper';
    ";

    let requests = scan_imports(source);
    let specifiers: Vec<&str> = requests.iter().map(|r| r.specifier.as_str()).collect();

    assert_eq!(specifiers, ["react", "./utils", "./helper", "./styles.css"]);
    assert!(requests.iter().all(|r| r.kind == ImportKind::Import));
  }

  #[test]
  fn scans_require_and_dynamic_import() {
    let source = r"
      const util = require('./util');
      const lazy = import('./lazy');
    ";

    let requests = scan_imports(source);

    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].specifier, "./util");
    assert_eq!(requests[0].kind, ImportKind::Require);
    assert_eq!(requests[1].specifier, "./lazy");
    assert_eq!(requests[1].kind, ImportKind::DynamicImport);
  }

  #[test]
  fn duplicate_specifiers_keep_first_kind() {
    let source = r"
      import a from './a';
      const again = import('./a');
    ";

    let requests = scan_imports(source);

    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, ImportKind::Import);
  }

  #[test]
  fn non_literal_dynamic_import_is_ignored() {
    let requests = scan_imports("const mod = import(name);");
    assert!(requests.is_empty());
  }
}
