use std::sync::LazyLock;

use regex::Regex;

use wirepack_common::{ModuleGraph, ModuleIdx, ResolvedDep, SourceJoiner};

/// Rewritten to `require.dynamic(`, which defers through `Promise.resolve`
/// so callers keep a thenable even though the module is already inlined.
static DYNAMIC_IMPORT_CALL_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bimport\s*\(").unwrap());

const PRELUDE: &str = r#"(function (modules, entries) {
  'use strict';

  var cache = {};

  function loadExternal(specifier) {
    var value = globalThis[specifier];
    if (value === undefined) {
      throw new Error('External module "' + specifier + '" is not available');
    }
    return value;
  }

  function load(id) {
    if (cache[id]) {
      return cache[id].exports;
    }
    var record = modules[id];
    var module = { exports: {} };
    cache[id] = module;
    record[0](makeRequire(record[1]), module, module.exports);
    return module.exports;
  }

  function makeRequire(map) {
    function require(specifier) {
      var id = map[specifier];
      if (id === undefined || id === null) {
        return loadExternal(specifier);
      }
      return load(id);
    }
    require.dynamic = function (specifier) {
      return Promise.resolve().then(function () {
        return require(specifier);
      });
    };
    return require;
  }

  for (var i = 0; i < entries.length; i++) {
    load(entries[i]);
  }
})({"#;

/// Renders the whole artifact: one registration record per module in
/// execution order, followed by the entry list. Records are keyed by stable
/// id; each carries a specifier-to-id map so the in-factory `require` never
/// touches raw paths.
pub fn render_bundle(graph: &ModuleGraph, order: &[ModuleIdx]) -> String {
  let mut joiner = SourceJoiner::default();
  joiner.append_source(PRELUDE);

  for idx in order {
    joiner.append_source(render_record(graph, *idx));
  }

  let entries = graph
    .entries
    .iter()
    .map(|entry| serde_json::Value::String(graph[entry.idx].stable_id.clone()))
    .collect::<Vec<_>>();
  joiner.append_source(format!("}}, {});", serde_json::Value::Array(entries)));

  joiner.join()
}

fn render_record(graph: &ModuleGraph, idx: ModuleIdx) -> String {
  let module = &graph[idx];

  let mut map = serde_json::Map::new();
  for (request, resolved) in module.dependencies.iter().zip(&module.resolved_deps) {
    let target = match resolved {
      ResolvedDep::Module(dep) => serde_json::Value::String(graph[*dep].stable_id.clone()),
      ResolvedDep::External(_) => serde_json::Value::Null,
    };
    map.insert(request.specifier.to_string(), target);
  }

  let source = DYNAMIC_IMPORT_CALL_RE.replace_all(&module.source, "require.dynamic(");

  format!(
    "{}: [function (require, module, exports) {{\n{}\n}}, {}],",
    serde_json::Value::String(module.stable_id.clone()),
    source,
    serde_json::Value::Object(map),
  )
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rewrites_dynamic_import_calls_only() {
    let source = "import('./lazy').then(function (m) { m.run(); });";
    let rewritten = DYNAMIC_IMPORT_CALL_RE.replace_all(source, "require.dynamic(");
    assert_eq!(rewritten, "require.dynamic('./lazy').then(function (m) { m.run(); });");

    let untouched = "reimport(x); important(y);";
    assert_eq!(DYNAMIC_IMPORT_CALL_RE.replace_all(untouched, "require.dynamic("), untouched);
  }
}
