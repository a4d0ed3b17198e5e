#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ImportKind {
  /// `import ... from '...'`, `import '...'` or `export ... from '...'`
  Import,
  /// `import('...')`
  DynamicImport,
  /// `require('...')`
  Require,
}

impl ImportKind {
  pub fn is_static(self) -> bool {
    matches!(self, Self::Import | Self::Require)
  }
}
