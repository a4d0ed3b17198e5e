/// Index of a module inside a `ModuleGraph`. Assigned in first-discovery
/// order during graph construction.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct ModuleIdx(usize);

impl ModuleIdx {
  pub fn new(raw: usize) -> Self {
    Self(raw)
  }

  pub fn raw(self) -> usize {
    self.0
  }
}

impl From<usize> for ModuleIdx {
  fn from(raw: usize) -> Self {
    Self(raw)
  }
}
