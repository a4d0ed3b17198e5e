/// Joins source fragments with newlines, precomputing the final capacity so
/// large bundles are assembled with a single allocation.
#[derive(Default)]
pub struct SourceJoiner {
  inner: Vec<String>,
}

impl SourceJoiner {
  pub fn append_source(&mut self, source: impl Into<String>) {
    self.inner.push(source.into());
  }

  pub fn join(&self) -> String {
    if self.inner.is_empty() {
      return String::new();
    }

    let capacity = self.inner.iter().map(String::len).sum::<usize>() + self.inner.len() - 1;
    let mut ret = String::with_capacity(capacity);

    for (index, source) in self.inner.iter().enumerate() {
      ret.push_str(source);
      if index < self.inner.len() - 1 {
        ret.push('\n');
      }
    }

    ret
  }
}

#[test]
fn test_join() {
  let mut joiner = SourceJoiner::default();
  joiner.append_source("a");
  joiner.append_source("b");
  joiner.append_source("c");
  assert_eq!(joiner.join(), "a\nb\nc");

  assert_eq!(SourceJoiner::default().join(), "");
}
