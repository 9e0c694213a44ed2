pub trait Source {
  fn content(&self) -> &str;
}

impl Source for &str {
  fn content(&self) -> &str {
    self
  }
}

impl Source for String {
  fn content(&self) -> &str {
    self
  }
}

/// Concatenates rendered pieces of a chunk with one `\n` between neighbours. Empty pieces are
/// skipped so they don't leave blank lines behind.
#[derive(Default)]
pub struct SourceJoiner<'source> {
  inner: Vec<Box<dyn Source + Send + 'source>>,
}

impl<'source> SourceJoiner<'source> {
  pub fn append_source<T: Source + Send + 'source>(&mut self, source: T) {
    if !source.content().is_empty() {
      self.inner.push(Box::new(source));
    }
  }

  pub fn join(&self) -> String {
    let separators = self.inner.len().saturating_sub(1);
    let size_hint = self.inner.iter().map(|source| source.content().len()).sum::<usize>() + separators;
    let mut ret = String::with_capacity(size_hint);
    for (index, source) in self.inner.iter().enumerate() {
      if index > 0 {
        ret.push('\n');
      }
      ret.push_str(source.content());
    }
    ret
  }
}

#[test]
fn test_source_joiner_skips_empty_sources() {
  let mut joiner = SourceJoiner::default();
  assert_eq!(joiner.join(), "");
  joiner.append_source("a;");
  joiner.append_source(String::new());
  joiner.append_source("b;".to_string());
  assert_eq!(joiner.join(), "a;\nb;");
}
