use std::{collections::BTreeSet, fmt::Display};

use esmpack_utils::rstr::Rstr;

/// The set of runtimes a module has to work under at the same time.
///
/// An empty set means the runtime is unspecified, which matches every runtime.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct RuntimeSpec {
  runtimes: BTreeSet<Rstr>,
}

impl RuntimeSpec {
  pub fn single(runtime: impl Into<Rstr>) -> Self {
    Self { runtimes: BTreeSet::from([runtime.into()]) }
  }

  pub fn is_unspecified(&self) -> bool {
    self.runtimes.is_empty()
  }

  pub fn len(&self) -> usize {
    self.runtimes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.runtimes.is_empty()
  }

  pub fn contains(&self, runtime: &str) -> bool {
    self.runtimes.contains(runtime)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Rstr> {
    self.runtimes.iter()
  }

  /// Unions `other` into `self`. Order of merging never affects the result.
  pub fn merge_owned(&mut self, other: &Self) {
    self.runtimes.extend(other.runtimes.iter().cloned());
  }

  #[must_use]
  pub fn merge(mut self, other: &Self) -> Self {
    self.merge_owned(other);
    self
  }

  /// Whether the two specs share a runtime. An unspecified spec intersects everything.
  pub fn intersects(&self, other: &Self) -> bool {
    if self.is_unspecified() || other.is_unspecified() {
      return true;
    }
    self.runtimes.iter().any(|runtime| other.runtimes.contains(runtime))
  }
}

impl<T: Into<Rstr>> FromIterator<T> for RuntimeSpec {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    Self { runtimes: iter.into_iter().map(Into::into).collect() }
  }
}

impl Display for RuntimeSpec {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.runtimes.len() {
      0 => write!(f, "*"),
      1 => write!(f, "{}", self.runtimes.iter().next().map_or("", Rstr::as_str)),
      _ => {
        write!(f, "{{")?;
        for (idx, runtime) in self.runtimes.iter().enumerate() {
          if idx > 0 {
            write!(f, ",")?;
          }
          write!(f, "{runtime}")?;
        }
        write!(f, "}}")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::RuntimeSpec;

  #[test]
  fn merge_is_order_independent_and_idempotent() {
    let a = RuntimeSpec::single("main");
    let b = RuntimeSpec::from_iter(["worker", "main"]);

    let ab = RuntimeSpec::default().merge(&a).merge(&b);
    let ba = RuntimeSpec::default().merge(&b).merge(&a);
    assert_eq!(ab, ba);
    assert_eq!(ab.clone().merge(&ab), ab);
    assert_eq!(ab.to_string(), "{main,worker}");
  }

  #[test]
  fn unspecified_runtime() {
    let unspecified = RuntimeSpec::default();
    assert!(unspecified.is_unspecified());
    assert_eq!(unspecified.to_string(), "*");
    assert!(unspecified.intersects(&RuntimeSpec::single("main")));
    assert!(!RuntimeSpec::single("a").intersects(&RuntimeSpec::single("b")));
  }
}
