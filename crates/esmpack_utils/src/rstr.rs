use std::{borrow::Borrow, fmt, ops::Deref};

use arcstr::ArcStr;

/// Cheap-to-clone immutable string used for request strings, export names and identifiers.
#[derive(Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rstr(ArcStr);

impl Rstr {
  pub fn new(value: &str) -> Self {
    Self(ArcStr::from(value))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Deref for Rstr {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for Rstr {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl Borrow<str> for Rstr {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl fmt::Debug for Rstr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Debug::fmt(self.as_str(), f)
  }
}

impl fmt::Display for Rstr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self.as_str(), f)
  }
}

impl From<&str> for Rstr {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}

impl From<String> for Rstr {
  fn from(value: String) -> Self {
    Self(ArcStr::from(value))
  }
}

impl From<ArcStr> for Rstr {
  fn from(value: ArcStr) -> Self {
    Self(value)
  }
}

impl PartialEq<str> for Rstr {
  fn eq(&self, other: &str) -> bool {
    self.as_str() == other
  }
}

impl PartialEq<&str> for Rstr {
  fn eq(&self, other: &&str) -> bool {
    self.as_str() == *other
  }
}

pub trait ToRstr {
  fn to_rstr(&self) -> Rstr;
}

impl ToRstr for str {
  fn to_rstr(&self) -> Rstr {
    Rstr::new(self)
  }
}

impl ToRstr for String {
  fn to_rstr(&self) -> Rstr {
    Rstr::new(self)
  }
}

#[test]
fn test_rstr_lookup_by_str() {
  let mut map = rustc_hash::FxHashMap::default();
  map.insert(Rstr::new("default"), 1);
  assert_eq!(map.get("default"), Some(&1));
  assert_eq!(Rstr::from("a"), "a");
}
