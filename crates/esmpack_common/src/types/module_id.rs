use arcstr::ArcStr;

/// `ModuleId` is the unique string identifier for each module.
/// - It will be used to identify the module in the whole compilation.
/// - Concatenated modules derive theirs from the root module's id and the merged runtime.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct ModuleId(ArcStr);

impl ModuleId {
  pub fn new(value: impl Into<ArcStr>) -> Self {
    Self(value.into())
  }
}

impl std::ops::Deref for ModuleId {
  type Target = str;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl AsRef<str> for ModuleId {
  fn as_ref(&self) -> &str {
    self
  }
}

impl std::fmt::Display for ModuleId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<ArcStr> for ModuleId {
  fn from(value: ArcStr) -> Self {
    Self::new(value)
  }
}

impl From<&str> for ModuleId {
  fn from(value: &str) -> Self {
    Self::new(value)
  }
}
