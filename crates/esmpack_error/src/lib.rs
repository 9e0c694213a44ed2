mod diagnostics;

use std::ops::{Deref, DerefMut};

pub use crate::diagnostics::{ConfigError, ModuleBuildError, COMMON_LIBRARY_NAME_MESSAGE};

#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl From<ModuleBuildError> for BuildError {
  fn from(error: ModuleBuildError) -> Self {
    Self(vec![error.into()])
  }
}

impl From<ConfigError> for BuildError {
  fn from(error: ConfigError) -> Self {
    Self(vec![error.into()])
  }
}

impl std::fmt::Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (idx, error) in self.0.iter().enumerate() {
      if idx > 0 {
        writeln!(f)?;
      }
      write!(f, "{error:#}")?;
    }
    Ok(())
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;
