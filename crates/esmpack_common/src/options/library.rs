use serde::Deserialize;

/// Which library-output strategy renders the entry chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LibraryType {
  /// ES module output through the generic module-library path.
  Module,
  /// ES module output that keeps each entry module concatenated and its externals as imports.
  ModernModule,
}

impl std::fmt::Display for LibraryType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Module => write!(f, "module"),
      Self::ModernModule => write!(f, "modern-module"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum LibraryName {
  String(String),
  Array(Vec<String>),
}

impl LibraryName {
  /// Whether a name was actually given. An empty string counts as no name, any array as one.
  pub fn is_set(&self) -> bool {
    match self {
      Self::String(name) => !name.is_empty(),
      Self::Array(_) => true,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LibraryOptions {
  #[serde(rename = "type")]
  pub library_type: LibraryType,
  #[serde(default)]
  pub name: Option<LibraryName>,
}

impl LibraryOptions {
  pub fn new(library_type: LibraryType) -> Self {
    Self { library_type, name: None }
  }
}
