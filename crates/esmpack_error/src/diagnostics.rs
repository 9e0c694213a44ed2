pub const COMMON_LIBRARY_NAME_MESSAGE: &str = "Common configuration options that specific library names are 'output.library[.name]', 'entry.xyz.library[.name]', 'ModuleFederationPlugin.name' and 'ModuleFederationPlugin.library[.name]'.";

/// Misuse of an option, reported while plugins parse their options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("Library name must be unset. {COMMON_LIBRARY_NAME_MESSAGE}")]
  LibraryNameMustBeUnset,
  #[error("Invalid externals type {0:?}")]
  InvalidExternalsType(String),
}

/// A module failed to build. `module` names the module the failure is attributed to.
#[derive(Debug, thiserror::Error)]
#[error("Module build failed{}: {source:#}", .module.as_deref().map(|m| format!(" ({m})")).unwrap_or_default())]
pub struct ModuleBuildError {
  pub module: Option<String>,
  #[source]
  pub source: anyhow::Error,
}

impl ModuleBuildError {
  /// Attributes the error to `module` unless the builder already did.
  pub fn tag_module_if_missing(error: anyhow::Error, module: &str) -> Self {
    match error.downcast::<Self>() {
      Ok(mut error) => {
        if error.module.is_none() {
          error.module = Some(module.to_string());
        }
        error
      }
      Err(source) => Self { module: Some(module.to_string()), source },
    }
  }
}

#[test]
fn test_tag_module_if_missing_keeps_existing_tag() {
  let inner = ModuleBuildError { module: Some("inner".into()), source: anyhow::anyhow!("boom") };
  let tagged = ModuleBuildError::tag_module_if_missing(inner.into(), "outer");
  assert_eq!(tagged.module.as_deref(), Some("inner"));

  let tagged = ModuleBuildError::tag_module_if_missing(anyhow::anyhow!("boom"), "outer");
  assert_eq!(tagged.module.as_deref(), Some("outer"));
  assert_eq!(tagged.to_string(), "Module build failed (outer): boom");
}

#[test]
fn test_library_name_message() {
  assert!(ConfigError::LibraryNameMustBeUnset.to_string().starts_with("Library name must be unset. "));
}
