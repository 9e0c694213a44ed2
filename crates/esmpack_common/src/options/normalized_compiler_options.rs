use esmpack_error::ConfigError;
use esmpack_utils::indexmap::FxIndexMap;

use crate::{
  options::externals::parse_external_value, DependencyCategory, ExternalItemValue, ExternalsType,
  LibraryOptions, ResolvedExternal,
};

#[derive(Debug, Default)]
pub struct NormalizedCompilerOptions {
  pub library: Option<LibraryOptions>,
  pub concatenate_modules: bool,
  pub split_chunks: bool,
  pub externals: FxIndexMap<String, ExternalItemValue>,
  pub externals_type: ExternalsType,
}

impl NormalizedCompilerOptions {
  /// Looks `request` up in the externals table. `Ok(None)` means the request is bundled.
  pub fn resolve_external(
    &self,
    request: &str,
    category: DependencyCategory,
  ) -> Result<Option<ResolvedExternal>, ConfigError> {
    let default_type = self.externals_type.for_category(category);
    match self.externals.get(request) {
      None | Some(ExternalItemValue::Bool(false)) => Ok(None),
      Some(ExternalItemValue::Bool(true)) => parse_external_value(request, default_type).map(Some),
      Some(ExternalItemValue::String(value)) => parse_external_value(value, default_type).map(Some),
    }
  }
}

#[cfg(test)]
mod tests {
  use crate::{normalize_options, CompilerOptions, DependencyCategory, ExternalType};

  fn options(json: &str) -> super::NormalizedCompilerOptions {
    normalize_options(serde_json::from_str::<CompilerOptions>(json).unwrap())
  }

  #[test]
  fn externals_type_per_category() {
    let options = options(
      r#"{
        "externalsType": { "static-import": "commonjs", "dynamic-import": "import", "fallback": "window" },
        "externals": { "external1": "external111", "fs": "commonjs fs", "keep": true, "bundled": false }
      }"#,
    );

    let resolved = options.resolve_external("external1", DependencyCategory::DynamicImport).unwrap();
    let resolved = resolved.unwrap();
    assert_eq!(resolved.external_type, ExternalType::Import);
    assert_eq!(resolved.request, "external111");

    let resolved = options.resolve_external("external1", DependencyCategory::Other).unwrap();
    assert_eq!(resolved.map(|r| r.external_type), Some(ExternalType::Window));

    let resolved = options.resolve_external("fs", DependencyCategory::DynamicImport).unwrap();
    let resolved = resolved.unwrap();
    assert_eq!((resolved.external_type, resolved.request.as_str()), (ExternalType::CommonJs, "fs"));

    let resolved = options.resolve_external("keep", DependencyCategory::StaticImport).unwrap();
    assert_eq!(resolved.map(|r| r.request), Some("keep".into()));
    assert_eq!(options.resolve_external("bundled", DependencyCategory::StaticImport).unwrap(), None);
    assert_eq!(options.resolve_external("other", DependencyCategory::StaticImport).unwrap(), None);
  }

  #[test]
  fn every_type_literal_is_accepted_as_prefix() {
    let options = options(
      r#"{ "externals": { "a": "commonjs2 a", "b": "umd2 b", "c": "node-commonjs c", "d": "self d" } }"#,
    );
    let resolve = |request| {
      options.resolve_external(request, DependencyCategory::StaticImport).unwrap().unwrap()
    };
    assert_eq!(resolve("a").external_type, ExternalType::CommonJs2);
    assert_eq!(resolve("b").external_type, ExternalType::Umd2);
    assert_eq!(resolve("c").external_type, ExternalType::NodeCommonJs);
    assert_eq!((resolve("d").external_type, resolve("d").request.as_str()), (ExternalType::SelfObject, "d"));
  }

  #[test]
  fn unknown_type_prefix_is_a_config_error() {
    let options = options(r#"{ "externals": { "a": "commonjs3 a" } }"#);
    assert!(options.resolve_external("a", DependencyCategory::StaticImport).is_err());
  }

  #[test]
  fn amd_and_commonjs_categories() {
    let options = options(
      r#"{
        "externalsType": { "amd": "amd-require", "commonjs": "commonjs-static", "fallback": "var" },
        "externals": { "x": "x" }
      }"#,
    );
    let type_for = |category| {
      options.resolve_external("x", category).unwrap().map(|resolved| resolved.external_type)
    };
    assert_eq!(type_for(DependencyCategory::Amd), Some(ExternalType::AmdRequire));
    assert_eq!(type_for(DependencyCategory::CommonJs), Some(ExternalType::CommonJsStatic));
    assert_eq!(type_for(DependencyCategory::StaticImport), Some(ExternalType::Var));
  }

  #[test]
  fn defaults() {
    let options = options("{}");
    assert!(options.library.is_none());
    assert!(options.concatenate_modules);
    assert!(!options.split_chunks);
    let resolved = super::parse_external_value("x", options.externals_type.for_category(DependencyCategory::Other));
    assert_eq!(resolved.unwrap().external_type, ExternalType::Module);
  }
}
