use std::sync::LazyLock;

use esmpack_error::ConfigError;
use esmpack_utils::rstr::Rstr;
use regex::Regex;
use serde::Deserialize;

use crate::ExternalType;

static EXTERNAL_TYPE_PREFIX_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^([a-z0-9-]+) (.+)$").unwrap());

/// The value side of an `externals` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExternalItemValue {
  /// `"external111"` or `"commonjs fs"`.
  String(String),
  /// `true` keeps the request as written, `false` bundles the module after all.
  Bool(bool),
}

/// How the importing code reached the external.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyCategory {
  StaticImport,
  DynamicImport,
  Amd,
  CommonJs,
  Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExternalsTypeByCategory {
  pub amd: Option<ExternalType>,
  pub commonjs: Option<ExternalType>,
  pub static_import: Option<ExternalType>,
  pub dynamic_import: Option<ExternalType>,
  pub fallback: Option<ExternalType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ExternalsType {
  Single(ExternalType),
  ByCategory(ExternalsTypeByCategory),
}

impl Default for ExternalsType {
  fn default() -> Self {
    Self::Single(ExternalType::Module)
  }
}

impl ExternalsType {
  pub fn for_category(&self, category: DependencyCategory) -> ExternalType {
    match self {
      Self::Single(external_type) => *external_type,
      Self::ByCategory(by_category) => {
        let specific = match category {
          DependencyCategory::StaticImport => by_category.static_import,
          DependencyCategory::DynamicImport => by_category.dynamic_import,
          DependencyCategory::Amd => by_category.amd,
          DependencyCategory::CommonJs => by_category.commonjs,
          DependencyCategory::Other => None,
        };
        specific.or(by_category.fallback).unwrap_or(ExternalType::Module)
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExternal {
  pub external_type: ExternalType,
  pub request: Rstr,
}

/// Splits a `"<type> <request>"` value. Values without a type prefix use `default_type`.
pub fn parse_external_value(
  value: &str,
  default_type: ExternalType,
) -> Result<ResolvedExternal, ConfigError> {
  if let Some(captures) = EXTERNAL_TYPE_PREFIX_RE.captures(value) {
    let external_type = ExternalType::try_from(&captures[1])
      .map_err(|_| ConfigError::InvalidExternalsType(captures[1].to_string()))?;
    return Ok(ResolvedExternal { external_type, request: Rstr::new(&captures[2]) });
  }
  Ok(ResolvedExternal { external_type: default_type, request: Rstr::new(value) })
}
