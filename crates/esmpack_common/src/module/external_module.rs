use std::fmt::Display;

use esmpack_utils::rstr::Rstr;
use serde::Deserialize;

use crate::{BuildInfo, BuildMeta, DependencyIdx, ModuleIdx};

/// How an external is brought in at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ExternalType {
  Var,
  Module,
  Assign,
  This,
  Window,
  SelfObject,
  Global,
  CommonJs,
  CommonJs2,
  CommonJsModule,
  CommonJsStatic,
  Amd,
  AmdRequire,
  Umd,
  Umd2,
  Jsonp,
  System,
  Promise,
  Import,
  ModuleImport,
  Script,
  NodeCommonJs,
}

impl ExternalType {
  pub const ALL: [Self; 22] = [
    Self::Var,
    Self::Module,
    Self::Assign,
    Self::This,
    Self::Window,
    Self::SelfObject,
    Self::Global,
    Self::CommonJs,
    Self::CommonJs2,
    Self::CommonJsModule,
    Self::CommonJsStatic,
    Self::Amd,
    Self::AmdRequire,
    Self::Umd,
    Self::Umd2,
    Self::Jsonp,
    Self::System,
    Self::Promise,
    Self::Import,
    Self::ModuleImport,
    Self::Script,
    Self::NodeCommonJs,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Var => "var",
      Self::Module => "module",
      Self::Assign => "assign",
      Self::This => "this",
      Self::Window => "window",
      Self::SelfObject => "self",
      Self::Global => "global",
      Self::CommonJs => "commonjs",
      Self::CommonJs2 => "commonjs2",
      Self::CommonJsModule => "commonjs-module",
      Self::CommonJsStatic => "commonjs-static",
      Self::Amd => "amd",
      Self::AmdRequire => "amd-require",
      Self::Umd => "umd",
      Self::Umd2 => "umd2",
      Self::Jsonp => "jsonp",
      Self::System => "system",
      Self::Promise => "promise",
      Self::Import => "import",
      Self::ModuleImport => "module-import",
      Self::Script => "script",
      Self::NodeCommonJs => "node-commonjs",
    }
  }
}

impl TryFrom<&str> for ExternalType {
  type Error = String;

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    Self::ALL
      .into_iter()
      .find(|external_type| external_type.as_str() == value)
      .ok_or_else(|| format!("Invalid external type: {value:?}"))
  }
}

impl TryFrom<String> for ExternalType {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Self::try_from(value.as_str())
  }
}

impl Display for ExternalType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

#[test]
fn test_external_type_literals() {
  for external_type in ExternalType::ALL {
    assert_eq!(ExternalType::try_from(external_type.as_str()), Ok(external_type));
  }
  assert_eq!(ExternalType::try_from("self"), Ok(ExternalType::SelfObject));
  assert!(ExternalType::try_from("commonjs3").is_err());
}

/// A dependency that stays outside the bundle and is provided by the host at runtime.
#[derive(Debug)]
pub struct ExternalModule {
  pub idx: ModuleIdx,
  /// What the importing module wrote, e.g. `external1`.
  pub user_request: Rstr,
  /// What the output refers to instead, e.g. `external111`.
  pub request: Rstr,
  pub external_type: ExternalType,
  pub dependencies: Vec<DependencyIdx>,
  pub build_meta: BuildMeta,
  pub build_info: BuildInfo,
}

impl ExternalModule {
  pub fn new(idx: ModuleIdx, user_request: Rstr, request: Rstr, external_type: ExternalType) -> Self {
    Self {
      idx,
      user_request,
      request,
      external_type,
      dependencies: vec![],
      build_meta: BuildMeta::default(),
      build_info: BuildInfo::default(),
    }
  }

  pub fn identifier(&self) -> String {
    format!("external {} {:?}", self.external_type, self.request.as_str())
  }
}
