use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;

static MODULE_PATH_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\b[a-z_][a-z0-9_]*::").unwrap());

/// Type name without its module path, e.g. `ExternalsPlugin` for
/// `esmpack::plugins::externals_plugin::ExternalsPlugin`. Generic arguments are kept.
pub fn pretty_type_name<T: ?Sized>() -> Cow<'static, str> {
  MODULE_PATH_RE.replace_all(std::any::type_name::<T>(), "")
}

#[test]
fn test_pretty_type_name() {
  struct ExternalsPlugin;
  assert_eq!(pretty_type_name::<ExternalsPlugin>(), "ExternalsPlugin");
  assert_eq!(pretty_type_name::<Vec<Option<String>>>(), "Vec<Option<String>>");
}
