pub mod externals_plugin;
pub mod library;

use std::{borrow::Cow, fmt::Debug};

use esmpack_error::BuildResult;
use esmpack_utils::pretty_type_name::pretty_type_name;

use crate::CompilerHooks;

pub trait Plugin: Debug + Send + Sync {
  fn name(&self) -> Cow<'static, str> {
    pretty_type_name::<Self>()
  }

  /// Registers the plugin's taps. Called once, before the first compilation is created.
  fn apply(&self, hooks: &mut CompilerHooks) -> BuildResult<()>;
}
