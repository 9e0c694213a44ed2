use std::sync::atomic::{AtomicBool, Ordering};

use tracing::Level;

static IS_INIT: AtomicBool = AtomicBool::new(false);

/// Installs the global subscriber once. Filtering follows `RUST_LOG`, with the `esmpack`
/// targets enabled up to `TRACE`.
pub fn init() {
  use tracing_subscriber::{fmt, prelude::*, EnvFilter};
  if !IS_INIT.swap(true, Ordering::SeqCst) {
    let _ = tracing_subscriber::registry()
      .with(fmt::layer())
      .with(EnvFilter::from_default_env())
      .with(tracing_subscriber::filter::Targets::new().with_target("esmpack", Level::TRACE))
      .try_init();
  }
}
