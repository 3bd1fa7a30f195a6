//! The process-wide default emitter.

use crate::emitter::Emitter;
use lazy_static::lazy_static;

lazy_static! {
    static ref GLOBAL: Emitter = Emitter::new();
}

/// The shared emitter for code that does not want to pass one around.
///
/// Created on first use with the default configuration. Every call returns
/// the same instance.
///
/// ```rust,ignore
/// hark::global().on("shutdown", Listener::new(|| flush_logs()))?;
/// hark::global().emit_sync("shutdown", args![])?;
/// ```
pub fn global() -> &'static Emitter {
    &GLOBAL
}
