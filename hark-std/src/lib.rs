//! # hark-std
//!
//! The emitter implementation for hark.
//!
//! This crate provides:
//! - **Registry and dispatch**: [`Emitter`], configured through [`EmitterBuilder`]
//! - **Asynchronous execution**: the [`Spawn`] strategy and its standard implementations
//! - **Process-wide instance**: [`global()`]
//! - **Test helpers**: the [`testing`] module
//!
//! # Logging
//!
//! Registry changes are logged at `debug`, emissions at `trace`, and a
//! signature mismatch at `error` right before the emitter panics. All of it
//! goes through `tracing`; install a subscriber to see it.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use hark_core;

mod emitter;
mod global;
pub mod spawn;
pub mod testing;

pub use emitter::{Emitter, EmitterBuilder};
pub use global::global;
#[cfg(feature = "tokio")]
pub use spawn::TokioSpawner;
pub use spawn::{AutoSpawner, Job, Spawn, ThreadSpawner};
