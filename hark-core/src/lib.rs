//! # hark-core
//!
//! Core types for the hark event emitter.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! code that builds or inspects listeners without needing the emitter
//! itself (`hark-std`).
//!
//! # Building Blocks
//!
//! ## Arguments ([`Arg`], [`ArgType`])
//!
//! Emissions carry a dynamically typed argument list. Each [`Arg`] is a
//! shared, type-erased value tagged with its [`TypeTag`].
//!
//! ## Signatures ([`Signature`], [`ParamType`])
//!
//! A listener declares its parameters. A signature is checked against an
//! argument list at emission time: arity first, then per-position types,
//! including a variadic tail.
//!
//! ## Listeners ([`Listener`], [`ListenerId`])
//!
//! Closures become listeners through [`Callback`] / [`VariadicCallback`],
//! which derive the signature from the parameter types. Every listener has
//! an identity used for deduplication and removal.
//!
//! # Error Types
//!
//! - [`EmitterError`] - Recoverable registry and emission errors
//! - [`SignatureError`] - Arguments a listener cannot accept (fatal when emitting)
//! - [`ExtractError`] - A parameter that could not be extracted

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod arg;
mod callback;
mod error;
mod listener;
mod param;
mod signature;

// Re-exports
pub use arg::{Arg, ArgType, TypeTag};
pub use callback::{Callback, VariadicCallback};
pub use error::{EmitterError, ExtractError, SignatureError};
pub use listener::{AsListener, Listener, ListenerId, identity_of, is_callable};
pub use param::{Param, ParamType, Rest};
pub use signature::Signature;
