//! # hark - In-Process Event Emitter
//!
//! `hark` maps event names to ordered lists of listeners and calls them
//! with dynamically typed arguments. Every listener declares its parameter
//! types; an emission whose arguments do not fit a listener is a
//! programming error and panics with a precise message.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hark::prelude::*;
//!
//! let emitter = Emitter::new();
//!
//! let on_login = Listener::new(|user: u64, name: String| {
//!     println!("{user} logged in as {name}");
//! });
//! emitter.on("login", &on_login)?;
//!
//! // Runs every listener on this thread, in registration order.
//! emitter.emit_sync("login", args![7_u64, "alice".to_string()])?;
//!
//! // Validates here, runs listeners elsewhere, returns immediately.
//! emitter.emit("login", args![8_u64, "bob".to_string()])?;
//! ```
//!
//! ## Variadic Listeners
//!
//! ```rust,ignore
//! let sum = Listener::variadic(|first: i32, rest: Rest<i32>| {
//!     println!("{}", first + rest.iter().sum::<i32>());
//! });
//! ```
//!
//! ## Custom Argument Types
//!
//! ```rust,ignore
//! #[derive(Clone, ArgType)]
//! struct Login { user: u64 }
//!
//! emitter.on("login", Listener::new(|login: Login| { /* ... */ }))?;
//! ```
//!
//! | Emission | Runs listeners | Returns |
//! |----------|----------------|---------|
//! | [`Emitter::emit_sync`] | On the caller's thread, in order | After the last listener |
//! | [`Emitter::emit`] | Through the configured [`Spawn`] strategy | Immediately |

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use hark_core::{
    // Arguments
    Arg,
    ArgType,
    // Listeners
    AsListener,
    Callback,
    // Errors
    EmitterError,
    ExtractError,
    Listener,
    ListenerId,
    // Signatures
    Param,
    ParamType,
    Rest,
    Signature,
    SignatureError,
    TypeTag,
    VariadicCallback,
    args,
    identity_of,
    is_callable,
};

pub use hark_std::{Emitter, EmitterBuilder, global};

/// Spawning strategies for asynchronous emission.
pub mod spawn {
    #[cfg(feature = "tokio")]
    pub use hark_std::spawn::TokioSpawner;
    pub use hark_std::spawn::{AutoSpawner, Job, Spawn, ThreadSpawner};
}

pub use spawn::Spawn;

/// Testing utilities.
pub mod testing {
    pub use hark_std::testing::{CallCounter, Latch, Recorder, panic_message};
}

/// Prelude module - common imports for hark.
///
/// # Usage
///
/// ```rust,ignore
/// use hark::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Arg, ArgType, Emitter, EmitterError, Listener, ListenerId, ParamType, Rest, Signature, args, global,
    };
}

#[cfg(feature = "macros")]
pub use hark_macros::ArgType;
