//! Error types for hark.
//!
//! This module provides a two-tier error hierarchy using `thiserror`:
//!
//! - [`EmitterError`] - Recoverable usage errors returned by registry and emit calls
//! - [`SignatureError`] - An argument list a listener's signature cannot accept
//! - [`ExtractError`] - An argument that could not be taken out of its [`Arg`] box
//!
//! [`Arg`]: crate::Arg

use crate::param::ParamType;
use thiserror::Error;

/// Recoverable errors returned by emitter operations.
///
/// These are ordinary results: the emitter never logs them above `debug`
/// and never retries. The caller decides what to do.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitterError {
    /// The event name was the empty string.
    #[error("event name cannot be empty")]
    EmptyName,

    /// The value offered as a listener does not hold a callable.
    #[error("listener must be a callable")]
    NotCallable,

    /// The same listener identity is already registered for the event.
    #[error("listener is already registered for event `{event}`")]
    DuplicateListener {
        /// The event the listener was registered for.
        event: String,
    },

    /// The emitter accepts one listener per event and this one has it.
    #[error("event `{event}` already exists")]
    EventExists {
        /// The event that already has a listener.
        event: String,
    },

    /// No listener set exists for the event, or none matched.
    #[error("event `{event}` does not exist")]
    UnknownEvent {
        /// The event that was looked up.
        event: String,
    },
}

/// An emitted argument list does not fit a listener's declared signature.
///
/// Returned by [`Signature::check`]. The emitter treats it as a programming
/// error and panics with its message.
///
/// [`Signature::check`]: crate::Signature::check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    /// A fixed-arity listener got the wrong number of arguments.
    #[error("Wrong number of arguments. Event {event} expected {expected} arguments, got {got}.")]
    ArityMismatch {
        /// Event being emitted.
        event: String,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },

    /// A variadic listener did not get its full fixed prefix.
    #[error(
        "Not enough arguments. Event {event} expected at least {expected} arguments, got {got}."
    )]
    InsufficientArguments {
        /// Event being emitted.
        event: String,
        /// Length of the fixed prefix.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },

    /// An argument's runtime type is not assignable to its parameter.
    #[error(
        "Wrong argument type. Event {event} expected argument {position} to be {expected}, got {got}."
    )]
    TypeMismatch {
        /// Event being emitted.
        event: String,
        /// 1-based parameter position.
        position: usize,
        /// Declared parameter type name.
        expected: String,
        /// Supplied argument type name.
        got: String,
    },
}

/// An argument could not be converted into the parameter type it was
/// bound to.
///
/// Validation runs before invocation, so in practice this only shows up
/// when a listener is invoked directly through [`Listener::invoke`].
///
/// [`Listener::invoke`]: crate::Listener::invoke
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("argument {position} is {got}, not {expected}")]
pub struct ExtractError {
    /// 1-based parameter position.
    pub position: usize,
    /// Declared parameter type name.
    pub expected: String,
    /// Supplied argument type name, or `nothing` when the argument is missing.
    pub got: String,
}

impl ExtractError {
    pub(crate) fn new(position: usize, expected: &ParamType, got: Option<&str>) -> Self {
        Self {
            position,
            expected: expected.name().into_owned(),
            got: got.unwrap_or("nothing").to_owned(),
        }
    }

    /// Reports this failure as a [`SignatureError::TypeMismatch`] for `event`.
    pub fn into_signature_error(self, event: &str) -> SignatureError {
        SignatureError::TypeMismatch {
            event: event.to_owned(),
            position: self.position,
            expected: self.expected,
            got: self.got,
        }
    }
}
