//! Testing utilities for hark.
//!
//! This module provides utilities to make testing listeners and emissions easier.
//!
//! # Features
//!
//! - [`CallCounter`]: Listeners that count how often they were invoked
//! - [`Recorder`]: A listener that records every argument list it receives
//! - [`Latch`]: A countdown latch for waiting on asynchronous listeners
//! - [`panic_message`]: Capture the message of a fatal signature mismatch

use hark_core::{Arg, Listener, Rest, Signature, SignatureError};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        Arc, Condvar, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

// ============================================================================
// Call Counter
// ============================================================================

/// Counts invocations across every listener it hands out.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CallCounter::new();
/// emitter.on("ping", counter.listener())?;
/// emitter.emit_sync("ping", args![])?;
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct CallCounter {
    calls: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Create a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// A new listener taking no arguments that bumps the counter.
    pub fn listener(&self) -> Listener {
        let calls = Arc::clone(&self.calls);
        Listener::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    }

    /// A new listener accepting any arguments that bumps the counter.
    pub fn variadic(&self) -> Listener {
        let calls = Arc::clone(&self.calls);
        Listener::variadic(move |_args: Rest<Arg>| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    }

    /// Number of invocations so far.
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Reset the counter to zero.
    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }
}

// ============================================================================
// Recorder
// ============================================================================

/// Records the argument lists its listeners are invoked with.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = Recorder::new();
/// emitter.on("add", recorder.listener(Signature::new([ParamType::of::<i32>()])))?;
/// emitter.emit_sync("add", args![4])?;
///
/// let calls = recorder.calls();
/// assert_eq!(calls[0][0].get::<i32>(), Some(4));
/// ```
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Vec<Arg>>>>,
}

impl Recorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A new listener with the given signature that records its arguments.
    pub fn listener(&self, signature: Signature) -> Listener {
        let calls = Arc::clone(&self.calls);
        Listener::from_raw(signature, move |args| {
            calls.lock().unwrap().push(args.to_vec());
        })
    }

    /// A clone of every recorded argument list, in invocation order.
    pub fn calls(&self) -> Vec<Vec<Arg>> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded invocations.
    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Clear all recordings.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

// ============================================================================
// Latch
// ============================================================================

/// A countdown latch.
///
/// Asynchronous emissions return before listeners run. Tests count the
/// latch down from inside the listener and wait on it instead of sleeping.
#[derive(Clone)]
pub struct Latch {
    state: Arc<(Mutex<usize>, Condvar)>,
}

impl Latch {
    /// A latch that opens after `count` calls to [`count_down`](Self::count_down).
    pub fn new(count: usize) -> Self {
        Self {
            state: Arc::new((Mutex::new(count), Condvar::new())),
        }
    }

    /// Decrement the count, waking waiters when it reaches zero.
    pub fn count_down(&self) {
        let (count, ready) = &*self.state;
        let mut count = count.lock().unwrap();
        *count = count.saturating_sub(1);
        if *count == 0 {
            ready.notify_all();
        }
    }

    /// Remaining count.
    pub fn remaining(&self) -> usize {
        *self.state.0.lock().unwrap()
    }

    /// Block until the count reaches zero.
    pub fn wait(&self) {
        let (count, ready) = &*self.state;
        let guard = count.lock().unwrap();
        drop(ready.wait_while(guard, |count| *count > 0).unwrap());
    }

    /// Block until the count reaches zero or `timeout` elapses.
    ///
    /// Returns `true` if the latch opened.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (count, ready) = &*self.state;
        let guard = count.lock().unwrap();
        let (_guard, result) = ready
            .wait_timeout_while(guard, timeout, |count| *count > 0)
            .unwrap();
        !result.timed_out()
    }
}

// ============================================================================
// Panics
// ============================================================================

/// Run `f`, returning the panic message if it panicked.
///
/// Signature mismatches during emission panic with the [`SignatureError`]
/// itself; its display text is returned. String payloads are returned as is.
pub fn panic_message<F, R>(f: F) -> Option<String>
where
    F: FnOnce() -> R,
{
    let payload = panic::catch_unwind(AssertUnwindSafe(f)).err()?;
    let message = payload
        .downcast_ref::<SignatureError>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_owned()))
        .unwrap_or_default();
    Some(message)
}
