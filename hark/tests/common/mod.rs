#![allow(dead_code)]

use hark::{ArgType, Emitter, Listener, Rest};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Test Argument Types
// ============================================================================

#[derive(Clone, Debug, PartialEq, ArgType)]
pub struct Login {
    pub user: u64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, ArgType)]
#[arg_type(name = "Logout")]
pub struct LogoutEvent {
    pub user: u64,
}

#[derive(Clone, Debug, PartialEq, ArgType)]
pub enum Payload<T> {
    Empty,
    Value(T),
}

// ============================================================================
// Test Listeners
// ============================================================================

/// A `(i32, String)` listener that adds its first argument to `total`.
pub fn summing_listener(total: Arc<AtomicUsize>) -> Listener {
    Listener::new(move |n: i32, _label: String| {
        total.fetch_add(n as usize, Ordering::SeqCst);
    })
}

/// A `(i32, ...i32)` listener that records the sum of its arguments.
pub fn variadic_sum(sums: Arc<Mutex<Vec<i32>>>) -> Listener {
    Listener::variadic(move |first: i32, rest: Rest<i32>| {
        sums.lock().unwrap().push(first + rest.iter().sum::<i32>());
    })
}

/// An emitter with one no-op listener on each of `names`.
pub fn emitter_with(names: &[&str]) -> Emitter {
    let emitter = Emitter::new();
    for name in names {
        emitter.on(name, Listener::new(|| {})).unwrap();
    }
    emitter
}
