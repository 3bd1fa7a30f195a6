//! The event emitter: a concurrent listener registry and the dispatch
//! engine that emits to it.
//!
//! # Concurrency
//!
//! Listener sets live in a [`DashMap`] keyed by event name. Each set is an
//! immutable `Arc<[Listener]>` replaced wholesale on every write, so:
//!
//! - writers on one event are serialized by that key's shard lock, writers
//!   on different events need not be;
//! - an emission snapshots the set with a single `Arc` clone and releases
//!   the map before calling any listener. Listeners may register, remove or
//!   emit on the same emitter without deadlocking. Listeners added after
//!   the snapshot are not called by that emission; removed ones may be.

use crate::spawn::{AutoSpawner, Spawn};
use dashmap::{DashMap, mapref::entry::Entry};
use hark_core::{Arg, AsListener, EmitterError, Listener, ListenerId, SignatureError};
use std::{fmt, sync::Arc};
use tracing::{debug, error, trace};

type ListenerSet = Arc<[Listener]>;

/// An in-process event emitter.
///
/// # Example
///
/// ```rust,ignore
/// use hark::{Emitter, Listener, args};
///
/// let emitter = Emitter::new();
/// let greet = Listener::new(|name: String| println!("hello {name}"));
///
/// emitter.on("greet", &greet)?;
/// emitter.emit_sync("greet", args!["world".to_string()])?;
/// ```
pub struct Emitter {
    listeners: DashMap<String, ListenerSet>,
    single_listener: bool,
    spawner: Arc<dyn Spawn>,
}

impl Emitter {
    /// Create an emitter with the default configuration.
    pub fn new() -> Self {
        EmitterBuilder::new().build()
    }

    /// Start configuring an emitter.
    pub fn builder() -> EmitterBuilder {
        EmitterBuilder::new()
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Register `listener` for `event`, after any listeners already there.
    ///
    /// Returns the identity under which the listener was registered.
    pub fn add_listener<L: AsListener>(
        &self,
        event: &str,
        listener: L,
    ) -> Result<ListenerId, EmitterError> {
        check_name(event)?;
        let listener = listener.as_listener().ok_or(EmitterError::NotCallable)?;
        let id = listener.id();

        // The replaced set is dropped after the shard lock is released, so
        // destructors of captured values may call back into the emitter.
        let replaced = match self.listeners.entry(event.to_owned()) {
            Entry::Occupied(mut entry) => {
                if entry.get().iter().any(|existing| existing.id() == id) {
                    return Err(EmitterError::DuplicateListener {
                        event: event.to_owned(),
                    });
                }
                if self.single_listener {
                    return Err(EmitterError::EventExists {
                        event: event.to_owned(),
                    });
                }
                let set: ListenerSet = entry
                    .get()
                    .iter()
                    .cloned()
                    .chain(std::iter::once(listener.clone()))
                    .collect();
                Some(entry.insert(set))
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::from([listener.clone()]));
                None
            }
        };
        drop(replaced);

        debug!(event, listener = %id, signature = %listener.signature(), "listener registered");
        Ok(id)
    }

    /// Alias for [`add_listener`](Self::add_listener).
    pub fn on<L: AsListener>(&self, event: &str, listener: L) -> Result<ListenerId, EmitterError> {
        self.add_listener(event, listener)
    }

    /// Remove `listener` from `event`.
    ///
    /// Exactly one entry is removed. Removing the last listener of an event
    /// removes the event.
    pub fn remove_listener<L: AsListener>(
        &self,
        event: &str,
        listener: L,
    ) -> Result<(), EmitterError> {
        check_name(event)?;
        let id = listener.as_listener().ok_or(EmitterError::NotCallable)?.id();
        self.remove_listener_id(event, id)
    }

    /// Alias for [`remove_listener`](Self::remove_listener).
    pub fn off<L: AsListener>(&self, event: &str, listener: L) -> Result<(), EmitterError> {
        self.remove_listener(event, listener)
    }

    /// Remove the listener registered under `id` from `event`.
    pub fn remove_listener_id(&self, event: &str, id: ListenerId) -> Result<(), EmitterError> {
        check_name(event)?;
        let unknown = || EmitterError::UnknownEvent {
            event: event.to_owned(),
        };

        let replaced = {
            let Entry::Occupied(mut entry) = self.listeners.entry(event.to_owned()) else {
                return Err(unknown());
            };
            let Some(position) = entry.get().iter().position(|l| l.id() == id) else {
                return Err(unknown());
            };

            if entry.get().len() == 1 {
                entry.remove()
            } else {
                let set: ListenerSet = entry
                    .get()
                    .iter()
                    .enumerate()
                    .filter(|(index, _)| *index != position)
                    .map(|(_, listener)| listener.clone())
                    .collect();
                entry.insert(set)
            }
        };
        // Possibly the last handle of the removed listener: drop it unlocked.
        drop(replaced);

        debug!(event, listener = %id, "listener removed");
        Ok(())
    }

    /// Remove the listeners of the given events, or of every event when
    /// `events` is empty.
    ///
    /// Never fails; names without listeners are ignored.
    pub fn remove_all_listeners<I, S>(&self, events: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut events = events.into_iter().peekable();
        if events.peek().is_none() {
            // `DashMap::clear` drops values under the shard locks; `remove`
            // hands each set back once its shard is unlocked.
            for event in self.event_names() {
                drop(self.listeners.remove(&event));
            }
            debug!("all listeners removed");
            return;
        }
        for event in events {
            let event = event.as_ref();
            if self.listeners.remove(event).is_some() {
                debug!(event, "event cleared");
            }
        }
    }

    /// Alias for [`remove_all_listeners`](Self::remove_all_listeners).
    pub fn clear<I, S>(&self, events: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.remove_all_listeners(events)
    }

    /// Remove every event and its listeners.
    pub fn clear_all(&self) {
        self.remove_all_listeners(std::iter::empty::<&str>())
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Names of every event that currently has at least one listener.
    ///
    /// No particular order.
    pub fn event_names(&self) -> Vec<String> {
        self.listeners
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// The listeners of `event`, in registration order.
    pub fn listeners(&self, event: &str) -> Result<Vec<Listener>, EmitterError> {
        Ok(self.snapshot(event)?.to_vec())
    }

    /// The number of listeners of `event`.
    pub fn listener_count(&self, event: &str) -> Result<usize, EmitterError> {
        Ok(self.snapshot(event)?.len())
    }

    /// Whether `event` has at least one listener.
    pub fn has_listeners(&self, event: &str) -> bool {
        self.listeners.contains_key(event)
    }

    /// Number of events with listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Whether no event has listeners.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    fn snapshot(&self, event: &str) -> Result<ListenerSet, EmitterError> {
        check_name(event)?;
        self.listeners
            .get(event)
            .map(|set| Arc::clone(set.value()))
            .ok_or_else(|| EmitterError::UnknownEvent {
                event: event.to_owned(),
            })
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Emit `event` asynchronously.
    ///
    /// Each listener is validated against `args` on the calling thread, in
    /// registration order, then handed to the configured [`Spawn`]er. The
    /// call returns without waiting for any listener.
    ///
    /// # Panics
    ///
    /// If a listener's signature cannot accept `args`. Listeners after it
    /// are not scheduled; listeners before it already were.
    pub fn emit(&self, event: &str, args: Vec<Arg>) -> Result<(), EmitterError> {
        let listeners = self.snapshot(event)?;
        let args: Arc<[Arg]> = args.into();
        trace!(event, listeners = listeners.len(), args = args.len(), mode = "async", "emitting");

        let event: Arc<str> = Arc::from(event);
        for listener in listeners.iter() {
            if let Err(err) = listener.check(&event, &args) {
                abort_emission(err);
            }
            let listener = listener.clone();
            let args = Arc::clone(&args);
            let event = Arc::clone(&event);
            self.spawner.spawn(Box::new(move || {
                if let Err(err) = listener.invoke(&event, &args) {
                    abort_emission(err);
                }
            }));
        }
        Ok(())
    }

    /// Alias for [`emit`](Self::emit).
    pub fn emit_async(&self, event: &str, args: Vec<Arg>) -> Result<(), EmitterError> {
        self.emit(event, args)
    }

    /// Emit `event` synchronously.
    ///
    /// Each listener is validated and invoked in registration order on the
    /// calling thread. Returns once the last listener has returned.
    ///
    /// # Panics
    ///
    /// If a listener's signature cannot accept `args`. Listeners after it
    /// are not invoked.
    pub fn emit_sync(&self, event: &str, args: Vec<Arg>) -> Result<(), EmitterError> {
        let listeners = self.snapshot(event)?;
        trace!(event, listeners = listeners.len(), args = args.len(), mode = "sync", "emitting");

        for listener in listeners.iter() {
            if let Err(err) = listener.try_call(event, &args) {
                abort_emission(err);
            }
        }
        Ok(())
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("events", &self.listeners.len())
            .field("single_listener", &self.single_listener)
            .finish_non_exhaustive()
    }
}

fn check_name(event: &str) -> Result<(), EmitterError> {
    if event.is_empty() {
        return Err(EmitterError::EmptyName);
    }
    Ok(())
}

/// Panics with the [`SignatureError`] itself as payload, so callers that
/// catch the unwind can downcast it.
#[track_caller]
fn abort_emission(err: SignatureError) -> ! {
    error!(%err, "listener signature rejected emitted arguments");
    std::panic::panic_any(err)
}

// ============================================================================
// EmitterBuilder - configuration
// ============================================================================

/// Builder for configuring an [`Emitter`].
///
/// # Example
///
/// ```rust,ignore
/// let emitter = Emitter::builder()
///     .single_listener(true)
///     .spawner(ThreadSpawner)
///     .build();
/// ```
pub struct EmitterBuilder {
    single_listener: bool,
    spawner: Arc<dyn Spawn>,
}

impl EmitterBuilder {
    /// Create a builder with the default configuration: many listeners per
    /// event, [`AutoSpawner`] for asynchronous emission.
    pub fn new() -> Self {
        Self {
            single_listener: false,
            spawner: Arc::new(AutoSpawner),
        }
    }

    /// Restrict every event to a single listener.
    ///
    /// A second registration for an event then fails with
    /// [`EmitterError::EventExists`].
    pub fn single_listener(mut self, enabled: bool) -> Self {
        self.single_listener = enabled;
        self
    }

    /// Set the strategy [`Emitter::emit`] uses to run listeners.
    pub fn spawner<S: Spawn>(mut self, spawner: S) -> Self {
        self.spawner = Arc::new(spawner);
        self
    }

    /// Build the emitter.
    pub fn build(self) -> Emitter {
        Emitter {
            listeners: DashMap::new(),
            single_listener: self.single_listener,
            spawner: self.spawner,
        }
    }
}

impl Default for EmitterBuilder {
    fn default() -> Self {
        Self::new()
    }
}
