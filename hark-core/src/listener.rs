//! # Listener handles
//!
//! A [`Listener`] is a registered callable: a type-erased callback plus
//! the [`Signature`] it was declared with. Listeners are cheap handles;
//! cloning one shares both the callback and its identity.
//!
//! # Identity
//!
//! The registry deduplicates and removes listeners by [`ListenerId`], not
//! by behavior. Two closures with identical bodies are two listeners. A
//! clone is the same listener. [`Listener::alias`] gives a new identity to
//! the same callback, so one function can be registered twice on purpose.

use crate::{
    arg::{Arg, ArgType},
    callback::{Callback, VariadicCallback},
    error::{ExtractError, SignatureError},
    signature::Signature,
};
use std::{
    borrow::Cow,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity token of a [`Listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        ListenerId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

type ErasedCallback = dyn Fn(&[Arg]) -> Result<(), ExtractError> + Send + Sync;

struct Inner {
    signature: Signature,
    callback: Box<ErasedCallback>,
}

/// A callable registered (or registrable) for an event.
///
/// # Example
///
/// ```rust,ignore
/// let on_login = Listener::new(|user: u64, name: String| {
///     println!("{user} logged in as {name}");
/// });
///
/// emitter.on("login", &on_login)?;
/// emitter.emit_sync("login", args![7_u64, "alice".to_string()])?;
/// emitter.off("login", &on_login)?;
/// ```
#[derive(Clone)]
pub struct Listener {
    id: ListenerId,
    inner: Arc<Inner>,
}

impl Listener {
    /// Wrap a closure with a fixed parameter list.
    pub fn new<F, Args>(callback: F) -> Self
    where
        F: Callback<Args>,
        Args: 'static,
    {
        Self::from_parts(F::signature(), Box::new(move |args: &[Arg]| callback.invoke(args)))
    }

    /// Wrap a closure whose last parameter is a [`Rest`] tail.
    ///
    /// [`Rest`]: crate::Rest
    pub fn variadic<F, Args>(callback: F) -> Self
    where
        F: VariadicCallback<Args>,
        Args: 'static,
    {
        Self::from_parts(F::signature(), Box::new(move |args: &[Arg]| callback.invoke(args)))
    }

    /// Wrap a closure over the raw argument slice with an explicit signature.
    ///
    /// The emitter validates `args` against `signature` before calling
    /// `callback`, so the closure can rely on the declared shape.
    pub fn from_raw<F>(signature: Signature, callback: F) -> Self
    where
        F: Fn(&[Arg]) + Send + Sync + 'static,
    {
        Self::from_parts(
            signature,
            Box::new(move |args: &[Arg]| {
                callback(args);
                Ok(())
            }),
        )
    }

    fn from_parts(signature: Signature, callback: Box<ErasedCallback>) -> Self {
        Self {
            id: ListenerId::next(),
            inner: Arc::new(Inner {
                signature,
                callback,
            }),
        }
    }

    /// A new listener identity over the same callback.
    pub fn alias(&self) -> Self {
        Self {
            id: ListenerId::next(),
            inner: Arc::clone(&self.inner),
        }
    }

    /// The identity of this listener.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether `other` is the same listener.
    pub fn same_as(&self, other: &Listener) -> bool {
        self.id == other.id
    }

    /// The declared signature.
    pub fn signature(&self) -> &Signature {
        &self.inner.signature
    }

    /// Validate `args` against the signature without invoking.
    pub fn check(&self, event: &str, args: &[Arg]) -> Result<(), SignatureError> {
        self.inner.signature.check(event, args)
    }

    /// Invoke with `args`, assuming they were already validated.
    pub fn invoke(&self, event: &str, args: &[Arg]) -> Result<(), SignatureError> {
        (self.inner.callback)(args).map_err(|err| err.into_signature_error(event))
    }

    /// Validate and then invoke.
    pub fn try_call(&self, event: &str, args: &[Arg]) -> Result<(), SignatureError> {
        self.check(event, args)?;
        self.invoke(event, args)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("signature", &format_args!("{}", self.inner.signature))
            .finish()
    }
}

impl ArgType for Listener {
    fn type_name() -> Cow<'static, str> {
        Cow::Borrowed("Listener")
    }
}

/// A value that may or may not hold a [`Listener`].
///
/// Registry operations accept any `AsListener` so dynamically typed values
/// (an [`Arg`], an `Option`) can be offered as listeners. Values that do not
/// hold one are rejected with [`EmitterError::NotCallable`].
///
/// [`EmitterError::NotCallable`]: crate::EmitterError::NotCallable
pub trait AsListener {
    /// The listener held by this value, if any.
    fn as_listener(&self) -> Option<&Listener>;
}

impl AsListener for Listener {
    fn as_listener(&self) -> Option<&Listener> {
        Some(self)
    }
}

impl AsListener for Arg {
    fn as_listener(&self) -> Option<&Listener> {
        self.downcast_ref::<Listener>()
    }
}

impl<T: AsListener> AsListener for Option<T> {
    fn as_listener(&self) -> Option<&Listener> {
        self.as_ref().and_then(AsListener::as_listener)
    }
}

impl<T: AsListener + ?Sized> AsListener for &T {
    fn as_listener(&self) -> Option<&Listener> {
        (**self).as_listener()
    }
}

/// Returns `true` only for values holding a callable listener.
pub fn is_callable<L: AsListener + ?Sized>(value: &L) -> bool {
    value.as_listener().is_some()
}

/// The identity token of a listener value, or `None` if it is not callable.
pub fn identity_of<L: AsListener + ?Sized>(value: &L) -> Option<ListenerId> {
    value.as_listener().map(Listener::id)
}
