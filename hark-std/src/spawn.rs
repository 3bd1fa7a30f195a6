//! Spawning strategies for asynchronous emission.
//!
//! [`Emitter::emit`] hands every validated listener invocation to a
//! [`Spawn`] implementation and returns immediately. The strategy decides
//! where the invocation runs; none of them report back to the emitter.
//!
//! | Spawner | Runs listeners on |
//! |---------|-------------------|
//! | [`AutoSpawner`] | Tokio's blocking pool when called inside a runtime, a new thread otherwise |
//! | [`ThreadSpawner`] | A new detached OS thread per invocation |
//! | [`TokioSpawner`] | The blocking pool of a given runtime (feature `tokio`) |
//!
//! [`Emitter::emit`]: crate::Emitter::emit

/// A unit of work handed to a spawner: one listener invocation.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Strategy for running a listener invocation independently of the caller.
///
/// Implementations must not block on the job. Failures inside the job
/// (panics) are the implementation's to report, not the emitter's.
pub trait Spawn: Send + Sync + 'static {
    /// Run `job` on an independently scheduled unit of execution.
    fn spawn(&self, job: Job);
}

impl<F> Spawn for F
where
    F: Fn(Job) + Send + Sync + 'static,
{
    fn spawn(&self, job: Job) {
        (self)(job)
    }
}

/// Spawns one detached OS thread per invocation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSpawner;

impl Spawn for ThreadSpawner {
    fn spawn(&self, job: Job) {
        let spawned = std::thread::Builder::new()
            .name("hark-listener".into())
            .spawn(job);
        if let Err(err) = spawned {
            tracing::error!(%err, "failed to spawn listener thread");
        }
    }
}

/// Runs invocations on the blocking pool of a Tokio runtime.
///
/// Listeners are plain synchronous closures, so they go to
/// `spawn_blocking` rather than onto the async worker threads.
#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct TokioSpawner {
    handle: tokio::runtime::Handle,
}

#[cfg(feature = "tokio")]
impl TokioSpawner {
    /// Spawn onto the runtime behind `handle`.
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Spawn onto the runtime the caller is currently running in.
    ///
    /// Returns `None` outside of a runtime.
    pub fn current() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self::new)
    }
}

#[cfg(feature = "tokio")]
impl Spawn for TokioSpawner {
    fn spawn(&self, job: Job) {
        // The JoinHandle is dropped: a panicking listener is unobserved.
        drop(self.handle.spawn_blocking(job));
    }
}

/// The default spawner.
///
/// Uses the current Tokio runtime when there is one (feature `tokio`),
/// otherwise falls back to [`ThreadSpawner`].
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoSpawner;

#[cfg(feature = "tokio")]
impl Spawn for AutoSpawner {
    fn spawn(&self, job: Job) {
        match TokioSpawner::current() {
            Some(runtime) => runtime.spawn(job),
            None => {
                tracing::trace!("no tokio runtime, spawning a thread");
                ThreadSpawner.spawn(job)
            }
        }
    }
}

#[cfg(not(feature = "tokio"))]
impl Spawn for AutoSpawner {
    fn spawn(&self, job: Job) {
        ThreadSpawner.spawn(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_thread_spawner_runs_job() {
        let (tx, rx) = mpsc::channel();
        ThreadSpawner.spawn(Box::new(move || tx.send(7).unwrap()));
        assert_eq!(rx.recv().unwrap(), 7);
    }

    #[test]
    fn test_auto_spawner_outside_runtime() {
        let (tx, rx) = mpsc::channel();
        AutoSpawner.spawn(Box::new(move || {
            tx.send(std::thread::current().name().map(str::to_owned))
                .unwrap()
        }));
        assert_eq!(rx.recv().unwrap().as_deref(), Some("hark-listener"));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn test_auto_spawner_inside_runtime() {
        let (tx, rx) = tokio::sync::oneshot::channel();
        AutoSpawner.spawn(Box::new(move || {
            let _ = tx.send(std::thread::current().name().map(str::to_owned));
        }));
        let name = rx.await.unwrap();
        assert_ne!(name.as_deref(), Some("hark-listener"));
    }

    #[test]
    fn test_closure_spawner() {
        let inline = |job: Job| job();
        let (tx, rx) = mpsc::channel();
        inline.spawn(Box::new(move || tx.send(()).unwrap()));
        assert!(rx.try_recv().is_ok());
    }
}
