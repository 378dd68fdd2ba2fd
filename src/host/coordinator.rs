// Coordinator - routes all host object access through one dedicated thread
//
// The host's project/solution/build model is affine to a single logical
// thread. The Coordinator owns that thread: the host object graph is
// constructed on it, and every read or mutation arrives as a boxed closure
// over an mpsc channel, with the result sent back over a oneshot. Background
// workers (file copies, toast rendering) never touch the host directly; they
// marshal back in through `call` only when they need to.

use std::thread;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

type Job<H> = Box<dyn FnOnce(&H) + Send>;

/// The coordination thread has stopped and can no longer run host calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("coordination context has shut down")]
pub struct ContextClosed;

/// Single-threaded executor for all host-touching calls.
///
/// `H` is the host surface type (the extension shell's concrete host, or a
/// test fake). `H` never needs to be `Send`: it is created by the factory on
/// the coordination thread and never leaves it. Only the closures and their
/// results cross threads.
///
/// Dropping the last `Coordinator` clone closes the job channel and lets the
/// thread exit.
pub struct Coordinator<H> {
    job_tx: mpsc::UnboundedSender<Job<H>>,
}

impl<H: 'static> Coordinator<H> {
    /// Start the coordination thread and construct the host graph on it.
    pub fn spawn<F>(factory: F) -> Self
    where
        F: FnOnce() -> H + Send + 'static,
    {
        let (job_tx, mut job_rx) = mpsc::unbounded_channel::<Job<H>>();

        let builder = thread::Builder::new().name("quickbuild-host".to_string());
        let spawned = builder.spawn(move || {
            tracing::debug!("coordination thread started");
            let host = factory();

            while let Some(job) = job_rx.blocking_recv() {
                job(&host);
            }

            tracing::debug!("coordination thread terminated");
        });

        if let Err(e) = spawned {
            // The receiver was dropped with the closure, so every subsequent
            // call reports ContextClosed instead of hanging.
            tracing::error!("failed to start coordination thread: {e}");
        }

        Self { job_tx }
    }

    /// Run a closure against the host on the coordination thread and await
    /// its result.
    pub async fn call<F, R>(&self, f: F) -> Result<R, ContextClosed>
    where
        F: FnOnce(&H) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        let job: Job<H> = Box::new(move |host| {
            // The caller may have stopped waiting; nothing to do about it.
            let _ = reply_tx.send(f(host));
        });

        self.job_tx.send(job).map_err(|_| ContextClosed)?;
        reply_rx.await.map_err(|_| ContextClosed)
    }
}

// Manual Clone implementation to avoid requiring H: Clone
impl<H> Clone for Coordinator<H> {
    fn clone(&self) -> Self {
        Self {
            job_tx: self.job_tx.clone(),
        }
    }
}
