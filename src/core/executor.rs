use crate::domain::model::Outcome;
use crate::utils::error::{ClientError, Result};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::oneshot;

/// Worker pool that runs dispatched calls. Owns a multi-threaded runtime.
#[derive(Debug)]
pub struct Executor {
    handle: Handle,
    runtime: Option<Runtime>,
}

impl Executor {
    pub fn new(worker_threads: usize) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("tsq-worker")
            .enable_all()
            .build()
            .map_err(|e| ClientError::RuntimeError {
                message: format!("failed to start worker pool: {}", e),
            })?;
        Ok(Self {
            handle: runtime.handle().clone(),
            runtime: Some(runtime),
        })
    }

    /// Runs `future` to completion on the calling thread.
    ///
    /// Blocking inside an async context would stall a runtime worker, so that
    /// case is rejected instead.
    pub fn block_on<F: Future>(&self, future: F) -> Result<F::Output> {
        ensure_blocking_allowed()?;
        Ok(self.handle.block_on(future))
    }

    pub fn spawn<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Detached: the task owns everything it needs.
        drop(self.handle.spawn(future));
    }

    /// Spawns `future` and returns a handle to its result.
    pub fn submit<T, F>(&self, future: F) -> CallHandle<T>
    where
        T: Send + 'static,
        F: Future<Output = Outcome<T>> + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        self.spawn(async move {
            // The caller may have dropped the handle; nothing to report then.
            let _ = sender.send(future.await);
        });
        CallHandle { receiver }
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

fn ensure_blocking_allowed() -> Result<()> {
    if Handle::try_current().is_ok() {
        return Err(ClientError::RuntimeError {
            message: "blocking call made from within an async runtime".to_string(),
        });
    }
    Ok(())
}

/// Pending result of an asynchronous call.
///
/// Await it from async code, or call [`CallHandle::wait`] from a plain thread.
#[derive(Debug)]
pub struct CallHandle<T> {
    receiver: oneshot::Receiver<Outcome<T>>,
}

impl<T> CallHandle<T> {
    pub fn wait(self) -> Outcome<T> {
        ensure_blocking_allowed()?;
        self.receiver.blocking_recv().unwrap_or_else(|_| Err(abandoned()))
    }
}

impl<T> Future for CallHandle<T> {
    type Output = Outcome<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|result| result.unwrap_or_else(|_| Err(abandoned())))
    }
}

fn abandoned() -> ClientError {
    ClientError::RuntimeError {
        message: "call was abandoned before completing".to_string(),
    }
}
