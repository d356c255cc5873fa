use std::future::{Future, IntoFuture};

use futures::future::BoxFuture;
use tokio::runtime;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

enum State<T> {
    Pending(BoxFuture<'static, Result<T>>),
    Failed(Error),
}

/// One pending remote call, executable exactly once.
///
/// An action is either `Pending`, holding the deferred call, or `Failed`,
/// holding an error that occurred before any request could be made (for
/// example while resolving an upload source). The state is decided at
/// construction and never changes.
///
/// Every way of executing an action consumes it, so a second execution of
/// the same action is a compile error rather than undefined behavior.
/// Dropping an unexecuted action abandons the call without any I/O.
///
/// Three consumption adapters operate over the same underlying call:
/// awaiting the action (it implements [`IntoFuture`]), blocking with
/// [`execute_sync`], or registering callbacks with [`execute_async`] /
/// [`execute_async_with`].
///
/// [`execute_sync`]: Action::execute_sync
/// [`execute_async`]: Action::execute_async
/// [`execute_async_with`]: Action::execute_async_with
pub struct Action<T> {
    state: State<T>,
}

impl<T: Send + 'static> Action<T> {
    /// Wrap a deferred call.
    pub fn pending<F>(call: F) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            state: State::Pending(Box::pin(call)),
        }
    }

    /// Create an action that is already failed. Executing it surfaces the
    /// stored error without touching the transport.
    pub fn failed(error: Error) -> Self {
        Self {
            state: State::Failed(error),
        }
    }

    /// Run the call to completion, blocking the calling thread.
    ///
    /// Inside a multi-thread tokio runtime this parks the current worker via
    /// `block_in_place`; outside any runtime a private current-thread
    /// runtime drives the call. Do not call this on a latency-sensitive
    /// thread (or from a current-thread runtime, where blocking would stall
    /// every other task).
    pub fn execute_sync(self) -> Result<T> {
        match self.state {
            State::Failed(error) => Err(error),
            State::Pending(call) => match runtime::Handle::try_current() {
                Ok(handle) => tokio::task::block_in_place(|| handle.block_on(call)),
                Err(_) => runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("failed to start blocking runtime")
                    .block_on(call),
            },
        }
    }

    /// Schedule the call on the current tokio runtime and return
    /// immediately. A failure is silently dropped; use
    /// [`execute_async_with`] to observe it.
    ///
    /// Returns the spawned task's handle, which can be used to abort the
    /// in-flight call, or `None` when the action was already failed (in
    /// which case nothing is spawned).
    ///
    /// [`execute_async_with`]: Action::execute_async_with
    pub fn execute_async<S>(self, on_success: S) -> Option<JoinHandle<()>>
    where
        S: FnOnce(T) + Send + 'static,
    {
        self.spawn(on_success, None)
    }

    /// Schedule the call on the current tokio runtime, delivering the
    /// outcome to one of the two callbacks.
    ///
    /// On an already-failed action `on_failure` runs immediately and
    /// synchronously, no task is spawned, and no transport is touched.
    pub fn execute_async_with<S, F>(self, on_success: S, on_failure: F) -> Option<JoinHandle<()>>
    where
        S: FnOnce(T) + Send + 'static,
        F: FnOnce(Error) + Send + 'static,
    {
        self.spawn(on_success, Some(Box::new(on_failure)))
    }

    fn spawn<S>(
        self,
        on_success: S,
        on_failure: Option<Box<dyn FnOnce(Error) + Send>>,
    ) -> Option<JoinHandle<()>>
    where
        S: FnOnce(T) + Send + 'static,
    {
        match self.state {
            State::Failed(error) => {
                if let Some(on_failure) = on_failure {
                    on_failure(error);
                }
                None
            }
            State::Pending(call) => Some(tokio::spawn(async move {
                match call.await {
                    Ok(value) => on_success(value),
                    Err(error) => {
                        if let Some(on_failure) = on_failure {
                            on_failure(error);
                        }
                    }
                }
            })),
        }
    }
}

impl<T: Send + 'static> IntoFuture for Action<T> {
    type Output = Result<T>;
    type IntoFuture = BoxFuture<'static, Result<T>>;

    fn into_future(self) -> Self::IntoFuture {
        match self.state {
            State::Pending(call) => call,
            State::Failed(error) => Box::pin(async move { Err(error) }),
        }
    }
}
