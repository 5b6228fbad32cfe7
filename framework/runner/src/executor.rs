use std::future::Future;

/// Drives the probe client's async code on the runner's Tokio runtime.
#[derive(Debug)]
pub struct Executor {
    runtime: tokio::runtime::Runtime,
}

impl Executor {
    pub fn new(runtime: tokio::runtime::Runtime) -> Self {
        Self { runtime }
    }

    /// Run async code in place, blocking until it completes.
    ///
    /// Futures submitted here are never raced against the interrupt signal: an in-flight
    /// probe always completes or errors before cancellation is observed, which keeps the
    /// durable log consistent with the in-memory series. The run controller samples the
    /// interrupt between corpus items instead.
    pub fn execute_in_place<T>(&self, fut: impl Future<Output = T>) -> T {
        self.runtime.block_on(fut)
    }

    /// Submit async code to be run in the background.
    pub fn spawn(&self, fut: impl Future<Output = ()> + Send + 'static) {
        self.runtime.spawn(fut);
    }
}
