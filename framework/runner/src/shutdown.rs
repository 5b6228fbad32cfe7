use crate::executor::Executor;
use latency_bench_core::prelude::InterruptHandle;
use tokio::signal;

/// Listen for Ctrl-C and trip the interrupt handle.
///
/// The run controller observes the signal at the next iteration boundary, so the user
/// gets a graceful finalization with whatever was collected rather than an abrupt exit.
pub(crate) fn start_interrupt_listener(executor: &Executor) -> InterruptHandle {
    let handle = InterruptHandle::default();

    let listener_handle = handle.clone();
    executor.spawn(async move {
        signal::ctrl_c()
            .await
            .expect("Failed to receive Ctrl-C signal");
        listener_handle.interrupt();
        println!("Interrupted by user, finishing up with the observations collected so far...");
    });

    handle
}
