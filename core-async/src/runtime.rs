//! Runtime utilities that abstract over the underlying async executor.
//!
//! Native engine delegate callbacks arrive on threads the runtime does not
//! own. Those threads use a [`Handle`] captured at startup to schedule work,
//! never by building ad-hoc runtimes per call.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Runs the provided future to completion on a fresh current-thread runtime.
///
/// Intended for entry points and tests. Calling this from inside a runtime
/// panics, exactly like [`Runtime::block_on`].
pub fn block_on<F>(future: F) -> F::Output
where
    F: std::future::Future,
{
    Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("core_async::runtime::block_on: failed to build Tokio runtime")
        .block_on(future)
}

/// Returns a handle to the runtime driving the current task, if any.
pub fn current_handle() -> Option<Handle> {
    Handle::try_current().ok()
}
