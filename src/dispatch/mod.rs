//! Dispatch: from a `post` call to handler execution.
//!
//! Internal modules:
//! - [`engine`]: thread-local re-entrant queueing and the drain loop that
//!   turns posted events into invocation requests;
//! - [`worker`]: the one dedicated thread per bus that executes requests in
//!   submission order with panic isolation.

mod engine;
mod worker;

pub(crate) use engine::DispatchEngine;
