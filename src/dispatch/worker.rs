//! # The single serialized delivery worker.
//!
//! Every handler invocation of a bus runs on one dedicated OS thread, in the
//! exact order the requests reached its queue, one at a time and to
//! completion. Posting threads only enqueue; they never wait for a handler.
//!
//! ## Rules
//! - **Total order**: queue order is execution order, across all posting
//!   threads.
//! - **No retraction**: a queued request always runs, even if its subscriber
//!   was unregistered after submission; callers tolerate one late delivery.
//! - **Panic isolation**: a panicking handler is caught, logged, and skipped;
//!   the worker keeps going and nothing reaches the poster, whose `post` call
//!   returned long ago.
//!
//! ## Lifetime
//! The queue is unbounded: there is no back-pressure in this design, and the
//! worker itself posts re-entrantly into its own queue when a handler calls
//! `post`, so a bounded queue could wedge it against itself. The thread exits
//! after the last queue handle drops and the remaining requests have drained.
//! Dropping the last bus handle joins the worker, unless the drop happens on
//! the worker thread itself (a handler owning the last handle), which
//! detaches instead.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, Sender};
use log::error;

use crate::core::Subscription;
use crate::events::TypeToken;

/// One queued handler call: a subscription plus the event it fires for.
pub(crate) struct Invocation {
    pub(crate) subscription: Arc<Subscription>,
    pub(crate) event: Arc<dyn Any + Send + Sync>,
    pub(crate) event_type: TypeToken,
}

/// Handle to the delivery thread; owned by the dispatch engine.
pub(crate) struct Worker {
    queue: Option<Sender<Invocation>>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Worker {
    /// Spawns the delivery thread under the given name.
    pub(crate) fn spawn(thread_name: String) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        let thread = thread::Builder::new()
            .name(thread_name)
            .spawn(move || run(rx))
            .expect("failed to spawn event delivery worker thread");
        Self {
            queue: Some(tx),
            thread: Some(thread),
        }
    }

    /// Enqueues one invocation request. Never blocks.
    pub(crate) fn submit(&self, invocation: Invocation) {
        if let Some(queue) = &self.queue {
            let _ = queue.send(invocation);
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // Closing the queue lets the thread drain and exit on its own.
        drop(self.queue.take());
        if let Some(thread) = self.thread.take() {
            if thread.thread().id() != thread::current().id() {
                let _ = thread.join();
            }
        }
    }
}

fn run(queue: Receiver<Invocation>) {
    while let Ok(invocation) = queue.recv() {
        deliver(&invocation);
    }
}

fn deliver(invocation: &Invocation) {
    let subscription = &invocation.subscription;
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        subscription.invoke(invocation.event.as_ref());
    }));
    if let Err(payload) = outcome {
        error!(
            "handler {} panicked on {}: {}",
            subscription.method(),
            invocation.event_type,
            panic_message(payload.as_ref())
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
