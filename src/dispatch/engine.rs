//! # Dispatch engine: thread-local posting queues and the drain loop.
//!
//! `post` is split in two halves. The front half runs on the posting thread:
//! append the event to that thread's private FIFO, then drain the FIFO by
//! expanding each entry into per-subscription invocation requests. The back
//! half is the worker thread executing those requests (see `worker`).
//!
//! ## Architecture
//! ```text
//! thread A: post(e1) ─► [A's queue] ─► drain ─┐
//! thread B: post(e2) ─► [B's queue] ─► drain ─┼─► worker queue ─► worker
//! handler (on worker thread):                 │    (submission    thread runs
//!   post(e3) ─► [worker's queue] ─► drain ────┘     order)        one at a time
//! ```
//!
//! ## Rules
//! - **Never blocks on handlers**: draining only reads a registry snapshot and
//!   enqueues requests; the worker runs them later.
//! - **Re-entrancy**: a post landing while its thread is already draining is
//!   appended and picked up by the same outer drain loop instead of recursing.
//!   Stack depth stays constant no matter how events cascade, and events
//!   queued by one thread go out in the order they were generated.
//! - **Active at submission**: retired subscriptions in a still-current
//!   snapshot are skipped here; requests already handed to the worker are not
//!   retracted.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::sync::Arc;

use log::trace;

use crate::core::SubscriptionRegistry;
use crate::dispatch::worker::{Invocation, Worker};
use crate::events::TypeToken;

/// One event waiting on its posting thread, paired with its dispatch key.
struct Posted {
    event_type: TypeToken,
    event: Arc<dyn Any + Send + Sync>,
}

thread_local! {
    /// This thread's pending posts, in generation order.
    static PENDING: RefCell<VecDeque<Posted>> = RefCell::new(VecDeque::new());
    /// Whether a drain loop is already running on this thread.
    static DRAINING: Cell<bool> = const { Cell::new(false) };
}

/// Expands posted events into invocation requests and feeds the worker.
pub(crate) struct DispatchEngine {
    registry: Arc<SubscriptionRegistry>,
    worker: Worker,
}

impl DispatchEngine {
    pub(crate) fn new(registry: Arc<SubscriptionRegistry>, thread_name: String) -> Self {
        Self {
            registry,
            worker: Worker::spawn(thread_name),
        }
    }

    /// Queues an event on the calling thread and drains that thread's queue.
    ///
    /// Returns once every event this thread has generated so far is handed to
    /// the worker; handler execution is not awaited.
    pub(crate) fn post(&self, event_type: TypeToken, event: Arc<dyn Any + Send + Sync>) {
        PENDING.with_borrow_mut(|queue| queue.push_back(Posted { event_type, event }));
        if DRAINING.get() {
            // Nested post: the drain loop below us on this thread's stack
            // will pop it in FIFO order.
            return;
        }

        DRAINING.set(true);
        while let Some(posted) = PENDING.with_borrow_mut(|queue| queue.pop_front()) {
            self.dispatch(posted);
        }
        DRAINING.set(false);
    }

    /// Submits one invocation request per still-active subscription.
    fn dispatch(&self, posted: Posted) {
        let Some(snapshot) = self.registry.snapshot(posted.event_type.id()) else {
            trace!("no subscriptions for {}", posted.event_type);
            return;
        };
        for subscription in snapshot.iter() {
            if !subscription.is_active() {
                continue;
            }
            self.worker.submit(Invocation {
                subscription: Arc::clone(subscription),
                event: Arc::clone(&posted.event),
                event_type: posted.event_type,
            });
        }
    }
}
