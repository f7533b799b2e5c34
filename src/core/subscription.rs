//! # One subscriber bound to one handler method.
//!
//! A [`Subscription`] is the registry's record pairing a subscriber instance
//! with one validated handler method. It is created by `register`, retired
//! (liveness flag off) and dropped from the published snapshot by
//! `unregister`, and never otherwise mutated. Dispatch iterates snapshots
//! that may outlive a concurrent removal; the flag is what keeps a
//! half-removed entry from being submitted.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::subscribers::{HandlerMethod, SubscriberId, SubscriberRef};

/// Registry record binding a subscriber instance to a handler method.
///
/// Equality is (subscriber identity, handler method); the liveness flag takes
/// no part in it.
pub(crate) struct Subscription {
    subscriber: SubscriberRef,
    method: Arc<HandlerMethod>,
    active: AtomicBool,
}

impl Subscription {
    pub(crate) fn new(subscriber: SubscriberRef, method: Arc<HandlerMethod>) -> Self {
        Self {
            subscriber,
            method,
            active: AtomicBool::new(true),
        }
    }

    #[inline]
    pub(crate) fn subscriber_id(&self) -> SubscriberId {
        self.subscriber.id()
    }

    #[inline]
    pub(crate) fn method(&self) -> &HandlerMethod {
        &self.method
    }

    /// Still part of the registry? Checked when invocation requests are
    /// submitted; requests already queued run regardless.
    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Marks the subscription removed. Called just before it leaves the
    /// published snapshot, so concurrent snapshot readers skip it.
    #[inline]
    pub(crate) fn retire(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Invokes the bound handler with `event`.
    pub(crate) fn invoke(&self, event: &(dyn Any + Send + Sync)) {
        self.method.invoke(self.subscriber.instance(), event);
    }
}

impl PartialEq for Subscription {
    fn eq(&self, other: &Self) -> bool {
        self.subscriber.id() == other.subscriber.id() && *self.method == *other.method
    }
}

impl Eq for Subscription {}
