//! # Subscription registry: the two core maps and their protocol.
//!
//! The registry owns all mutable bus state:
//! - `by_event`: event type → immutable, insertion-ordered snapshot of its
//!   subscriptions;
//! - `subscribers`: subscriber identity → event types it is registered for,
//!   the reverse index that makes unregistration proportional to the
//!   subscriber's own type count.
//!
//! ## Locking discipline
//! Every write to either map happens while holding the one exclusive registry
//! lock, and always updates both sides together, so the maps are mutually
//! consistent whenever the lock is free. The dispatch read path never takes
//! that lock: it reads the current snapshot pointer for an event type and
//! iterates it unlocked, while a concurrent register/unregister publishes a
//! replacement snapshot under the lock. A snapshot is never mutated in place.
//!
//! ## Batch semantics
//! `register` inserts a subscriber's methods one by one under the lock and
//! fails fast on the first duplicate; methods committed earlier in the same
//! call stay registered. This is inherited behavior, kept deliberately rather
//! than made transactional.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use log::debug;
use parking_lot::Mutex;

use crate::core::subscription::Subscription;
use crate::error::RegisterError;
use crate::events::TypeToken;
use crate::subscribers::{HandlerMethod, SubscriberId, SubscriberRef};

/// Immutable, shared view of one event type's subscriptions.
pub(crate) type Snapshot = Arc<Vec<Arc<Subscription>>>;

/// Owner of the subscription maps; one per bus instance.
pub(crate) struct SubscriptionRegistry {
    /// Per-event-type snapshots, readable without the registry lock.
    /// Written only while `subscribers` is locked.
    by_event: DashMap<TypeId, Snapshot>,
    /// Reverse index; the mutex doubles as the registry's exclusive lock.
    subscribers: Mutex<HashMap<SubscriberId, Vec<TypeToken>>>,
}

impl SubscriptionRegistry {
    pub(crate) fn new() -> Self {
        Self {
            by_event: DashMap::new(),
            subscribers: Mutex::new(HashMap::new()),
        }
    }

    /// Registers every method of a subscriber as one locked batch.
    ///
    /// On a duplicate, the failing method and everything after it are skipped;
    /// earlier methods from this call remain registered.
    pub(crate) fn register(
        &self,
        subscriber: SubscriberRef,
        methods: &[Arc<HandlerMethod>],
    ) -> Result<(), RegisterError> {
        let mut subscribers = self.subscribers.lock();
        for method in methods {
            self.subscribe_locked(&mut subscribers, &subscriber, method)?;
        }
        debug!(
            "registered {} for {} event type(s)",
            subscriber.type_name(),
            methods.len()
        );
        Ok(())
    }

    /// Inserts one subscription into both maps. Caller holds the lock.
    fn subscribe_locked(
        &self,
        subscribers: &mut HashMap<SubscriberId, Vec<TypeToken>>,
        subscriber: &SubscriberRef,
        method: &Arc<HandlerMethod>,
    ) -> Result<(), RegisterError> {
        let event_type = method.event_type();
        let subscription = Arc::new(Subscription::new(subscriber.clone(), Arc::clone(method)));

        let current = self
            .by_event
            .get(&event_type.id())
            .map(|entry| Arc::clone(entry.value()));
        if let Some(current) = &current {
            if current.iter().any(|existing| **existing == *subscription) {
                return Err(RegisterError::Duplicate {
                    subscriber: subscriber.type_name(),
                    event: event_type.name(),
                });
            }
        }

        let mut next = current.map(|c| c.as_ref().clone()).unwrap_or_default();
        next.push(subscription);
        self.by_event.insert(event_type.id(), Arc::new(next));

        subscribers
            .entry(subscriber.id())
            .or_default()
            .push(event_type);
        Ok(())
    }

    /// Removes every subscription of `id`. Unknown subscribers are a no-op.
    pub(crate) fn unregister(&self, id: SubscriberId) {
        let mut subscribers = self.subscribers.lock();
        let Some(types) = subscribers.remove(&id) else {
            return;
        };
        for event_type in &types {
            self.unsubscribe_locked(id, event_type);
        }
        debug!("unregistered subscriber from {} event type(s)", types.len());
    }

    /// Retires and removes `id`'s subscription for one event type.
    /// Caller holds the lock (the guard lives in `unregister`).
    fn unsubscribe_locked(&self, id: SubscriberId, event_type: &TypeToken) {
        let Some(current) = self
            .by_event
            .get(&event_type.id())
            .map(|entry| Arc::clone(entry.value()))
        else {
            return;
        };
        let mut next = Vec::with_capacity(current.len().saturating_sub(1));
        for subscription in current.iter() {
            if subscription.subscriber_id() == id {
                subscription.retire();
            } else {
                next.push(Arc::clone(subscription));
            }
        }
        self.by_event.insert(event_type.id(), Arc::new(next));
    }

    /// Membership test on the reverse index.
    pub(crate) fn is_registered(&self, id: SubscriberId) -> bool {
        self.subscribers.lock().contains_key(&id)
    }

    /// Current snapshot for an event type; the dispatch read path.
    /// Never takes the registry lock.
    pub(crate) fn snapshot(&self, event_type: TypeId) -> Option<Snapshot> {
        self.by_event
            .get(&event_type)
            .map(|entry| Arc::clone(entry.value()))
    }
}
