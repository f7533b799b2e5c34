//! # EventBus: the facade composing registry and dispatch.
//!
//! An [`EventBus`] is a cheap-to-clone handle over one subscription registry
//! and one dispatch engine (with its dedicated delivery thread). Applications
//! normally use the process-wide instance behind [`EventBus::global`];
//! instance-scoped buses exist for tests and embedders that want isolation.
//!
//! ## Architecture
//! ```text
//! register(Arc<S>) ──► discovery (per-type cache) ──► registry (both maps,
//!                                                     one exclusive lock)
//! post(event) ──► engine: thread-local FIFO ──► registry snapshot (no lock)
//!                                          └──► worker queue ──► worker thread
//!                                                               runs handlers
//!                                                               one at a time
//! unregister(Arc<S>) ──► registry: retire + republish snapshots
//! ```
//!
//! ## Rules
//! - `register` fails synchronously ([`RegisterError`]); nothing asynchronous
//!   can fail later on its behalf.
//! - `post` is fire-and-forget: no result, no error, no waiting on handlers.
//! - `unregister` and `is_registered` never fail; unregistering an unknown
//!   subscriber is a no-op.
//! - A handler may observe one more event after its subscriber unregisters if
//!   the request was already queued; callers tolerate this race.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::core::config::BusConfig;
use crate::core::registry::SubscriptionRegistry;
use crate::dispatch::DispatchEngine;
use crate::error::RegisterError;
use crate::events::{Event, TypeToken};
use crate::subscribers::{discovery, Subscriber, SubscriberId, SubscriberRef};

static GLOBAL: OnceCell<EventBus> = OnceCell::new();

/// In-process publish/subscribe event bus.
///
/// Clones share the same registry and delivery thread. The delivery thread
/// shuts down once the last handle (including those held indirectly through
/// registered subscribers) is gone; queued invocations still run first.
///
/// ## Example
/// ```
/// use std::sync::{Arc, Mutex};
/// use busline::{BusConfig, EventBus, HandlerTable, Subscriber};
///
/// struct MessagePosted {
///     text: String,
/// }
///
/// struct ChatLog {
///     lines: Mutex<Vec<String>>,
/// }
///
/// impl ChatLog {
///     fn on_message(&self, event: &MessagePosted) {
///         self.lines.lock().unwrap().push(event.text.clone());
///     }
/// }
///
/// impl Subscriber for ChatLog {
///     fn handlers(table: &mut HandlerTable<Self>) {
///         table.on("on_message", ChatLog::on_message);
///     }
/// }
///
/// let bus = EventBus::new(BusConfig::default());
/// let log = Arc::new(ChatLog { lines: Mutex::new(Vec::new()) });
/// bus.register(&log)?;
/// bus.post(MessagePosted { text: "hi".into() });
/// # Ok::<(), busline::RegisterError>(())
/// ```
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

struct BusInner {
    config: BusConfig,
    registry: Arc<SubscriptionRegistry>,
    engine: DispatchEngine,
}

impl EventBus {
    /// Creates an independent bus with its own registry and delivery thread.
    pub fn new(config: BusConfig) -> Self {
        let registry = Arc::new(SubscriptionRegistry::new());
        let engine = DispatchEngine::new(Arc::clone(&registry), config.worker_thread_name());
        Self {
            inner: Arc::new(BusInner {
                config,
                registry,
                engine,
            }),
        }
    }

    /// The process-wide bus, constructed on first use and never torn down.
    ///
    /// This accessor is the only way to reach it; there is no ambient
    /// fallback anywhere else in the crate.
    pub fn global() -> &'static EventBus {
        GLOBAL.get_or_init(|| EventBus::new(BusConfig::default()))
    }

    /// This bus's configured name.
    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    /// Registers a subscriber instance for every event type its concrete type
    /// declares.
    ///
    /// The registry holds a strong reference until [`EventBus::unregister`];
    /// a forgotten unregister keeps the instance alive indefinitely.
    ///
    /// ### Errors
    /// - [`RegisterError::Config`]: the type's handler table is invalid
    ///   (wrong arity, or no handlers at all); no state was touched.
    /// - [`RegisterError::Duplicate`]: this instance is already registered for
    ///   one of its event types; methods committed earlier in this same call
    ///   stay registered.
    pub fn register<S: Subscriber>(&self, subscriber: &Arc<S>) -> Result<(), RegisterError> {
        let methods = discovery::find::<S>()?;
        self.inner
            .registry
            .register(SubscriberRef::new(Arc::clone(subscriber)), &methods)
    }

    /// Removes every subscription of the given instance.
    ///
    /// Never fails; unknown instances are a no-op. Invocation requests already
    /// queued for this subscriber still run.
    pub fn unregister<S: Subscriber>(&self, subscriber: &Arc<S>) {
        self.inner.registry.unregister(SubscriberId::of(subscriber));
    }

    /// Whether the given instance currently has subscriptions on this bus.
    pub fn is_registered<S: Subscriber>(&self, subscriber: &Arc<S>) -> bool {
        self.inner
            .registry
            .is_registered(SubscriberId::of(subscriber))
    }

    /// Posts an event to every handler registered for its exact type.
    ///
    /// Fire-and-forget: returns once the calling thread's queue is drained
    /// into the worker; handler execution happens on the delivery thread.
    /// Posting a type nobody subscribed to is a silent no-op.
    pub fn post<E: Event>(&self, event: E) {
        self.inner.engine.post(TypeToken::of::<E>(), Arc::new(event));
    }

    /// Posts an event that may be absent; `None` is a no-op.
    pub fn post_opt<E: Event>(&self, event: Option<E>) {
        if let Some(event) = event {
            self.post(event);
        }
    }
}
