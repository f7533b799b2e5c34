//! # Subscriber capability interface and instance identity.
//!
//! A subscriber type opts into the bus by implementing [`Subscriber`] and
//! describing its handler methods in a [`HandlerTable`]. The description is a
//! property of the concrete type, not of any particular instance, which is what
//! lets the bus validate and cache it once per type for the process lifetime.
//!
//! ## Rules
//! - Only the type's own declared table is consulted; nothing is inherited
//!   from blanket impls or wrapper types (documented limitation, by parity
//!   with the declared-methods-only scan this replaces).
//! - Instance identity is reference identity: the same `Arc` registered twice
//!   is a duplicate, two separate allocations of the same type are not.
//!
//! ## Example
//! ```
//! use busline::{HandlerTable, Subscriber};
//!
//! struct MessagePosted { text: String }
//!
//! struct ChatView;
//!
//! impl ChatView {
//!     fn on_message(&self, event: &MessagePosted) {
//!         let _ = &event.text;
//!     }
//! }
//!
//! impl Subscriber for ChatView {
//!     fn handlers(table: &mut HandlerTable<Self>) {
//!         table.on("on_message", ChatView::on_message);
//!     }
//! }
//! ```

use std::any::{type_name, Any};
use std::sync::Arc;

use crate::subscribers::HandlerTable;

/// A type that owns handler methods for specific event types.
///
/// Implementations fill the [`HandlerTable`] with one entry per handler
/// method. The table is read once per concrete type, validated, and cached
/// for the rest of the process; the handler set of a type is therefore fixed
/// at compile time, exactly as the caching contract assumes.
pub trait Subscriber: Send + Sync + 'static {
    /// Describes this type's handler methods.
    ///
    /// Called by the bus during the first registration of each concrete type.
    /// Declaration order matters twice: it is the delivery order of a single
    /// event to multiple methods (trivially, since at most one method per
    /// event type survives validation), and the first declaration wins when
    /// two methods claim the same event type.
    fn handlers(table: &mut HandlerTable<Self>)
    where
        Self: Sized;
}

/// Reference identity of a registered subscriber instance.
///
/// Derived from the `Arc` data pointer; stable while the registry keeps the
/// instance alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SubscriberId(usize);

impl SubscriberId {
    pub(crate) fn of<S: Subscriber>(subscriber: &Arc<S>) -> Self {
        Self(Arc::as_ptr(subscriber) as usize)
    }
}

/// Type-erased handle to a subscriber instance held by the registry.
///
/// Keeps the instance alive while registered. Forgetting to unregister keeps
/// it alive forever; the bus has no way to detect that leak.
#[derive(Clone)]
pub(crate) struct SubscriberRef {
    instance: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    id: SubscriberId,
}

impl SubscriberRef {
    pub(crate) fn new<S: Subscriber>(subscriber: Arc<S>) -> Self {
        let id = SubscriberId::of(&subscriber);
        Self {
            instance: subscriber,
            type_name: type_name::<S>(),
            id,
        }
    }

    #[inline]
    pub(crate) fn id(&self) -> SubscriberId {
        self.id
    }

    #[inline]
    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub(crate) fn instance(&self) -> &(dyn Any + Send + Sync) {
        self.instance.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    struct Ping;

    impl Probe {
        fn on_ping(&self, _event: &Ping) {}
    }

    impl Subscriber for Probe {
        fn handlers(table: &mut HandlerTable<Self>) {
            table.on("on_ping", Probe::on_ping);
        }
    }

    #[test]
    fn test_identity_is_per_instance_not_per_type() {
        let first = Arc::new(Probe);
        let second = Arc::new(Probe);
        assert_eq!(SubscriberId::of(&first), SubscriberId::of(&first));
        assert_ne!(SubscriberId::of(&first), SubscriberId::of(&second));
    }

    #[test]
    fn test_ref_preserves_identity_through_erasure() {
        let probe = Arc::new(Probe);
        let id = SubscriberId::of(&probe);
        let erased = SubscriberRef::new(Arc::clone(&probe));
        assert_eq!(erased.id(), id);
        assert!(erased.type_name().ends_with("Probe"));
    }
}
