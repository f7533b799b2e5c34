//! # Handler descriptors: what a subscriber type declares, and what survives
//! validation.
//!
//! A [`HandlerTable`] is the declarative stand-in for scanning a type's
//! methods: each [`HandlerDef`] names one method, lists its declared parameter
//! types, and binds the callable up front, so delivery never performs a method
//! lookup. Validation (in `discovery`) turns accepted defs into
//! [`HandlerMethod`]s, the form the registry and worker operate on.
//!
//! ## Rules
//! - A def's parameter list must have exactly one entry; that entry is the
//!   handler's event type. Defs describing other shapes (mechanically mirrored
//!   from existing method signatures, see [`HandlerDef::with_param`]) are
//!   rejected for the whole type at validation.
//! - [`HandlerMethod`] equality is (declaring type, method name, event type).
//!   The callable takes no part in identity; callable addresses are not stable
//!   enough to compare.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::events::{Event, TypeToken};
use crate::subscribers::Subscriber;

/// Type-erased handler call: `(subscriber instance, event value)`.
pub(crate) type ErasedInvoke =
    Arc<dyn Fn(&(dyn Any + Send + Sync), &(dyn Any + Send + Sync)) + Send + Sync>;

/// Description of one handler method on a subscriber type.
///
/// Built through [`HandlerTable::on`] in the common case. The low-level
/// constructor pair ([`HandlerDef::new`] + [`HandlerDef::with_param`]) exists
/// for descriptor sources that mirror method signatures mechanically, such as
/// macro- or codegen-produced tables.
pub struct HandlerDef {
    pub(crate) method: &'static str,
    pub(crate) params: Vec<TypeToken>,
    pub(crate) invoke: ErasedInvoke,
}

impl HandlerDef {
    /// Describes a single-parameter handler method bound to `handler`.
    ///
    /// The declared parameter type `E` becomes the event type this method is
    /// subscribed to once the table passes validation.
    pub fn new<S: Subscriber, E: Event>(method: &'static str, handler: fn(&S, &E)) -> Self {
        let invoke: ErasedInvoke = Arc::new(move |subscriber, event| {
            let (Some(subscriber), Some(event)) =
                (subscriber.downcast_ref::<S>(), event.downcast_ref::<E>())
            else {
                return;
            };
            handler(subscriber, event);
        });
        Self {
            method,
            params: vec![TypeToken::of::<E>()],
            invoke,
        }
    }

    /// Records an additional declared parameter of type `P` on this method.
    ///
    /// The bus only dispatches single-parameter handlers; a def carrying extra
    /// parameters fails validation for its whole subscriber type, naming the
    /// method. Useful only for tables that mirror real method signatures
    /// one-to-one and rely on validation to report the mismatch.
    pub fn with_param<P: Event>(mut self) -> Self {
        self.params.push(TypeToken::of::<P>());
        self
    }

    /// Name of the described method.
    #[inline]
    pub fn method(&self) -> &'static str {
        self.method
    }
}

/// Ordered collection of [`HandlerDef`]s for one subscriber type.
///
/// Passed to [`Subscriber::handlers`]; the declaration order is preserved and
/// is what "first declaration wins" refers to when two methods claim the same
/// event type.
pub struct HandlerTable<S> {
    defs: Vec<HandlerDef>,
    _subscriber: PhantomData<fn(&S)>,
}

impl<S: Subscriber> HandlerTable<S> {
    pub(crate) fn new() -> Self {
        Self {
            defs: Vec::new(),
            _subscriber: PhantomData,
        }
    }

    /// Declares a handler method: `method` is its name, `handler` the bound
    /// function, and the function's event parameter type is the subscription
    /// key.
    pub fn on<E: Event>(&mut self, method: &'static str, handler: fn(&S, &E)) -> &mut Self {
        self.declare(HandlerDef::new(method, handler))
    }

    /// Declares a pre-built descriptor. Prefer [`HandlerTable::on`].
    pub fn declare(&mut self, def: HandlerDef) -> &mut Self {
        self.defs.push(def);
        self
    }

    pub(crate) fn into_defs(self) -> Vec<HandlerDef> {
        self.defs
    }
}

/// A validated handler method: the unit the registry subscribes and the
/// worker invokes.
pub(crate) struct HandlerMethod {
    declaring: TypeToken,
    method: &'static str,
    event_type: TypeToken,
    invoke: ErasedInvoke,
}

impl HandlerMethod {
    /// Builds from a def that already passed the single-parameter check.
    pub(crate) fn from_def(declaring: TypeToken, def: HandlerDef) -> Self {
        debug_assert_eq!(def.params.len(), 1, "validation must run before from_def");
        Self {
            declaring,
            method: def.method,
            event_type: def.params[0],
            invoke: def.invoke,
        }
    }

    #[inline]
    pub(crate) fn method(&self) -> &'static str {
        self.method
    }

    #[inline]
    pub(crate) fn event_type(&self) -> TypeToken {
        self.event_type
    }

    /// Calls the bound handler with the erased instance and event.
    ///
    /// A type mismatch on either side is a silent no-op; the registry only
    /// pairs a method with instances of its declaring type and events of its
    /// declared event type, so the downcasts hold for every delivered request.
    pub(crate) fn invoke(
        &self,
        subscriber: &(dyn Any + Send + Sync),
        event: &(dyn Any + Send + Sync),
    ) {
        (self.invoke)(subscriber, event);
    }
}

impl PartialEq for HandlerMethod {
    fn eq(&self, other: &Self) -> bool {
        self.declaring == other.declaring
            && self.method == other.method
            && self.event_type == other.event_type
    }
}

impl Eq for HandlerMethod {}

impl Hash for HandlerMethod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaring.hash(state);
        self.method.hash(state);
        self.event_type.hash(state);
    }
}

impl fmt::Display for HandlerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.declaring.name(), self.method)
    }
}

impl fmt::Debug for HandlerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMethod")
            .field("declaring", &self.declaring)
            .field("method", &self.method)
            .field("event_type", &self.event_type)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        hits: std::sync::atomic::AtomicUsize,
    }

    struct Tick;
    struct Tock;

    impl Counter {
        fn on_tick(&self, _event: &Tick) {
            self.hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    impl Subscriber for Counter {
        fn handlers(table: &mut HandlerTable<Self>) {
            table.on("on_tick", Counter::on_tick);
        }
    }

    fn method_for_tick() -> HandlerMethod {
        HandlerMethod::from_def(
            TypeToken::of::<Counter>(),
            HandlerDef::new("on_tick", Counter::on_tick),
        )
    }

    #[test]
    fn test_invoke_downcasts_and_calls() {
        let method = method_for_tick();
        let counter = Counter {
            hits: std::sync::atomic::AtomicUsize::new(0),
        };
        method.invoke(&counter, &Tick);
        method.invoke(&counter, &Tick);
        assert_eq!(counter.hits.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invoke_ignores_foreign_event_type() {
        let method = method_for_tick();
        let counter = Counter {
            hits: std::sync::atomic::AtomicUsize::new(0),
        };
        method.invoke(&counter, &Tock);
        assert_eq!(counter.hits.load(std::sync::atomic::Ordering::SeqCst), 0);
    }

    #[test]
    fn test_equality_ignores_the_callable() {
        let first = method_for_tick();
        let second = method_for_tick();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_with_param_extends_declared_list() {
        let def = HandlerDef::new("on_tick", Counter::on_tick).with_param::<Tock>();
        assert_eq!(def.params.len(), 2);
        assert_eq!(def.method(), "on_tick");
    }
}
