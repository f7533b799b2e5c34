//! # Event values and exact-type dispatch keys.
//!
//! An event is any owned `'static` value that can cross a thread boundary;
//! there is no event base type to implement. Delivery is keyed on the event's
//! concrete type only: posting a value of type `E` reaches handlers declared
//! for exactly `E`, never for a trait object, wrapper, or "parent" type.
//!
//! [`TypeToken`] is the runtime key for that matching: a `TypeId` paired with
//! the type's name so registry errors and logs stay readable. Tokens compare
//! and hash by `TypeId` alone.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Marker for values that can be posted on a bus.
///
/// Blanket-implemented for every `Any + Send + Sync` type, so plain structs
/// work without ceremony:
///
/// ```
/// struct MessagePosted {
///     text: String,
/// }
/// // nothing to implement; `bus.post(MessagePosted { .. })` just works
/// ```
///
/// `Send + Sync` is required because the event is shared with the delivery
/// worker thread and may fan out to several handlers.
pub trait Event: Any + Send + Sync {}

impl<T: Any + Send + Sync> Event for T {}

/// Stable identifier for a concrete Rust type.
///
/// Used as the dispatch key (event type → subscriptions) and as the
/// handler-cache key (subscriber type → handler methods). Carries the type
/// name purely for diagnostics; identity is the [`TypeId`].
#[derive(Clone, Copy, Debug)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// Returns the token for type `T`.
    #[inline]
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The underlying type id.
    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The type's name, as produced by `std::any::type_name`.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
