//! # Subscribers: the capability interface and handler discovery.
//!
//! A subscriber is an application object whose concrete type declares which
//! event types it handles. The declaration is explicit (no runtime scanning):
//! the type fills a [`HandlerTable`] once, the bus validates it, and the
//! validated per-type result is cached for the process lifetime.
//!
//! ## Architecture
//! ```text
//! register(Arc<S>)
//!     │
//!     ├─► discovery::find::<S>()
//!     │       ├─ cache hit  ──► Arc<[HandlerMethod]> (shared, permanent)
//!     │       └─ cache miss ──► S::handlers(&mut HandlerTable<S>)
//!     │                            └─ validate: arity == 1, first claim per
//!     │                               event type wins, non-empty
//!     └─► SubscriptionRegistry::register(SubscriberRef, methods)
//! ```
//!
//! ## Contents
//! - [`Subscriber`] capability trait implemented by application types
//! - [`HandlerTable`], [`HandlerDef`] declarative handler descriptors
//! - `discovery` validation + process-wide per-type cache (crate-internal)

pub(crate) mod discovery;
mod handlers;
mod subscriber;

pub use handlers::{HandlerDef, HandlerTable};
pub use subscriber::Subscriber;

pub(crate) use handlers::HandlerMethod;
pub(crate) use subscriber::{SubscriberId, SubscriberRef};
