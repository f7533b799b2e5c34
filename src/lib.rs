//! # busline
//!
//! **Busline** is an in-process publish/subscribe event bus for Rust.
//!
//! Components ("subscribers") declare handler methods for specific event
//! types; any producer posts a plain event value and every currently
//! registered matching handler receives it, with no coupling between the two
//! sides. Delivery is best-effort, in-process, at-most-once per subscription,
//! and fully serialized through one dedicated worker thread per bus.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!  ┌────────────┐  ┌────────────┐  ┌────────────┐
//!  │ producer 1 │  │ producer 2 │  │ handler on │   (a handler may post
//!  │ (thread A) │  │ (thread B) │  │ the worker │    follow-up events)
//!  └─────┬──────┘  └─────┬──────┘  └─────┬──────┘
//!        │ post          │ post          │ post
//!        ▼               ▼               ▼
//!  [thread-local FIFO per posting thread, drained without recursion]
//!        │               │               │
//!        └───────────────┼───────────────┘
//!                        ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  EventBus                                                 │
//! │  - discovery: per-type handler tables, cached for the     │
//! │    process lifetime                                       │
//! │  - SubscriptionRegistry: event type → subscription        │
//! │    snapshots + reverse index, one exclusive lock          │
//! │  - DispatchEngine: snapshot reads (no lock) → invocation  │
//! │    requests                                               │
//! └──────────────────────────┬────────────────────────────────┘
//!                            ▼
//!                 [worker queue, unbounded]
//!                            ▼
//!                  worker thread (one per bus)
//!                  runs handlers one at a time,
//!                  in submission order, panics
//!                  caught and logged
//! ```
//!
//! ### Guarantees
//! - **Total order**: all handler invocations of a bus execute in worker
//!   submission order.
//! - **Per-thread FIFO**: events generated by one thread (including events a
//!   handler posts from inside its own invocation) go out in generation
//!   order, at constant stack depth.
//! - **Exact-type matching**: an event reaches handlers declared for its own
//!   concrete type only.
//! - **Fire-and-forget posting**: `post` never blocks on handler execution
//!   and never fails.
//!
//! ## Features
//! | Area               | Description                                                | Key types / traits            |
//! |--------------------|------------------------------------------------------------|-------------------------------|
//! | **Subscriber API** | Declare typed handler methods per subscriber type.         | [`Subscriber`], [`HandlerTable`] |
//! | **Posting**        | Fire-and-forget event publication from any thread.         | [`EventBus::post`], [`Event`] |
//! | **Registry**       | Register/unregister instances; membership checks.          | [`EventBus::register`]        |
//! | **Errors**         | Typed registration failures with log-friendly labels.      | [`RegisterError`], [`ConfigError`] |
//! | **Configuration**  | Name instance-scoped buses and their worker threads.       | [`BusConfig`]                 |
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use busline::{BusConfig, EventBus, HandlerTable, Subscriber};
//!
//! struct MessagePosted {
//!     text: String,
//! }
//!
//! struct ChatLog {
//!     lines: Mutex<Vec<String>>,
//! }
//!
//! impl ChatLog {
//!     fn on_message(&self, event: &MessagePosted) {
//!         self.lines.lock().unwrap().push(event.text.clone());
//!     }
//! }
//!
//! impl Subscriber for ChatLog {
//!     fn handlers(table: &mut HandlerTable<Self>) {
//!         table.on("on_message", ChatLog::on_message);
//!     }
//! }
//!
//! fn main() -> Result<(), busline::RegisterError> {
//!     // Instance-scoped bus; `EventBus::global()` is the process-wide one.
//!     let bus = EventBus::new(BusConfig::default());
//!
//!     let log = Arc::new(ChatLog { lines: Mutex::new(Vec::new()) });
//!     bus.register(&log)?;
//!
//!     bus.post(MessagePosted { text: "hi".into() });
//!     // `post` has already returned; delivery happens on the bus's worker
//!     // thread. Dropping the bus joins that thread after the queue drains.
//!     drop(bus);
//!     assert_eq!(*log.lines.lock().unwrap(), ["hi"]);
//!     Ok(())
//! }
//! ```

mod core;
mod dispatch;
mod error;
mod events;
mod subscribers;

// ---- Public re-exports ----

pub use crate::core::{BusConfig, EventBus};
pub use crate::error::{ConfigError, RegisterError};
pub use crate::events::{Event, TypeToken};
pub use crate::subscribers::{HandlerDef, HandlerTable, Subscriber};
