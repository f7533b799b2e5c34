//! # Bus configuration.
//!
//! [`BusConfig`] carries the instance-level settings a bus is constructed
//! with. The delivery model itself is not configurable: one worker thread,
//! unbounded queue, exact-type matching.

/// Configuration for one bus instance.
///
/// ## Field semantics
/// - `name`: identifies the bus in logs and names its delivery thread
///   (`"<name>-dispatch"`). Useful when an application runs instance-scoped
///   buses next to the process-wide one.
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Bus name; also the prefix of the delivery thread's name.
    pub name: String,
}

impl BusConfig {
    /// Creates a config with the given bus name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The OS thread name for this bus's delivery worker.
    #[inline]
    pub(crate) fn worker_thread_name(&self) -> String {
        format!("{}-dispatch", self.name)
    }
}

impl Default for BusConfig {
    /// Default configuration: `name = "busline"`.
    fn default() -> Self {
        Self {
            name: "busline".to_string(),
        }
    }
}
