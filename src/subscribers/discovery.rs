//! # Handler discovery and the per-type method cache.
//!
//! Discovery turns a subscriber type's declared [`HandlerTable`] into the
//! validated, ordered handler-method list the registry subscribes. The result
//! is cached per concrete type for the whole process: a type's handler set is
//! fixed, so the first successful discovery is also the last one that does any
//! work.
//!
//! ## Validation
//! In declaration order, for each def:
//! - parameter count != 1 → [`ConfigError::HandlerArity`], aborting the whole
//!   type at the first offender;
//! - event type already claimed by an earlier def → the later def is silently
//!   ignored (at most one handler per event type per concrete type, first
//!   declaration wins);
//! - nothing left at the end → [`ConfigError::NoHandlers`].
//!
//! ## Cache
//! A process-wide concurrent map keyed by the subscriber's `TypeId`,
//! append-only and never evicted. Lookups are lock-free with respect to the
//! registry. Two threads racing the first population both compute the same
//! deterministic result; whichever insert lands last overwrites an equal
//! value, which is harmless. Failed discoveries are not cached, matching the
//! compute-then-store shape this preserves.

use std::any::{type_name, TypeId};
use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::error::ConfigError;
use crate::events::TypeToken;
use crate::subscribers::{HandlerMethod, HandlerTable, Subscriber};

/// Immutable, shared handler-method list for one subscriber type.
pub(crate) type HandlerSet = Arc<[Arc<HandlerMethod>]>;

static HANDLER_CACHE: Lazy<DashMap<TypeId, HandlerSet>> = Lazy::new(DashMap::new);

/// Returns the validated handler methods of `S`, from cache when possible.
pub(crate) fn find<S: Subscriber>() -> Result<HandlerSet, ConfigError> {
    let key = TypeId::of::<S>();
    if let Some(cached) = HANDLER_CACHE.get(&key) {
        return Ok(Arc::clone(cached.value()));
    }

    let methods = collect::<S>()?;
    if methods.is_empty() {
        return Err(ConfigError::NoHandlers {
            subscriber: type_name::<S>(),
        });
    }

    let set: HandlerSet = methods.into();
    HANDLER_CACHE.insert(key, Arc::clone(&set));
    Ok(set)
}

/// Runs the type's table through validation.
fn collect<S: Subscriber>() -> Result<Vec<Arc<HandlerMethod>>, ConfigError> {
    let mut table = HandlerTable::<S>::new();
    S::handlers(&mut table);

    let declaring = TypeToken::of::<S>();
    let mut claimed = HashSet::new();
    let mut methods = Vec::new();
    for def in table.into_defs() {
        if def.params.len() != 1 {
            return Err(ConfigError::HandlerArity {
                declaring: declaring.name(),
                method: def.method,
                params: def.params.len(),
            });
        }
        let event_type = def.params[0];
        if !claimed.insert(event_type.id()) {
            continue;
        }
        methods.push(Arc::new(HandlerMethod::from_def(declaring, def)));
    }
    Ok(methods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscribers::HandlerDef;

    struct Opened;
    struct Closed;

    struct DoorWatcher;

    impl DoorWatcher {
        fn on_opened(&self, _event: &Opened) {}
        fn on_closed(&self, _event: &Closed) {}
    }

    impl Subscriber for DoorWatcher {
        fn handlers(table: &mut HandlerTable<Self>) {
            table
                .on("on_opened", DoorWatcher::on_opened)
                .on("on_closed", DoorWatcher::on_closed);
        }
    }

    struct Echoing;

    impl Echoing {
        fn on_first(&self, _event: &Opened) {}
        fn on_second(&self, _event: &Opened) {}
    }

    impl Subscriber for Echoing {
        fn handlers(table: &mut HandlerTable<Self>) {
            table
                .on("on_first", Echoing::on_first)
                .on("on_second", Echoing::on_second);
        }
    }

    struct TwoParams;

    impl TwoParams {
        fn on_opened(&self, _event: &Opened) {}
    }

    impl Subscriber for TwoParams {
        fn handlers(table: &mut HandlerTable<Self>) {
            table.declare(HandlerDef::new("on_pair", TwoParams::on_opened).with_param::<Closed>());
        }
    }

    struct Silent;

    impl Subscriber for Silent {
        fn handlers(_table: &mut HandlerTable<Self>) {}
    }

    #[test]
    fn test_finds_declared_methods_in_order() {
        let methods = find::<DoorWatcher>().expect("discovery should succeed");
        let names: Vec<_> = methods.iter().map(|m| m.method()).collect();
        assert_eq!(names, ["on_opened", "on_closed"]);
        assert_eq!(methods[0].event_type(), TypeToken::of::<Opened>());
        assert_eq!(methods[1].event_type(), TypeToken::of::<Closed>());
    }

    #[test]
    fn test_first_declaration_wins_per_event_type() {
        let methods = find::<Echoing>().expect("discovery should succeed");
        assert_eq!(methods.len(), 1, "later claim on the same event type is dropped");
        assert_eq!(methods[0].method(), "on_first");
    }

    #[test]
    fn test_two_parameter_method_fails_the_whole_type() {
        let err = find::<TwoParams>().expect_err("arity must be rejected");
        match err {
            ConfigError::HandlerArity {
                method, params, ..
            } => {
                assert_eq!(method, "on_pair");
                assert_eq!(params, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_table_is_a_configuration_error() {
        let err = find::<Silent>().expect_err("empty tables must be rejected");
        assert!(matches!(err, ConfigError::NoHandlers { .. }), "got {err:?}");
    }

    #[test]
    fn test_repeat_lookup_hits_the_cache() {
        let first = find::<DoorWatcher>().expect("discovery should succeed");
        let second = find::<DoorWatcher>().expect("discovery should succeed");
        assert!(
            Arc::ptr_eq(&first[0], &second[0]),
            "cached lookups must share the same methods"
        );
    }
}
