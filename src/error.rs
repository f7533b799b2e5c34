//! Error types raised by subscriber registration.
//!
//! This module defines two error enums:
//!
//! - [`ConfigError`] — the subscriber type's handler table is unusable.
//! - [`RegisterError`] — everything `register` can fail with: a configuration
//!   problem, or a duplicate subscription.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging and
//! metrics. Posting, unregistering, and membership checks never fail; handler
//! panics are caught at the delivery worker and logged, never surfaced here.

use thiserror::Error;

/// # Errors produced by handler discovery.
///
/// Discovery inspects a subscriber type's declared handler table before any
/// registry state is touched, so none of these leave partial registrations
/// behind.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A described handler method declares a parameter count other than one.
    ///
    /// The single declared parameter is the handler's event type; anything else
    /// makes the whole subscriber type unusable, and discovery aborts at the
    /// first offending method.
    #[error("handler method {declaring}::{method} must declare exactly one event parameter, found {params}")]
    HandlerArity {
        /// Type that declares the offending method.
        declaring: &'static str,
        /// Name of the offending method.
        method: &'static str,
        /// Number of parameters the method declares.
        params: usize,
    },

    /// The subscriber type describes no eligible handler methods at all.
    #[error("subscriber type {subscriber} declares no eligible handler methods")]
    NoHandlers {
        /// The subscriber type that came up empty.
        subscriber: &'static str,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use busline::ConfigError;
    ///
    /// let err = ConfigError::NoHandlers { subscriber: "app::ChatView" };
    /// assert_eq!(err.as_label(), "config_no_handlers");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::HandlerArity { .. } => "config_handler_arity",
            ConfigError::NoHandlers { .. } => "config_no_handlers",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::HandlerArity {
                declaring,
                method,
                params,
            } => {
                format!("invalid handler {declaring}::{method}: declares {params} parameters")
            }
            ConfigError::NoHandlers { subscriber } => {
                format!("no eligible handler methods on {subscriber}")
            }
        }
    }
}

/// # Errors produced by `register`.
///
/// A failed `register` call never reaches any handler; it fails synchronously
/// on the caller's thread. A duplicate failure inside a multi-method batch does
/// not roll back sibling methods committed earlier in the same call.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RegisterError {
    /// The subscriber type's handler table failed validation (see [`ConfigError`]).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An equal (subscriber instance, handler method) pair is already registered.
    ///
    /// Raised when the same instance is registered again without an intervening
    /// unregister.
    #[error("subscriber {subscriber} is already registered for event type {event}")]
    Duplicate {
        /// Concrete type of the subscriber instance.
        subscriber: &'static str,
        /// The event type both registrations target.
        event: &'static str,
    },
}

impl RegisterError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use busline::RegisterError;
    ///
    /// let err = RegisterError::Duplicate {
    ///     subscriber: "app::ChatView",
    ///     event: "app::MessagePosted",
    /// };
    /// assert_eq!(err.as_label(), "register_duplicate");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RegisterError::Config(inner) => inner.as_label(),
            RegisterError::Duplicate { .. } => "register_duplicate",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RegisterError::Config(inner) => inner.as_message(),
            RegisterError::Duplicate { subscriber, event } => {
                format!("duplicate subscription: {subscriber} for {event}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_error_names_the_method() {
        let err = ConfigError::HandlerArity {
            declaring: "app::ChatView",
            method: "on_pair",
            params: 2,
        };
        let text = err.to_string();
        assert!(text.contains("app::ChatView::on_pair"), "got: {text}");
        assert!(text.contains("found 2"), "got: {text}");
    }

    #[test]
    fn test_config_error_converts_into_register_error() {
        let err: RegisterError = ConfigError::NoHandlers {
            subscriber: "app::Silent",
        }
        .into();
        assert_eq!(err.as_label(), "config_no_handlers");
        assert!(err.as_message().contains("app::Silent"));
    }
}
