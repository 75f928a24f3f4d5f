//! Execution event hooks
//!
//! Every command execution fires pre-execute hooks before the statement
//! runs and either post-execute or error hooks afterwards. A registry is
//! shared behind an `Arc` and can be attached to any number of commands,
//! which is how cross-cutting concerns like audit logging or slow-query
//! capture observe traffic without wrapping the command layer.

use super::bind::Parameter;
use super::error::DatabaseError;

/// Snapshot of a command handed to event handlers
#[derive(Debug, Clone, Copy)]
pub struct CommandEvent<'a> {
    /// The accumulated command text, in named-placeholder form
    pub text: &'a str,
    /// The parameters bound on the command
    pub parameters: &'a [Parameter],
}

type PreExecuteHandler = Box<dyn Fn(&CommandEvent<'_>) + Send + Sync>;
type PostExecuteHandler = Box<dyn Fn(&CommandEvent<'_>) + Send + Sync>;
type ErrorHandler = Box<dyn Fn(&DatabaseError, &CommandEvent<'_>) + Send + Sync>;

/// Registry of pre-execute, post-execute, and error handlers
#[derive(Default)]
pub struct EventRegistry {
    pre_execute: Vec<PreExecuteHandler>,
    post_execute: Vec<PostExecuteHandler>,
    on_error: Vec<ErrorHandler>,
}

impl EventRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler fired before each execution
    #[must_use]
    pub fn on_pre_execute(
        mut self,
        handler: impl Fn(&CommandEvent<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.pre_execute.push(Box::new(handler));
        self
    }

    /// Register a handler fired after each successful execution
    #[must_use]
    pub fn on_post_execute(
        mut self,
        handler: impl Fn(&CommandEvent<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.post_execute.push(Box::new(handler));
        self
    }

    /// Register a handler fired when an execution fails
    #[must_use]
    pub fn on_error(
        mut self,
        handler: impl Fn(&DatabaseError, &CommandEvent<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.on_error.push(Box::new(handler));
        self
    }

    pub(crate) fn fire_pre_execute(&self, event: &CommandEvent<'_>) {
        for handler in &self.pre_execute {
            handler(event);
        }
    }

    pub(crate) fn fire_post_execute(&self, event: &CommandEvent<'_>) {
        for handler in &self.post_execute {
            handler(event);
        }
    }

    pub(crate) fn fire_error(&self, error: &DatabaseError, event: &CommandEvent<'_>) {
        for handler in &self.on_error {
            handler(error, event);
        }
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("pre_execute", &self.pre_execute.len())
            .field("post_execute", &self.post_execute.len())
            .field("on_error", &self.on_error.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_handlers_fire_in_registration_order() {
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let a = Arc::clone(&seen);
        let b = Arc::clone(&seen);

        let registry = EventRegistry::new()
            .on_pre_execute(move |_| a.lock().unwrap().push("first"))
            .on_pre_execute(move |_| b.lock().unwrap().push("second"));

        let event = CommandEvent {
            text: "SELECT 1",
            parameters: &[],
        };
        registry.fire_pre_execute(&event);

        assert_eq!(*seen.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_error_handlers_receive_the_error() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        let registry = EventRegistry::new().on_error(move |error, _| {
            assert!(error.to_string().contains("boom"));
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let event = CommandEvent {
            text: "SELECT 1",
            parameters: &[],
        };
        registry.fire_error(&DatabaseError::query("boom"), &event);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
