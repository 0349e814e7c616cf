//! Diagnostics side channel.
//!
//! The runtime reports malformed input and intercepted callback errors to a
//! [`DiagnosticsSink`]. Reporting is fire-and-forget: nothing in the runtime
//! depends on what a sink does with a message.
//!
//! The default sink forwards to `tracing`. A different sink can be installed
//! for the current thread with [`with_sink`], which is how tests observe
//! diagnostics.

use std::{cell::RefCell, rc::Rc};

use crate::runtime::error::RuntimeError;

pub const TARGET: &str = "extend::runtime";

pub trait DiagnosticsSink {
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
    fn debug(&self, message: &str);
    fn exception(&self, err: &RuntimeError, context: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: TARGET, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: TARGET, "{}", message);
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: TARGET, "{}", message);
    }

    fn exception(&self, err: &RuntimeError, context: &str) {
        tracing::error!(target: TARGET, context, error = %err, "exception intercepted");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Warn,
    Error,
    Debug,
    Exception,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub message: String,
}

/// Sink that keeps every message in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: RefCell<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|d| d.level == level)
            .map(|d| d.message.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn push(&self, level: Level, message: String) {
        self.entries.borrow_mut().push(Diagnostic { level, message });
    }
}

impl DiagnosticsSink for RecordingSink {
    fn warn(&self, message: &str) {
        self.push(Level::Warn, message.to_string());
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message.to_string());
    }

    fn debug(&self, message: &str) {
        self.push(Level::Debug, message.to_string());
    }

    fn exception(&self, err: &RuntimeError, context: &str) {
        self.push(Level::Exception, format!("{}: {}", context, err));
    }
}

thread_local! {
    static SINK: RefCell<Option<Rc<dyn DiagnosticsSink>>> = const { RefCell::new(None) };
}

struct SinkGuard {
    previous: Option<Rc<dyn DiagnosticsSink>>,
}

impl Drop for SinkGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        SINK.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Runs `f` with `sink` receiving this thread's diagnostics, then restores
/// the previous sink (also on unwind).
pub fn with_sink<R>(sink: Rc<dyn DiagnosticsSink>, f: impl FnOnce() -> R) -> R {
    let previous = SINK.with(|slot| slot.borrow_mut().replace(sink));
    let _guard = SinkGuard { previous };
    f()
}

fn current() -> Rc<dyn DiagnosticsSink> {
    SINK.with(|slot| slot.borrow().clone())
        .unwrap_or_else(|| Rc::new(TracingSink))
}

pub fn warn(message: impl AsRef<str>) {
    current().warn(message.as_ref());
}

pub fn error(message: impl AsRef<str>) {
    current().error(message.as_ref());
}

pub fn debug(message: impl AsRef<str>) {
    current().debug(message.as_ref());
}

pub fn exception(err: &RuntimeError, context: &str) {
    current().exception(err, context);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_sink_receives_messages_and_is_restored() {
        let outer = RecordingSink::new();
        let inner = RecordingSink::new();
        with_sink(outer.clone(), || {
            warn("outer");
            with_sink(inner.clone(), || error("inner"));
            debug("outer again");
        });
        warn("to tracing");

        assert_eq!(outer.messages(Level::Warn), vec!["outer"]);
        assert_eq!(outer.messages(Level::Debug), vec!["outer again"]);
        assert_eq!(inner.messages(Level::Error), vec!["inner"]);
        assert_eq!(inner.entries().len(), 1);
    }

    #[test]
    fn exceptions_carry_context() {
        let sink = RecordingSink::new();
        with_sink(sink.clone(), || {
            exception(&RuntimeError::raise(1), "iterate");
        });
        assert_eq!(sink.messages(Level::Exception), vec!["iterate: raised 1"]);
    }
}
