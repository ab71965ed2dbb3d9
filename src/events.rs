//! Named-channel observers for the outcome of `Client::poll_for_results`.

use crate::error::Error;
use crate::models::DetectionResult;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Event name for delivered results
pub const RESULT_EVENT: &str = "result";

/// Event name for polling failures, including timeouts
pub const ERROR_EVENT: &str = "error";

/// Payload handed to event handlers
#[derive(Debug, Clone, Copy)]
pub enum PollEvent<'a> {
    /// A final detection result
    Result(&'a DetectionResult),
    /// The error that ended polling
    Error(&'a Error),
}

impl PollEvent<'_> {
    /// The channel this payload is emitted on
    pub fn name(&self) -> &'static str {
        match self {
            PollEvent::Result(_) => RESULT_EVENT,
            PollEvent::Error(_) => ERROR_EVENT,
        }
    }
}

/// Shared handler callback
pub type EventHandler = Arc<dyn Fn(&PollEvent<'_>) + Send + Sync>;

/// Registry of event handlers, one per client
#[derive(Default)]
pub struct EventRegistry {
    handlers: RwLock<HashMap<String, Vec<EventHandler>>>,
}

impl EventRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for `event`. Handlers run in registration order.
    pub fn on<F>(&self, event: &str, handler: F)
    where
        F: Fn(&PollEvent<'_>) + Send + Sync + 'static,
    {
        self.handlers
            .write()
            .entry(event.to_string())
            .or_default()
            .push(Arc::new(handler));
    }

    /// Invoke every handler registered for `event` with `payload`.
    ///
    /// The handler list is snapshotted first, so handlers may register new
    /// handlers without deadlocking; those only see later emissions.
    pub fn emit(&self, event: &str, payload: &PollEvent<'_>) {
        let snapshot: Vec<EventHandler> = match self.handlers.read().get(event) {
            Some(handlers) => handlers.clone(),
            None => return,
        };

        log::debug!("emitting {} event to {} handler(s)", event, snapshot.len());
        for handler in snapshot {
            handler(payload);
        }
    }

    /// Emit `payload` on its own channel
    pub fn dispatch(&self, payload: PollEvent<'_>) {
        self.emit(payload.name(), &payload);
    }

    /// Number of handlers registered for `event`
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers.read().get(event).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read();
        let mut counts: Vec<(&str, usize)> = handlers
            .iter()
            .map(|(name, list)| (name.as_str(), list.len()))
            .collect();
        counts.sort_unstable();
        f.debug_struct("EventRegistry")
            .field("handlers", &counts)
            .finish()
    }
}
