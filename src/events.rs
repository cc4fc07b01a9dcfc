//! Classification lifecycle events.
//!
//! Hosts that want usage analytics plug an [`EventSink`] into the classifier. The
//! default sink drops everything; nothing is collected unless the host asks for it.
//! Events never carry the credential, only provider and model identifiers.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ClassifierEvent {
    /// A fresh model catalog was fetched and cached.
    ModelsFetched { count: usize },
    /// The refetch failed and the previous catalog was served instead.
    ModelsServedStale { count: usize, reason: String },
    /// The selected model was rejected and replaced.
    ModelFallbackApplied { from: String, to: String },
    ClassificationSucceeded {
        request_id: String,
        provider: String,
        model: String,
        retried: bool,
    },
    ClassificationFailed {
        request_id: String,
        reason: String,
    },
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn report(&self, event: ClassifierEvent) -> Result<()>;
}

pub struct NoopEventSink;

#[async_trait]
impl EventSink for NoopEventSink {
    async fn report(&self, _event: ClassifierEvent) -> Result<()> {
        Ok(())
    }
}

pub fn noop_sink() -> Arc<dyn EventSink> {
    Arc::new(NoopEventSink)
}

/// Bounded in-memory sink, mostly for tests.
pub struct InMemoryEventSink {
    events: Mutex<Vec<ClassifierEvent>>,
    max_events: usize,
}

impl InMemoryEventSink {
    pub fn new(max: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            max_events: max,
        }
    }

    pub fn events(&self) -> Vec<ClassifierEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryEventSink {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventSink for InMemoryEventSink {
    async fn report(&self, event: ClassifierEvent) -> Result<()> {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
            if events.len() > self.max_events {
                events.remove(0);
            }
        }
        Ok(())
    }
}

/// Reports without letting a sink failure affect the caller.
pub(crate) async fn emit(sink: &Arc<dyn EventSink>, event: ClassifierEvent) {
    if let Err(e) = sink.report(event).await {
        tracing::debug!(error = %e, "event sink rejected event");
    }
}
