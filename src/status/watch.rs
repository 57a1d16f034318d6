//! Status watchers: bounded fan-out of status changes.

use crate::types::{Sequence, TopicKey, TopicKind};
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// What caused a status change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeOrigin {
    /// An initial status query resolved.
    Query,
    /// The user toggled the topic.
    Toggle,
    /// A failed toggle write was undone.
    Revert,
}

/// Events delivered to watchers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    Changed {
        topic: TopicKey,
        followed: bool,
        sequence: Sequence,
        origin: ChangeOrigin,
    },

    Dropped {
        reason: DropReason,
    },
}

/// Why a watcher was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Explicitly unwatched.
    Unwatched,
}

/// Filter criteria for watchers.
#[derive(Clone, Debug, Default)]
pub struct WatchFilter {
    /// Only these topics (None = all).
    pub topics: Option<Vec<TopicKey>>,

    /// Only these kinds (None = all).
    pub kinds: Option<Vec<TopicKind>>,

    /// Only these origins (None = all).
    pub origins: Option<Vec<ChangeOrigin>>,
}

impl WatchFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn topics(topics: Vec<TopicKey>) -> Self {
        Self {
            topics: Some(topics),
            ..Default::default()
        }
    }

    pub fn kinds(kinds: Vec<TopicKind>) -> Self {
        Self {
            kinds: Some(kinds),
            ..Default::default()
        }
    }

    pub fn with_origins(mut self, origins: Vec<ChangeOrigin>) -> Self {
        self.origins = Some(origins);
        self
    }

    fn matches(&self, topic: &TopicKey, origin: ChangeOrigin) -> bool {
        if let Some(ref topics) = self.topics {
            if !topics.contains(topic) {
                return false;
            }
        }

        if let Some(ref kinds) = self.kinds {
            match topic.kind() {
                Some(kind) if kinds.contains(&kind) => {}
                _ => return false,
            }
        }

        if let Some(ref origins) = self.origins {
            if !origins.contains(&origin) {
                return false;
            }
        }

        true
    }
}

/// Unique identifier for a watcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchId(pub u64);

/// Receiving side of a watcher.
pub struct WatchHandle {
    pub id: WatchId,
    pub receiver: crossbeam_channel::Receiver<StatusEvent>,
    closed: Arc<AtomicBool>,
}

impl WatchHandle {
    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StatusEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Everything buffered so far.
    pub fn drain(&self) -> Vec<StatusEvent> {
        self.receiver.try_iter().collect()
    }

    /// Whether the context dropped this watcher and nothing is left to read.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst) && self.receiver.is_empty()
    }
}

struct Watcher {
    filter: WatchFilter,
    sender: Sender<StatusEvent>,
    closed: Arc<AtomicBool>,
}

impl Watcher {
    fn close(&self, reason: DropReason) {
        self.closed.store(true, Ordering::SeqCst);
        let _ = self.sender.try_send(StatusEvent::Dropped { reason });
    }

    fn try_send(&self, event: StatusEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }
}

/// Registry of watchers.
pub(crate) struct StatusWatchers {
    watchers: RwLock<HashMap<WatchId, Watcher>>,
    next_id: AtomicU64,
    buffer_size: usize,
}

impl StatusWatchers {
    pub(crate) fn new(buffer_size: usize) -> Self {
        Self {
            watchers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            buffer_size: buffer_size.max(1),
        }
    }

    pub(crate) fn watch(&self, filter: WatchFilter) -> WatchHandle {
        let id = WatchId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(self.buffer_size);
        let closed = Arc::new(AtomicBool::new(false));
        let watcher = Watcher {
            filter,
            sender,
            closed: closed.clone(),
        };
        self.watchers.write().insert(id, watcher);
        WatchHandle {
            id,
            receiver,
            closed,
        }
    }

    pub(crate) fn unwatch(&self, id: WatchId) {
        if let Some(watcher) = self.watchers.write().remove(&id) {
            watcher.close(DropReason::Unwatched);
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.watchers.read().len()
    }

    /// Deliver a change to matching watchers. Drops watchers that fail to receive.
    pub(crate) fn broadcast(
        &self,
        topic: &TopicKey,
        followed: bool,
        sequence: Sequence,
        origin: ChangeOrigin,
    ) {
        let mut to_remove = Vec::new();

        {
            let watchers = self.watchers.read();
            if watchers.is_empty() {
                return;
            }
            let event = StatusEvent::Changed {
                topic: topic.clone(),
                followed,
                sequence,
                origin,
            };
            for (id, watcher) in watchers.iter() {
                if watcher.filter.matches(topic, origin) && !watcher.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut watchers = self.watchers.write();
            for id in to_remove {
                if let Some(watcher) = watchers.remove(&id) {
                    debug!(watch_id = id.0, "dropping slow status watcher");
                    // Buffer is full, so the notice is usually lost; `closed` is not.
                    watcher.close(DropReason::BufferOverflow);
                }
            }
        }
    }
}
