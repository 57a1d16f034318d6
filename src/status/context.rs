//! Session-wide follow status cache.

use super::watch::{ChangeOrigin, StatusWatchers, WatchFilter, WatchHandle, WatchId};
use crate::config::FollowConfig;
use crate::types::{FollowStatus, Sequence, TopicKey};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Stamp taken when a status query starts.
///
/// A query result is only applied if no toggle for that topic happened after
/// the ticket was issued. One ticket may cover a bulk query over many topics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct StatusTicket {
    pub issued: Sequence,
}

#[derive(Clone, Copy, Debug)]
struct StatusEntry {
    followed: bool,
    /// Stamp of the last applied change of any origin.
    updated: Sequence,
    /// Stamp of the last toggle or revert; queries issued before it are stale.
    toggled: Sequence,
}

/// Single source of truth for "does this session follow topic X".
///
/// Entries are created lazily by the first resolved query and updated by
/// toggles. All updates are keyed: one topic changing never touches another.
pub struct FollowStatusContext {
    entries: RwLock<HashMap<TopicKey, StatusEntry>>,
    clock: AtomicU64,
    watchers: StatusWatchers,
}

impl FollowStatusContext {
    pub fn new() -> Self {
        Self::with_config(&FollowConfig::default())
    }

    pub fn with_config(config: &FollowConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock: AtomicU64::new(0),
            watchers: StatusWatchers::new(config.watch_buffer_size),
        }
    }

    fn tick(&self) -> Sequence {
        Sequence(self.clock.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Current status; `Unknown` until first resolved.
    pub fn get_status(&self, topic: &TopicKey) -> FollowStatus {
        match self.entries.read().get(topic) {
            Some(entry) => FollowStatus::from_bool(entry.followed),
            None => FollowStatus::Unknown,
        }
    }

    /// Take a ticket before issuing a status query to the store.
    pub fn begin_query(&self) -> StatusTicket {
        StatusTicket {
            issued: self.tick(),
        }
    }

    /// Merge a confirmed store status for one topic.
    ///
    /// Among queries, the last response to arrive wins. A response whose
    /// ticket predates the latest toggle of the topic is discarded. Returns
    /// whether the value was applied.
    pub fn report_status(&self, topic: &TopicKey, ticket: StatusTicket, followed: bool) -> bool {
        let mut entries = self.entries.write();

        if let Some(entry) = entries.get(topic) {
            if ticket.issued <= entry.toggled {
                debug!(
                    topic = %topic,
                    issued = ticket.issued.0,
                    toggled = entry.toggled.0,
                    "discarding stale status query"
                );
                return false;
            }
        }

        let stamp = self.tick();
        let toggled = entries.get(topic).map(|e| e.toggled).unwrap_or_default();
        entries.insert(
            topic.clone(),
            StatusEntry {
                followed,
                updated: stamp,
                toggled,
            },
        );
        self.watchers.broadcast(topic, followed, stamp, ChangeOrigin::Query);
        true
    }

    /// Record a user toggle. Always applied; returns the toggle's stamp.
    pub fn set_status(&self, topic: &TopicKey, followed: bool) -> Sequence {
        let mut entries = self.entries.write();
        let stamp = self.tick();
        entries.insert(
            topic.clone(),
            StatusEntry {
                followed,
                updated: stamp,
                toggled: stamp,
            },
        );
        self.watchers.broadcast(topic, followed, stamp, ChangeOrigin::Toggle);
        stamp
    }

    /// Undo the toggle stamped `expected`, unless a newer toggle superseded it.
    pub fn revert_status(&self, topic: &TopicKey, followed: bool, expected: Sequence) -> bool {
        let mut entries = self.entries.write();
        match entries.get(topic) {
            Some(entry) if entry.toggled == expected => {}
            _ => return false,
        }

        let stamp = self.tick();
        entries.insert(
            topic.clone(),
            StatusEntry {
                followed,
                updated: stamp,
                toggled: stamp,
            },
        );
        self.watchers.broadcast(topic, followed, stamp, ChangeOrigin::Revert);
        true
    }

    /// Stamp of the last applied change for a topic.
    pub fn last_updated(&self, topic: &TopicKey) -> Option<Sequence> {
        self.entries.read().get(topic).map(|e| e.updated)
    }

    /// Number of resolved topics.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Subscribe to applied changes.
    pub fn watch(&self, filter: WatchFilter) -> WatchHandle {
        self.watchers.watch(filter)
    }

    pub fn unwatch(&self, id: WatchId) {
        self.watchers.unwatch(id);
    }

    pub fn watcher_count(&self) -> usize {
        self.watchers.count()
    }
}

impl Default for FollowStatusContext {
    fn default() -> Self {
        Self::new()
    }
}
