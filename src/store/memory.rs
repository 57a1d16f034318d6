//! In-process subscription store.

use super::{FollowersRpc, GetFollowersRequest, GetFollowersResponse, SubscriptionStore};
use crate::error::Result;
use crate::types::{SubscriptionRecord, TopicKey, TopicKind, UserId};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use tracing::debug;

/// Subscription records held in memory, keyed by `(follower, topic_key)`.
///
/// Also answers [`FollowersRpc`]: the followers of `uid` are the followers of
/// topic `testimony-{uid}`.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    records: RwLock<BTreeMap<(UserId, TopicKey), SubscriptionRecord>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records across all followers.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn contains(&self, follower: &UserId, topic_key: &TopicKey) -> bool {
        self.records
            .read()
            .contains_key(&(follower.clone(), topic_key.clone()))
    }

    /// Synchronous insert, for seeding.
    pub fn insert(&self, record: SubscriptionRecord) {
        let key = (record.follower.clone(), record.topic_key.clone());
        self.records.write().insert(key, record);
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn list_subscriptions(
        &self,
        follower: &UserId,
        kind: TopicKind,
    ) -> Result<Vec<SubscriptionRecord>> {
        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|((owner, _), record)| owner == follower && record.kind() == kind)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn get_subscription(
        &self,
        follower: &UserId,
        topic_key: &TopicKey,
    ) -> Result<Option<SubscriptionRecord>> {
        Ok(self
            .records
            .read()
            .get(&(follower.clone(), topic_key.clone()))
            .cloned())
    }

    async fn put_subscription(&self, record: SubscriptionRecord) -> Result<()> {
        debug!(follower = %record.follower, topic = %record.topic_key, "put subscription");
        self.insert(record);
        Ok(())
    }

    async fn delete_subscription(&self, follower: &UserId, topic_key: &TopicKey) -> Result<()> {
        let removed = self
            .records
            .write()
            .remove(&(follower.clone(), topic_key.clone()));
        debug!(
            follower = %follower,
            topic = %topic_key,
            existed = removed.is_some(),
            "delete subscription"
        );
        Ok(())
    }
}

#[async_trait]
impl FollowersRpc for InMemorySubscriptionStore {
    async fn get_followers(&self, request: GetFollowersRequest) -> Result<GetFollowersResponse> {
        let topic = TopicKey::testimony(&request.uid);
        let records = self.records.read();
        let data = records
            .iter()
            .filter(|((_, key), _)| *key == topic)
            .map(|((follower, _), _)| follower.0.clone())
            .collect();
        Ok(GetFollowersResponse { data })
    }
}
