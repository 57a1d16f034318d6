//! Persistence seam for follow records.
//!
//! The core only talks to storage through two async traits:
//! - [`SubscriptionStore`]: per-user subscription records, addressed by
//!   `(follower, topic_key)` and queried by `follower` + `kind`
//! - [`FollowersRpc`]: the remote "get followers" call
//!
//! Neither is retried; a rejected call surfaces as
//! [`FollowError::Transport`](crate::FollowError::Transport).

mod memory;

pub use memory::InMemorySubscriptionStore;

use crate::error::Result;
use crate::types::{SubscriptionRecord, TopicKey, TopicKind, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Document store of subscription records.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// All records of `follower` with the given kind. Order is unspecified.
    async fn list_subscriptions(
        &self,
        follower: &UserId,
        kind: TopicKind,
    ) -> Result<Vec<SubscriptionRecord>>;

    async fn get_subscription(
        &self,
        follower: &UserId,
        topic_key: &TopicKey,
    ) -> Result<Option<SubscriptionRecord>>;

    /// Upsert keyed by `(record.follower, record.topic_key)`.
    async fn put_subscription(&self, record: SubscriptionRecord) -> Result<()>;

    /// Removing an absent record is not an error.
    async fn delete_subscription(&self, follower: &UserId, topic_key: &TopicKey) -> Result<()>;
}

/// Request body of the "get followers" call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetFollowersRequest {
    pub uid: String,
}

/// Response body of the "get followers" call: follower profile ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetFollowersResponse {
    pub data: Vec<String>,
}

/// Remote call listing who follows a user.
#[async_trait]
pub trait FollowersRpc: Send + Sync {
    async fn get_followers(&self, request: GetFollowersRequest) -> Result<GetFollowersResponse>;
}
