//! Core types for follow relationships.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an authenticated user.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        UserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic stamp issued by the status context.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Sequence(pub u64);

impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seq({})", self.0)
    }
}

impl Sequence {
    pub fn next(self) -> Self {
        Sequence(self.0 + 1)
    }
}

/// Kind discriminator of a followable topic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicKind {
    Bill,
    /// Following another user's testimony.
    Testimony,
}

impl TopicKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicKind::Bill => "bill",
            TopicKind::Testimony => "testimony",
        }
    }
}

impl fmt::Display for TopicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic key of a topic, derived from its subject fields alone.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicKey(pub String);

impl TopicKey {
    pub fn bill(court: u32, bill_id: &str) -> Self {
        TopicKey(format!("bill-{}-{}", court, bill_id))
    }

    pub fn testimony(profile_id: &str) -> Self {
        TopicKey(format!("testimony-{}", profile_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the kind from the key prefix.
    pub fn kind(&self) -> Option<TopicKind> {
        if self.0.starts_with("bill-") {
            Some(TopicKind::Bill)
        } else if self.0.starts_with("testimony-") {
            Some(TopicKind::Testimony)
        } else {
            None
        }
    }
}

impl fmt::Debug for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TopicKey({})", self.0)
    }
}

impl fmt::Display for TopicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lookup fields of a bill.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLookup {
    pub bill_id: String,
    pub court: u32,
}

impl BillLookup {
    pub fn new(court: u32, bill_id: impl Into<String>) -> Self {
        Self {
            bill_id: bill_id.into(),
            court,
        }
    }
}

/// Lookup fields of a followed user.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLookup {
    pub profile_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

impl UserLookup {
    pub fn new(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            full_name: None,
        }
    }

    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }
}

/// A followable subject.
///
/// Serializes adjacently tagged as `{"kind": ..., "payload": ...}` so it can
/// be flattened straight into a [`SubscriptionRecord`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload")]
pub enum Topic {
    #[serde(rename = "bill")]
    Bill(BillLookup),
    #[serde(rename = "testimony")]
    User(UserLookup),
}

impl Topic {
    pub fn bill(court: u32, bill_id: impl Into<String>) -> Self {
        Topic::Bill(BillLookup::new(court, bill_id))
    }

    pub fn user(profile_id: impl Into<String>) -> Self {
        Topic::User(UserLookup::new(profile_id))
    }

    pub fn key(&self) -> TopicKey {
        match self {
            Topic::Bill(bill) => TopicKey::bill(bill.court, &bill.bill_id),
            Topic::User(user) => TopicKey::testimony(&user.profile_id),
        }
    }

    pub fn kind(&self) -> TopicKind {
        match self {
            Topic::Bill(_) => TopicKind::Bill,
            Topic::User(_) => TopicKind::Testimony,
        }
    }
}

/// Persisted fact that `follower` follows one topic.
///
/// At most one record exists per `(follower, topic_key)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub follower: UserId,
    pub topic_key: TopicKey,
    #[serde(flatten)]
    pub topic: Topic,
}

impl SubscriptionRecord {
    pub fn new(follower: UserId, topic: Topic) -> Self {
        Self {
            follower,
            topic_key: topic.key(),
            topic,
        }
    }

    pub fn kind(&self) -> TopicKind {
        self.topic.kind()
    }
}

/// Direction of a follow toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Follow,
    Unfollow,
}

impl Direction {
    /// The direction a toggle takes from the given current status.
    pub fn from_current(following: bool) -> Self {
        if following {
            Direction::Unfollow
        } else {
            Direction::Follow
        }
    }

    /// Status after a toggle in this direction.
    pub fn resulting_status(self) -> bool {
        matches!(self, Direction::Follow)
    }
}

/// Resolved follow status of a topic for the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum FollowStatus {
    #[default]
    Unknown,
    Following,
    NotFollowing,
}

impl FollowStatus {
    pub fn from_bool(followed: bool) -> Self {
        if followed {
            FollowStatus::Following
        } else {
            FollowStatus::NotFollowing
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            FollowStatus::Unknown => None,
            FollowStatus::Following => Some(true),
            FollowStatus::NotFollowing => Some(false),
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, FollowStatus::Unknown)
    }
}
