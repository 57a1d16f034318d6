//! Shared fakes for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use follow_sync::{
    FollowError, FollowHooks, FollowStatusContext, FollowersRpc, GetFollowersRequest,
    GetFollowersResponse, InMemorySubscriptionStore, Result, StaticSession, SubscriptionRecord,
    SubscriptionStore, Topic, TopicKey, TopicKind, UserId,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Notify, Semaphore};

pub fn uid(id: &str) -> UserId {
    UserId::new(id)
}

/// Route library logs to the test output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Context, store, and a signed-in session for `u1`.
pub struct Harness {
    pub context: Arc<FollowStatusContext>,
    pub store: Arc<InMemorySubscriptionStore>,
    pub session: Arc<StaticSession>,
}

impl Harness {
    pub fn new() -> Self {
        init_tracing();
        Self {
            context: Arc::new(FollowStatusContext::new()),
            store: Arc::new(InMemorySubscriptionStore::new()),
            session: Arc::new(StaticSession::signed_in(uid("u1"))),
        }
    }

    pub fn seed(&self, follower: &str, topic: Topic) {
        self.store.insert(SubscriptionRecord::new(uid(follower), topic));
    }
}

/// Wraps the in-memory store and fails selected calls on demand.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemorySubscriptionStore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(FollowError::transport("read rejected"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(FollowError::transport("write rejected"));
        }
        Ok(())
    }
}

#[async_trait]
impl SubscriptionStore for FlakyStore {
    async fn list_subscriptions(
        &self,
        follower: &UserId,
        kind: TopicKind,
    ) -> Result<Vec<SubscriptionRecord>> {
        self.check_read()?;
        self.inner.list_subscriptions(follower, kind).await
    }

    async fn get_subscription(
        &self,
        follower: &UserId,
        topic_key: &TopicKey,
    ) -> Result<Option<SubscriptionRecord>> {
        self.check_read()?;
        self.inner.get_subscription(follower, topic_key).await
    }

    async fn put_subscription(&self, record: SubscriptionRecord) -> Result<()> {
        self.check_write()?;
        self.inner.put_subscription(record).await
    }

    async fn delete_subscription(&self, follower: &UserId, topic_key: &TopicKey) -> Result<()> {
        self.check_write()?;
        self.inner.delete_subscription(follower, topic_key).await
    }
}

/// Store whose status reads snapshot the answer, then wait to be released.
///
/// Lets a test hold a query in flight while other operations happen.
pub struct GatedStore {
    pub inner: Arc<InMemorySubscriptionStore>,
    gate: Semaphore,
    pub entered: Notify,
}

impl GatedStore {
    pub fn new(inner: Arc<InMemorySubscriptionStore>) -> Self {
        Self {
            inner,
            gate: Semaphore::new(0),
            entered: Notify::new(),
        }
    }

    /// Let one held read complete.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl SubscriptionStore for GatedStore {
    async fn list_subscriptions(
        &self,
        follower: &UserId,
        kind: TopicKind,
    ) -> Result<Vec<SubscriptionRecord>> {
        let answer = self.inner.list_subscriptions(follower, kind).await;
        self.entered.notify_one();
        self.gate
            .acquire()
            .await
            .map_err(|e| FollowError::transport(e.to_string()))?
            .forget();
        answer
    }

    async fn get_subscription(
        &self,
        follower: &UserId,
        topic_key: &TopicKey,
    ) -> Result<Option<SubscriptionRecord>> {
        let answer = self.inner.get_subscription(follower, topic_key).await;
        self.entered.notify_one();
        self.gate
            .acquire()
            .await
            .map_err(|e| FollowError::transport(e.to_string()))?
            .forget();
        answer
    }

    async fn put_subscription(&self, record: SubscriptionRecord) -> Result<()> {
        self.inner.put_subscription(record).await
    }

    async fn delete_subscription(&self, follower: &UserId, topic_key: &TopicKey) -> Result<()> {
        self.inner.delete_subscription(follower, topic_key).await
    }
}

/// Followers RPC with a fixed answer, or a rejection.
pub struct StaticRpc {
    pub followers: Option<Vec<String>>,
}

impl StaticRpc {
    pub fn answering(followers: &[&str]) -> Self {
        Self {
            followers: Some(followers.iter().map(|s| s.to_string()).collect()),
        }
    }

    pub fn failing() -> Self {
        Self { followers: None }
    }
}

#[async_trait]
impl FollowersRpc for StaticRpc {
    async fn get_followers(&self, _request: GetFollowersRequest) -> Result<GetFollowersResponse> {
        match &self.followers {
            Some(data) => Ok(GetFollowersResponse { data: data.clone() }),
            None => Err(FollowError::transport("getFollowers rejected")),
        }
    }
}

/// Records hook invocations as `follow:<key>` / `unfollow:<key>`.
#[derive(Default)]
pub struct RecordingHooks {
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
}

#[async_trait]
impl FollowHooks for RecordingHooks {
    async fn on_follow(&self, _follower: &UserId, topic: &Topic) -> Result<()> {
        self.calls.lock().push(format!("follow:{}", topic.key()));
        if self.fail {
            return Err(FollowError::transport("hook failed"));
        }
        Ok(())
    }

    async fn on_unfollow(&self, _follower: &UserId, topic: &Topic) -> Result<()> {
        self.calls.lock().push(format!("unfollow:{}", topic.key()));
        if self.fail {
            return Err(FollowError::transport("hook failed"));
        }
        Ok(())
    }
}
