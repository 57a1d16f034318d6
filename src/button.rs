//! Follow button state machine.
//!
//! A button is bound to one topic. It resolves its status through the shared
//! [`FollowStatusContext`], never keeps its own copy of it, and only holds the
//! transient confirmation state locally.
//!
//! ```text
//! Unknown --mount--> Following | NotFollowing
//! resolved --activate--> Confirming      (policy requires confirmation)
//! resolved --activate--> toggled          (otherwise)
//! Confirming --confirm--> toggled
//! Confirming --deny--> resolved, unchanged
//! ```

use crate::config::{ConfirmationPolicy, FollowConfig};
use crate::error::{FollowError, Result};
use crate::generation::Generation;
use crate::i18n::{self, Translator};
use crate::list_card::FollowControl;
use crate::session::SessionProvider;
use crate::status::FollowStatusContext;
use crate::store::SubscriptionStore;
use crate::types::{Direction, FollowStatus, SubscriptionRecord, Topic, TopicKey, UserId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Caller-supplied side effects run after a successful store write.
///
/// Hook failures are logged and do not undo the toggle.
#[async_trait]
pub trait FollowHooks: Send + Sync {
    async fn on_follow(&self, _follower: &UserId, _topic: &Topic) -> Result<()> {
        Ok(())
    }

    async fn on_unfollow(&self, _follower: &UserId, _topic: &Topic) -> Result<()> {
        Ok(())
    }
}

/// Observable state of a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Unknown,
    Following,
    NotFollowing,
    /// Waiting for the user to confirm a toggle in `direction`.
    Confirming { direction: Direction },
}

/// Result of a user interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// Nothing happened (unresolved, disposed, or no pending confirmation).
    Ignored,
    /// A confirmation dialog is now open.
    AwaitingConfirmation(Direction),
    /// The pending confirmation was dismissed.
    Denied,
    /// The toggle was applied; `followed` is the new status.
    Toggled { followed: bool },
}

/// Confirmation dialog contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmDialog {
    pub direction: Direction,
    pub message: String,
}

/// Render model of a button.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonView {
    /// `None` while the status is unknown.
    pub label: Option<String>,
    pub following: bool,
    pub dialog: Option<ConfirmDialog>,
}

/// A follow control bound to one topic.
pub struct FollowButton {
    topic: Topic,
    key: TopicKey,
    context: Arc<FollowStatusContext>,
    store: Arc<dyn SubscriptionStore>,
    session: Arc<dyn SessionProvider>,
    hooks: Option<Arc<dyn FollowHooks>>,
    policy: ConfirmationPolicy,
    revert_on_failure: bool,
    confirming: Mutex<Option<Direction>>,
    generation: Generation,
}

impl FollowButton {
    pub fn new(
        topic: Topic,
        context: Arc<FollowStatusContext>,
        store: Arc<dyn SubscriptionStore>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let config = FollowConfig::default();
        Self {
            key: topic.key(),
            topic,
            context,
            store,
            session,
            hooks: None,
            policy: config.confirmation,
            revert_on_failure: config.revert_on_write_failure,
            confirming: Mutex::new(None),
            generation: Generation::new(),
        }
    }

    pub fn with_config(mut self, config: &FollowConfig) -> Self {
        self.policy = config.confirmation;
        self.revert_on_failure = config.revert_on_write_failure;
        self
    }

    pub fn with_confirmation(mut self, policy: ConfirmationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn FollowHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn key(&self) -> &TopicKey {
        &self.key
    }

    /// Status as seen through the shared context.
    pub fn status(&self) -> FollowStatus {
        self.context.get_status(&self.key)
    }

    pub fn state(&self) -> ButtonState {
        if let Some(direction) = *self.confirming.lock() {
            return ButtonState::Confirming { direction };
        }
        match self.status() {
            FollowStatus::Unknown => ButtonState::Unknown,
            FollowStatus::Following => ButtonState::Following,
            FollowStatus::NotFollowing => ButtonState::NotFollowing,
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.generation.is_disposed()
    }

    /// Query the store for this topic and report the result to the context.
    ///
    /// Without a session no query is issued and the status stays as it is.
    /// A response that arrives after `dispose` or a newer `mount` is dropped.
    pub async fn mount(&self) -> Result<FollowStatus> {
        let generation = self.generation.begin();
        if self.is_disposed() {
            return Ok(FollowStatus::Unknown);
        }

        let Some(user) = self.session.user_id() else {
            debug!(topic = %self.key, "no session, skipping status query");
            return Ok(self.status());
        };

        let ticket = self.context.begin_query();
        let record = match self.store.get_subscription(&user, &self.key).await {
            Ok(record) => record,
            Err(e) => {
                warn!(topic = %self.key, error = %e, "follow status query failed");
                return Err(e);
            }
        };

        if !self.generation.is_current(generation) {
            debug!(topic = %self.key, generation, "discarding status for stale button");
            return Ok(self.status());
        }

        self.context.report_status(&self.key, ticket, record.is_some());
        Ok(self.status())
    }

    /// Mark the button as gone. In-flight responses are ignored afterwards.
    pub fn dispose(&self) {
        self.generation.dispose();
        self.confirming.lock().take();
    }

    /// The user pressed the control.
    pub async fn activate(&self) -> Result<Activation> {
        if self.is_disposed() {
            return Ok(Activation::Ignored);
        }
        let user = self.session.user_id().ok_or(FollowError::Unauthenticated)?;

        let direction = {
            let mut confirming = self.confirming.lock();
            if confirming.is_some() {
                return Ok(Activation::Ignored);
            }
            let Some(current) = self.status().as_bool() else {
                return Ok(Activation::Ignored);
            };
            let direction = Direction::from_current(current);
            if self.policy.requires(direction) {
                *confirming = Some(direction);
                debug!(topic = %self.key, ?direction, "awaiting confirmation");
                return Ok(Activation::AwaitingConfirmation(direction));
            }
            direction
        };

        self.toggle(user, direction).await
    }

    /// The user accepted the confirmation dialog.
    pub async fn confirm(&self) -> Result<Activation> {
        let pending = self.confirming.lock().take();
        let Some(direction) = pending else {
            return Ok(Activation::Ignored);
        };
        if self.is_disposed() {
            return Ok(Activation::Ignored);
        }
        let user = self.session.user_id().ok_or(FollowError::Unauthenticated)?;
        self.toggle(user, direction).await
    }

    /// The user dismissed the confirmation dialog. Never touches the store.
    pub fn deny(&self) -> Activation {
        match self.confirming.lock().take() {
            Some(_) => Activation::Denied,
            None => Activation::Ignored,
        }
    }

    async fn toggle(&self, user: UserId, direction: Direction) -> Result<Activation> {
        let followed = direction.resulting_status();
        let stamp = self.context.set_status(&self.key, followed);
        info!(topic = %self.key, follower = %user, ?direction, "follow toggled");

        let write = match direction {
            Direction::Follow => {
                self.store
                    .put_subscription(SubscriptionRecord::new(user.clone(), self.topic.clone()))
                    .await
            }
            Direction::Unfollow => self.store.delete_subscription(&user, &self.key).await,
        };

        if let Err(e) = write {
            warn!(topic = %self.key, follower = %user, error = %e, "follow write failed");
            if self.revert_on_failure && self.context.revert_status(&self.key, !followed, stamp) {
                debug!(topic = %self.key, "optimistic status reverted");
            }
            return Err(e);
        }

        if let Some(hooks) = &self.hooks {
            let result = match direction {
                Direction::Follow => hooks.on_follow(&user, &self.topic).await,
                Direction::Unfollow => hooks.on_unfollow(&user, &self.topic).await,
            };
            if let Err(e) = result {
                warn!(topic = %self.key, error = %e, "follow hook failed");
            }
        }

        Ok(Activation::Toggled { followed })
    }

    /// Row-level follow control for list cards.
    pub fn control(&self) -> FollowControl {
        FollowControl::new(self.key.clone(), self.status())
    }

    pub fn view(&self, t: &dyn Translator) -> ButtonView {
        let control = self.control();
        let label = control.label(t);
        let dialog = (*self.confirming.lock()).map(|direction| {
            let key = match direction {
                Direction::Follow => i18n::CONFIRM_FOLLOW,
                Direction::Unfollow => i18n::CONFIRM_UNFOLLOW,
            };
            ConfirmDialog {
                direction,
                message: t.t(key, &[("topic", self.key.as_str())]),
            }
        });

        ButtonView {
            label,
            following: control.status == FollowStatus::Following,
            dialog,
        }
    }
}
