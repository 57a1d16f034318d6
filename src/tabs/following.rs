//! "Following" tab: the bills and users the current user follows.

use crate::error::{FollowError, Result};
use crate::generation::Generation;
use crate::i18n::{self, Translator};
use crate::list_card::{render_list_card, FollowControl, ListCardView, ListItem, RowParts};
use crate::session::SessionProvider;
use crate::status::{
    ChangeOrigin, DropReason, FollowStatusContext, StatusEvent, WatchFilter, WatchHandle,
};
use crate::store::SubscriptionStore;
use crate::types::{
    BillLookup, FollowStatus, SubscriptionRecord, Topic, TopicKey, TopicKind, UserLookup,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Current contents of the tab.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FollowingLists {
    pub bills: Vec<ListItem<BillLookup>>,
    pub users: Vec<ListItem<UserLookup>>,
}

pub struct FollowingTab {
    store: Arc<dyn SubscriptionStore>,
    context: Arc<FollowStatusContext>,
    session: Arc<dyn SessionProvider>,
    watch: Mutex<WatchHandle>,
    generation: Generation,
    lists: Mutex<FollowingLists>,
}

impl FollowingTab {
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        context: Arc<FollowStatusContext>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        let watch = context.watch(Self::unfollow_filter());
        Self {
            store,
            context,
            session,
            watch: Mutex::new(watch),
            generation: Generation::new(),
            lists: Mutex::new(FollowingLists::default()),
        }
    }

    fn unfollow_filter() -> WatchFilter {
        WatchFilter::kinds(vec![TopicKind::Bill, TopicKind::Testimony])
            .with_origins(vec![ChangeOrigin::Toggle])
    }

    /// Fetch both lists, replacing whatever is shown.
    ///
    /// Returns `Ok(false)` when the response was superseded or the tab was
    /// disposed while waiting.
    pub async fn refresh(&self) -> Result<bool> {
        let user = self.session.user_id().ok_or(FollowError::Unauthenticated)?;
        let generation = self.generation.begin();
        let ticket = self.context.begin_query();

        let (bills, users) = tokio::join!(
            self.store.list_subscriptions(&user, TopicKind::Bill),
            self.store.list_subscriptions(&user, TopicKind::Testimony),
        );
        let (bills, users) = match (bills, users) {
            (Ok(bills), Ok(users)) => (bills, users),
            (Err(e), _) | (_, Err(e)) => {
                warn!(follower = %user, error = %e, "listing followed topics failed");
                return Err(e);
            }
        };

        if !self.generation.is_current(generation) {
            debug!(generation, "discarding stale following listing");
            return Ok(false);
        }

        // Everything listed is followed, unless unfollowed after the ticket.
        for record in bills.iter().chain(users.iter()) {
            self.context.report_status(&record.topic_key, ticket, true);
        }
        let still_followed = |record: &SubscriptionRecord| {
            self.context.get_status(&record.topic_key) != FollowStatus::NotFollowing
        };

        let lists = FollowingLists {
            bills: bills
                .into_iter()
                .filter(|record| still_followed(record))
                .filter_map(|record| bill_payload(record).map(ListItem::ready))
                .collect(),
            users: users
                .into_iter()
                .filter(|record| still_followed(record))
                .filter_map(|record| user_payload(record).map(ListItem::ready))
                .collect(),
        };
        info!(
            follower = %user,
            bills = lists.bills.len(),
            users = lists.users.len(),
            "following lists loaded"
        );
        *self.lists.lock() = lists;
        Ok(true)
    }

    /// Apply local unfollows seen since the last call.
    ///
    /// An unfollow clears the whole list of that kind; the caller refetches.
    /// Returns whether a refetch is needed. A disposed tab never changes.
    pub fn sync(&self) -> bool {
        if self.generation.is_disposed() {
            return false;
        }
        let mut watch = self.watch.lock();
        let mut lists = self.lists.lock();
        let mut stale = false;
        let mut lost = false;

        for event in watch.drain() {
            match event {
                StatusEvent::Changed {
                    topic,
                    followed: false,
                    ..
                } => match topic.kind() {
                    Some(TopicKind::Bill) if !lists.bills.is_empty() => {
                        lists.bills.clear();
                        stale = true;
                    }
                    Some(TopicKind::Testimony) if !lists.users.is_empty() => {
                        lists.users.clear();
                        stale = true;
                    }
                    _ => {}
                },
                StatusEvent::Changed { .. } => {}
                StatusEvent::Dropped {
                    reason: DropReason::BufferOverflow,
                } => lost = true,
                StatusEvent::Dropped {
                    reason: DropReason::Unwatched,
                } => return stale,
            }
        }

        // The overflow notice itself may not fit in a full buffer.
        if lost || watch.is_closed() {
            warn!("following tab lost its status watcher");
            lists.bills.clear();
            lists.users.clear();
            stale = true;
            *watch = self.context.watch(Self::unfollow_filter());
        }

        stale
    }

    pub fn lists(&self) -> FollowingLists {
        self.lists.lock().clone()
    }

    fn control(&self, key: TopicKey) -> FollowControl {
        let status = self.context.get_status(&key);
        FollowControl::new(key, status)
    }

    pub fn bills_card(&self, t: &dyn Translator) -> ListCardView<BillLookup> {
        let lists = self.lists.lock();
        render_list_card(t.t(i18n::FOLLOWED_BILLS_TITLE, &[]), &lists.bills, |bill| RowParts {
            content: bill.clone(),
            follow: Some(self.control(TopicKey::bill(bill.court, &bill.bill_id))),
        })
    }

    pub fn users_card(&self, t: &dyn Translator) -> ListCardView<UserLookup> {
        let lists = self.lists.lock();
        render_list_card(t.t(i18n::FOLLOWED_USERS_TITLE, &[]), &lists.users, |user| RowParts {
            content: user.clone(),
            follow: Some(self.control(TopicKey::testimony(&user.profile_id))),
        })
    }

    pub fn dispose(&self) {
        self.generation.dispose();
        self.context.unwatch(self.watch.lock().id);
    }
}

fn bill_payload(record: SubscriptionRecord) -> Option<BillLookup> {
    match record.topic {
        Topic::Bill(bill) => Some(bill),
        Topic::User(_) => {
            warn!(topic = %record.topic_key, "bill listing returned a user record");
            None
        }
    }
}

fn user_payload(record: SubscriptionRecord) -> Option<UserLookup> {
    match record.topic {
        Topic::User(user) => Some(user),
        Topic::Bill(_) => {
            warn!(topic = %record.topic_key, "user listing returned a bill record");
            None
        }
    }
}
