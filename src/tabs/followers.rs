//! "Followers" tab: who follows the current user, and whether they are
//! followed back.

use crate::error::{FollowError, Result};
use crate::generation::Generation;
use crate::i18n::{self, Translator};
use crate::list_card::{render_list_card, FollowControl, ListCardView, ListItem, RowParts};
use crate::session::SessionProvider;
use crate::status::FollowStatusContext;
use crate::store::{FollowersRpc, GetFollowersRequest, SubscriptionStore};
use crate::types::{TopicKey, TopicKind, UserLookup};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct FollowersState {
    rows: Vec<ListItem<UserLookup>>,
    follower_count: Option<usize>,
}

pub struct FollowersTab {
    rpc: Arc<dyn FollowersRpc>,
    store: Arc<dyn SubscriptionStore>,
    context: Arc<FollowStatusContext>,
    session: Arc<dyn SessionProvider>,
    generation: Generation,
    state: Mutex<FollowersState>,
}

impl FollowersTab {
    pub fn new(
        rpc: Arc<dyn FollowersRpc>,
        store: Arc<dyn SubscriptionStore>,
        context: Arc<FollowStatusContext>,
        session: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            rpc,
            store,
            context,
            session,
            generation: Generation::new(),
            state: Mutex::new(FollowersState::default()),
        }
    }

    /// Fetch followers and the user's own follow set, and combine them.
    ///
    /// The two queries run concurrently. A failed followers call is logged and
    /// leaves the list empty with no count; it is not returned as an error.
    /// A failed own-set query leaves follow-back status unknown.
    pub async fn refresh(&self) -> Result<bool> {
        let user = self.session.user_id().ok_or(FollowError::Unauthenticated)?;
        let generation = self.generation.begin();
        let ticket = self.context.begin_query();

        let request = GetFollowersRequest {
            uid: user.as_str().to_string(),
        };
        let (followers, own) = tokio::join!(
            self.rpc.get_followers(request),
            self.store.list_subscriptions(&user, TopicKind::Testimony),
        );

        if !self.generation.is_current(generation) {
            debug!(generation, "discarding stale followers listing");
            return Ok(false);
        }

        let followers = match followers {
            Ok(response) => response.data,
            Err(e) => {
                warn!(uid = %user, error = %e, "get followers failed");
                *self.state.lock() = FollowersState::default();
                return Ok(true);
            }
        };

        match own {
            Ok(records) => {
                let followed: HashSet<TopicKey> =
                    records.into_iter().map(|record| record.topic_key).collect();
                for follower in &followers {
                    let key = TopicKey::testimony(follower);
                    let following = followed.contains(&key);
                    self.context.report_status(&key, ticket, following);
                }
            }
            Err(e) => {
                warn!(uid = %user, error = %e, "own follow set query failed");
            }
        }

        info!(uid = %user, followers = followers.len(), "followers loaded");
        let mut state = self.state.lock();
        state.follower_count = Some(followers.len());
        state.rows = followers
            .into_iter()
            .map(|id| ListItem::ready(UserLookup::new(id)))
            .collect();
        Ok(true)
    }

    /// `None` until a followers call succeeds.
    pub fn follower_count(&self) -> Option<usize> {
        self.state.lock().follower_count
    }

    pub fn followers(&self) -> Vec<ListItem<UserLookup>> {
        self.state.lock().rows.clone()
    }

    pub fn card(&self, t: &dyn Translator) -> ListCardView<UserLookup> {
        let state = self.state.lock();
        render_list_card(t.t(i18n::FOLLOWERS_TITLE, &[]), &state.rows, |user| {
            let key = TopicKey::testimony(&user.profile_id);
            let status = self.context.get_status(&key);
            RowParts {
                content: user.clone(),
                follow: Some(FollowControl::new(key, status)),
            }
        })
    }

    pub fn dispose(&self) {
        self.generation.dispose();
    }
}
