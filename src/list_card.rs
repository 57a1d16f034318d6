//! Titled list of followable items.
//!
//! Rendering is a pure mapping from items to rows. No deduplication is done;
//! callers pass the list they want shown.

use crate::i18n::{self, Translator};
use crate::types::{FollowStatus, TopicKey};

/// One entry of a list, with its own loading flag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListItem<T> {
    pub subject: T,
    pub loading: bool,
}

impl<T> ListItem<T> {
    pub fn ready(subject: T) -> Self {
        Self {
            subject,
            loading: false,
        }
    }

    pub fn loading(subject: T) -> Self {
        Self {
            subject,
            loading: true,
        }
    }
}

/// Row-level follow control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FollowControl {
    pub topic: TopicKey,
    pub status: FollowStatus,
}

impl FollowControl {
    pub fn new(topic: TopicKey, status: FollowStatus) -> Self {
        Self { topic, status }
    }

    /// Action label; `None` while the status is unknown.
    pub fn label(&self, t: &dyn Translator) -> Option<String> {
        match self.status {
            FollowStatus::Unknown => None,
            FollowStatus::Following => Some(t.t(i18n::UNFOLLOW_LABEL, &[])),
            FollowStatus::NotFollowing => Some(t.t(i18n::FOLLOW_LABEL, &[])),
        }
    }
}

/// What a caller supplies for a loaded item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowParts<C> {
    pub content: C,
    pub follow: Option<FollowControl>,
}

/// A rendered row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListRow<C> {
    Placeholder,
    Entry {
        content: C,
        follow: Option<FollowControl>,
    },
}

impl<C> ListRow<C> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ListRow::Placeholder)
    }

    pub fn follow(&self) -> Option<&FollowControl> {
        match self {
            ListRow::Entry { follow, .. } => follow.as_ref(),
            ListRow::Placeholder => None,
        }
    }
}

/// A rendered card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListCardView<C> {
    pub title: String,
    pub rows: Vec<ListRow<C>>,
}

impl<C> ListCardView<C> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render items in order. `render_item` is only called for items not loading.
pub fn render_list_card<T, C, F>(
    title: String,
    items: &[ListItem<T>],
    mut render_item: F,
) -> ListCardView<C>
where
    F: FnMut(&T) -> RowParts<C>,
{
    let rows = items
        .iter()
        .map(|item| {
            if item.loading {
                ListRow::Placeholder
            } else {
                let parts = render_item(&item.subject);
                ListRow::Entry {
                    content: parts.content,
                    follow: parts.follow,
                }
            }
        })
        .collect();

    ListCardView { title, rows }
}
