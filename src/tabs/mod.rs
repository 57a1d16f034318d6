//! Tab views that turn subscription listings into list cards.
//!
//! - [`FollowingTab`]: followed bills and users of the current session
//! - [`FollowersTab`]: users following the current session, with follow-back status
//!
//! Every fetch replaces the shown lists. Responses that arrive after a newer
//! fetch or after `dispose` are dropped.

mod followers;
mod following;

pub use followers::FollowersTab;
pub use following::{FollowingLists, FollowingTab};
