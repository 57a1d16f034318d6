//! # Follow Sync
//!
//! Follow/unfollow state for bills and users, kept consistent across every
//! control that shows the same topic.
//!
//! ## Core Concepts
//!
//! - **Topics**: bills and users, addressed by deterministic keys
//!   (`bill-{court}-{billId}`, `testimony-{profileId}`)
//! - **Store**: async persistence of one subscription record per
//!   `(follower, topic)`
//! - **Status context**: the session-wide topic -> followed cache; user
//!   toggles always outrank older status queries
//! - **Buttons**: per-topic state machines with optional confirmation
//! - **Tabs**: Following / Followers listings rendered as list cards
//!
//! ## Example
//!
//! ```ignore
//! use follow_sync::{
//!     FollowButton, FollowStatusContext, InMemorySubscriptionStore, StaticSession, Topic, UserId,
//! };
//!
//! let context = Arc::new(FollowStatusContext::new());
//! let store = Arc::new(InMemorySubscriptionStore::new());
//! let session = Arc::new(StaticSession::signed_in(UserId::new("u1")));
//!
//! let button = FollowButton::new(Topic::bill(193, "H100"), context, store, session);
//! button.mount().await?;
//! button.activate().await?;
//! ```

pub mod button;
pub mod config;
pub mod error;
mod generation;
pub mod i18n;
pub mod list_card;
pub mod session;
pub mod status;
pub mod store;
pub mod tabs;
pub mod types;

// Re-exports
pub use button::{Activation, ButtonState, ButtonView, ConfirmDialog, FollowButton, FollowHooks};
pub use config::{ConfirmationPolicy, FollowConfig};
pub use error::{FollowError, Result};
pub use i18n::{KeyTranslator, Translator};
pub use list_card::{render_list_card, FollowControl, ListCardView, ListItem, ListRow, RowParts};
pub use session::{SessionProvider, StaticSession};
pub use status::{
    ChangeOrigin, DropReason, FollowStatusContext, StatusEvent, StatusTicket, WatchFilter,
    WatchHandle, WatchId,
};
pub use store::{
    FollowersRpc, GetFollowersRequest, GetFollowersResponse, InMemorySubscriptionStore,
    SubscriptionStore,
};
pub use tabs::{FollowersTab, FollowingLists, FollowingTab};
pub use types::*;
