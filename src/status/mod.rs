//! Shared follow status for the current session.
//!
//! Every follow control reads from one [`FollowStatusContext`]:
//! - `get_status` answers `Unknown` until a query resolves
//! - `report_status` merges a query result for one topic
//! - `set_status` records a user toggle and outranks older queries
//!
//! Changes can be observed through bounded watchers.
//!
//! # Example
//!
//! ```ignore
//! let ctx = FollowStatusContext::new();
//! let ticket = ctx.begin_query();
//! let followed = store.get_subscription(&user, &key).await?.is_some();
//! ctx.report_status(&key, ticket, followed);
//! ```

mod context;
mod watch;

pub use context::{FollowStatusContext, StatusTicket};
pub use watch::{ChangeOrigin, DropReason, StatusEvent, WatchFilter, WatchHandle, WatchId};
