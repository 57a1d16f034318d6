//! Current-session provider.

use crate::types::UserId;
use parking_lot::RwLock;

/// Exposes the signed-in user, if any.
pub trait SessionProvider: Send + Sync {
    fn user_id(&self) -> Option<UserId>;
}

/// A session whose user can be swapped at runtime (sign-in / sign-out).
#[derive(Debug, Default)]
pub struct StaticSession {
    user: RwLock<Option<UserId>>,
}

impl StaticSession {
    pub fn signed_in(user: UserId) -> Self {
        Self {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user: UserId) {
        *self.user.write() = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.write() = None;
    }
}

impl SessionProvider for StaticSession {
    fn user_id(&self) -> Option<UserId> {
        self.user.read().clone()
    }
}
