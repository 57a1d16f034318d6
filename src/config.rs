//! Follow behaviour configuration.

use crate::error::{FollowError, Result};
use crate::types::Direction;
use serde::{Deserialize, Serialize};

/// Which toggle directions ask the user to confirm first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConfirmationPolicy {
    pub confirm_follow: bool,
    pub confirm_unfollow: bool,
}

impl ConfirmationPolicy {
    /// No confirmation in either direction.
    pub fn none() -> Self {
        Self::default()
    }

    /// Confirm before unfollowing only.
    pub fn unfollow_only() -> Self {
        Self {
            confirm_follow: false,
            confirm_unfollow: true,
        }
    }

    pub fn requires(&self, direction: Direction) -> bool {
        match direction {
            Direction::Follow => self.confirm_follow,
            Direction::Unfollow => self.confirm_unfollow,
        }
    }
}

/// Follow configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FollowConfig {
    /// Default confirmation policy for new buttons.
    pub confirmation: ConfirmationPolicy,

    /// Undo the optimistic status when the store write fails.
    /// Default: true
    pub revert_on_write_failure: bool,

    /// Max buffered events per status watcher before it is dropped.
    /// Default: 256
    pub watch_buffer_size: usize,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            confirmation: ConfirmationPolicy::default(),
            revert_on_write_failure: true,
            watch_buffer_size: 256,
        }
    }
}

impl FollowConfig {
    /// Parse a JSON config document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FollowConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.watch_buffer_size == 0 {
            return Err(FollowError::InvalidConfig(
                "watchBufferSize must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
