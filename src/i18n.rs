//! Translation seam for user-facing labels.

/// Label shown on a button that will follow.
pub const FOLLOW_LABEL: &str = "follow.follow";
/// Label shown on a button that will unfollow.
pub const UNFOLLOW_LABEL: &str = "follow.unfollow";
pub const CONFIRM_FOLLOW: &str = "follow.confirm_follow";
pub const CONFIRM_UNFOLLOW: &str = "follow.confirm_unfollow";
pub const FOLLOWED_BILLS_TITLE: &str = "follow.bills";
pub const FOLLOWED_USERS_TITLE: &str = "follow.users";
pub const FOLLOWERS_TITLE: &str = "follow.followers";

/// Synchronous `t(key, params)` lookup.
pub trait Translator {
    fn t(&self, key: &str, params: &[(&str, &str)]) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str, &[(&str, &str)]) -> String,
{
    fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        self(key, params)
    }
}

/// Returns the key itself, with params appended as `key{name=value}`.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyTranslator;

impl Translator for KeyTranslator {
    fn t(&self, key: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return key.to_string();
        }
        let rendered: Vec<String> = params
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        format!("{}{{{}}}", key, rendered.join(","))
    }
}
