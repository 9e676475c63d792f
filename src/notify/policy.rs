//! Notification predicate
//!
//! Whether a freshly computed verdict warrants an outbound alert. Both
//! historical behaviors exist as named variants; the default is
//! `StrongOnly`, which limits alerts to high-conviction categories to
//! avoid alert fatigue.

use crate::types::Verdict;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// Fire on any verdict change
    AnyChange,
    /// Fire only when the verdict changed AND is a strong category
    StrongOnly,
}

impl NotifyPolicy {
    /// A first-ever verdict (`last == None`) counts as a change.
    pub fn should_notify(&self, last: Option<Verdict>, current: Verdict) -> bool {
        let changed = last != Some(current);
        match self {
            NotifyPolicy::AnyChange => changed,
            NotifyPolicy::StrongOnly => changed && current.is_strong(),
        }
    }
}

impl Default for NotifyPolicy {
    fn default() -> Self {
        NotifyPolicy::StrongOnly
    }
}
