//! Goal status classification.

use crate::model::goal::Goal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Display status derived from completion and target date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    /// Target date reached or passed, not yet done.
    Planned,
    Completed,
    /// Target date still ahead.
    Wishlist,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Completed => "completed",
            Self::Wishlist => "wishlist",
        }
    }
}

impl Display for GoalStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies `goal` relative to `now`.
///
/// Completion always wins; otherwise a strictly future target date is a
/// wishlist item and anything else is planned.
pub fn status_at(goal: &Goal, now: DateTime<Utc>) -> GoalStatus {
    if goal.completed {
        GoalStatus::Completed
    } else if goal.timeline_date > now {
        GoalStatus::Wishlist
    } else {
        GoalStatus::Planned
    }
}

/// Classifies `goal` against the current clock.
pub fn goal_status(goal: &Goal) -> GoalStatus {
    status_at(goal, Utc::now())
}
