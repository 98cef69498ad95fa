//! Change notifications emitted by the goal store.

use crate::model::goal::GoalId;

/// One applied change to the goal collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalEvent {
    Added(GoalId),
    Updated(GoalId),
    Deleted(GoalId),
    Completed(GoalId),
    Reopened(GoalId),
    /// The whole collection was replaced from storage.
    Loaded { count: usize },
}

impl GoalEvent {
    /// Affected goal, if the event concerns a single record.
    pub fn goal_id(&self) -> Option<&GoalId> {
        match self {
            Self::Added(id)
            | Self::Updated(id)
            | Self::Deleted(id)
            | Self::Completed(id)
            | Self::Reopened(id) => Some(id),
            Self::Loaded { .. } => None,
        }
    }
}

/// Handle returned by `GoalStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub(crate) u64);

pub(crate) type Listener = Box<dyn FnMut(&GoalEvent)>;
