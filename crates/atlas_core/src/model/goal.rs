//! Goal domain model.
//!
//! # Responsibility
//! - Define the canonical bucket-list record and its location value.
//! - Provide creation drafts, partial patches and completion helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another goal.
//! - `completed_at.is_some()` exactly when `completed` is true.
//! - `created_at` never changes after creation.
//! - All instants are held at millisecond precision.

use crate::model::category::Category;
use crate::model::time::{now_millis, truncate_to_millis};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const GOAL_ID_PREFIX: &str = "goal";
const GOAL_ID_SUFFIX_LEN: usize = 9;

/// Opaque, stable identifier of one goal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalId(String);

impl GoalId {
    /// Generates a fresh id of the form `goal_<epoch-millis>_<suffix>`.
    pub fn generate(now: DateTime<Utc>) -> Self {
        let entropy = Uuid::new_v4().simple().to_string();
        let suffix = &entropy[..GOAL_ID_SUFFIX_LEN];
        Self(format!(
            "{GOAL_ID_PREFIX}_{}_{suffix}",
            now.timestamp_millis()
        ))
    }

    /// Wraps an existing id, rejecting blank values.
    pub fn parse(value: impl Into<String>) -> Result<Self, ModelError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ModelError::EmptyId);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for GoalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Model-level validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Goal id is empty or whitespace.
    EmptyId,
    /// `completed` and `completed_at` disagree.
    InconsistentCompletion { completed: bool },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "goal id must not be empty"),
            Self::InconsistentCompletion { completed: true } => {
                write!(f, "completed goal is missing completed_at")
            }
            Self::InconsistentCompletion { completed: false } => {
                write!(f, "open goal must not carry completed_at")
            }
        }
    }
}

impl Error for ModelError {}

/// Place attached to a goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
    /// Geocoder place identifier, when the picker supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl Location {
    pub fn new(
        latitude: f64,
        longitude: f64,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            city: city.into(),
            country: country.into(),
            place_id: None,
        }
    }

    /// Whether both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Canonical bucket-list record.
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: GoalId,
    pub title: String,
    pub description: String,
    /// Cover picture URI. `None` falls back to the category icon.
    pub image: Option<String>,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    /// Target date chosen by the user; drives status and timeline grouping.
    pub timeline_date: DateTime<Utc>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: String,
    pub location: Option<Location>,
}

impl Goal {
    /// Materializes a draft into a goal with the given identity.
    ///
    /// # Invariants
    /// - A completed draft without a timestamp is stamped with `created_at`.
    /// - An open draft never keeps a completion timestamp.
    /// - A location with non-finite coordinates is dropped.
    pub fn from_draft(id: GoalId, created_at: DateTime<Utc>, draft: GoalDraft) -> Self {
        let created_at = truncate_to_millis(created_at);
        let mut goal = Self {
            id,
            title: draft.title,
            description: draft.description,
            image: draft.image,
            category: draft.category,
            created_at,
            timeline_date: truncate_to_millis(draft.timeline_date),
            completed: draft.completed,
            completed_at: draft.completed_at.map(truncate_to_millis),
            notes: draft.notes,
            location: draft.location.filter(Location::is_finite),
        };
        goal.normalize_completion(created_at);
        goal
    }

    /// Checks identity and completion invariants.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ModelError::EmptyId);
        }
        if self.completed != self.completed_at.is_some() {
            return Err(ModelError::InconsistentCompletion {
                completed: self.completed,
            });
        }
        Ok(())
    }

    /// Marks the goal done at `now`; `notes` overwrite only when supplied.
    pub fn complete(&mut self, notes: Option<String>, now: DateTime<Utc>) {
        self.completed = true;
        self.completed_at = Some(truncate_to_millis(now));
        if let Some(notes) = notes {
            self.notes = notes;
        }
    }

    /// Reopens the goal. Notes are kept.
    pub fn reopen(&mut self) {
        self.completed = false;
        self.completed_at = None;
    }

    /// Shallow-merges `patch` into this goal, then restores the completion
    /// invariant using `now` for a missing timestamp.
    pub fn apply_patch(&mut self, patch: GoalPatch, now: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(timeline_date) = patch.timeline_date {
            self.timeline_date = truncate_to_millis(timeline_date);
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = completed_at.map(truncate_to_millis);
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(location) = patch.location {
            self.location = location.filter(Location::is_finite);
        }
        self.normalize_completion(now);
    }

    /// Repairs `completed_at` so it agrees with `completed`.
    ///
    /// Returns `true` when a field had to change.
    pub fn normalize_completion(&mut self, stamp: DateTime<Utc>) -> bool {
        match (self.completed, self.completed_at) {
            (true, None) => {
                self.completed_at = Some(truncate_to_millis(stamp));
                true
            }
            (false, Some(_)) => {
                self.completed_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn has_location(&self) -> bool {
        self.location.is_some()
    }

    /// Date used for chronological grouping: completion when done, target
    /// date otherwise.
    pub fn anchor_date(&self) -> DateTime<Utc> {
        match self.completed_at {
            Some(completed_at) if self.completed => completed_at,
            _ => self.timeline_date,
        }
    }
}

/// Every goal field except identity and creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalDraft {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub category: Category,
    pub timeline_date: DateTime<Utc>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub notes: String,
    pub location: Option<Location>,
}

impl GoalDraft {
    /// Blank creation-form state targeting `now`.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            image: None,
            category: Category::default(),
            timeline_date: now,
            completed: false,
            completed_at: None,
            notes: String::new(),
            location: None,
        }
    }

    /// Draft with a title, category and target date; everything else blank.
    pub fn new(
        title: impl Into<String>,
        category: Category,
        timeline_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            category,
            ..Self::empty(timeline_date)
        }
    }
}

impl Default for GoalDraft {
    fn default() -> Self {
        Self::empty(now_millis())
    }
}

/// Partial update for an existing goal.
///
/// `None` leaves a field untouched. Nullable fields use a nested option:
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<Option<String>>,
    pub category: Option<Category>,
    pub timeline_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub notes: Option<String>,
    pub location: Option<Option<Location>>,
}

impl GoalPatch {
    /// Returns whether applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
