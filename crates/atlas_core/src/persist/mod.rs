//! Persistence adapter between in-memory goals and the durable blob.
//!
//! # Responsibility
//! - Map `Goal` to and from `PersistedGoal`, whose instants are ISO-8601
//!   strings.
//! - Encode/decode the `{ "goals": [...] }` blob stored under one key.
//!
//! # Invariants
//! - Field names are camelCase and stable; existing blobs must keep loading.
//! - `deserialize_goal(serialize_goal(goal)) == goal` at millisecond
//!   precision.
//! - Instants are written as `YYYY-MM-DDTHH:MM:SS.sssZ`.

use crate::model::category::Category;
use crate::model::goal::{Goal, GoalId, Location, ModelError};
use crate::model::time::truncate_to_millis;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistResult<T> = Result<T, PersistError>;

/// Serialization or decoding failure for persisted goal data.
#[derive(Debug)]
pub enum PersistError {
    Json(serde_json::Error),
    InvalidTimestamp { field: &'static str, value: String },
    MissingGoals,
    NonFiniteCoordinate { goal_id: String },
    Model(ModelError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid goal blob json: {err}"),
            Self::InvalidTimestamp { field, value } => {
                write!(f, "invalid timestamp `{value}` in {field}")
            }
            Self::MissingGoals => write!(f, "goal blob has no `goals` array"),
            Self::NonFiniteCoordinate { goal_id } => {
                write!(f, "goal `{goal_id}` has a non-finite location coordinate")
            }
            Self::Model(err) => write!(f, "invalid persisted goal: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Model(err) => Some(err),
            Self::InvalidTimestamp { .. }
            | Self::MissingGoals
            | Self::NonFiniteCoordinate { .. } => None,
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ModelError> for PersistError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

/// Wire shape of one goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedGoal {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    pub category: Category,
    pub created_at: String,
    pub timeline_date: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Serialize)]
struct PersistedGoalsState<'a> {
    goals: &'a [PersistedGoal],
}

/// Formats an instant the way JavaScript `Date.toISOString` does.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 timestamp (any offset) or a bare `YYYY-MM-DD` date,
/// which is read as UTC midnight.
/// Sub-millisecond digits are dropped.
pub fn parse_timestamp(field: &'static str, value: &str) -> PersistResult<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(truncate_to_millis(parsed.with_timezone(&Utc)));
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| PersistError::InvalidTimestamp {
            field,
            value: value.to_string(),
        })
}

/// Converts a goal to its persisted form.
pub fn serialize_goal(goal: &Goal) -> PersistedGoal {
    PersistedGoal {
        id: goal.id.to_string(),
        title: goal.title.clone(),
        description: goal.description.clone(),
        image: goal.image.clone(),
        category: goal.category,
        created_at: format_timestamp(goal.created_at),
        timeline_date: format_timestamp(goal.timeline_date),
        completed: goal.completed,
        completed_at: goal.completed_at.map(format_timestamp),
        notes: goal.notes.clone(),
        location: goal.location.clone(),
    }
}

/// Converts a persisted goal back to the domain model.
///
/// A completion flag without a timestamp is repaired with the target date;
/// a stray timestamp on an open goal is dropped.
pub fn deserialize_goal(persisted: PersistedGoal) -> PersistResult<Goal> {
    let created_at = parse_timestamp("createdAt", &persisted.created_at)?;
    let timeline_date = parse_timestamp("timelineDate", &persisted.timeline_date)?;
    let completed_at = persisted
        .completed_at
        .as_deref()
        .map(|value| parse_timestamp("completedAt", value))
        .transpose()?;

    let mut goal = Goal {
        id: GoalId::parse(persisted.id)?,
        title: persisted.title,
        description: persisted.description,
        image: persisted.image,
        category: persisted.category,
        created_at,
        timeline_date,
        completed: persisted.completed,
        completed_at,
        notes: persisted.notes,
        location: persisted.location,
    };
    goal.normalize_completion(timeline_date);
    Ok(goal)
}

/// Encodes the full collection as the `{ "goals": [...] }` blob.
///
/// JSON has no non-finite numbers, so a goal whose location carries one is
/// rejected instead of being written as `null`.
pub fn encode_blob(goals: &[Goal]) -> PersistResult<String> {
    if let Some(goal) = goals
        .iter()
        .find(|goal| goal.location.as_ref().is_some_and(|loc| !loc.is_finite()))
    {
        return Err(PersistError::NonFiniteCoordinate {
            goal_id: goal.id.to_string(),
        });
    }
    let persisted = goals.iter().map(serialize_goal).collect::<Vec<_>>();
    let state = PersistedGoalsState { goals: &persisted };
    Ok(serde_json::to_string(&state)?)
}

/// Decodes a stored blob.
///
/// Accepts the bare `{ "goals": [...] }` shape and the persist-middleware
/// envelope `{ "state": { "goals": [...] }, "version": N }`.
pub fn decode_blob(raw: &str) -> PersistResult<Vec<Goal>> {
    let root: Value = serde_json::from_str(raw)?;
    let state = root.get("state").unwrap_or(&root);
    let goals = state.get("goals").ok_or(PersistError::MissingGoals)?;
    if !goals.is_array() {
        return Err(PersistError::MissingGoals);
    }

    let persisted: Vec<PersistedGoal> = serde_json::from_value(goals.clone())?;
    persisted.into_iter().map(deserialize_goal).collect()
}
