//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level goal functions to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + message.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call loads the goal store, applies one use-case and persists it
//!   before returning.
//! - Calls are serialized process-wide so concurrent isolates never lose a
//!   read-modify-write of the goal blob.

use atlas_core::db::open_db;
use atlas_core::{
    core_version as core_version_inner, group_by_year, init_logging as init_logging_inner,
    ping as ping_inner, status_at, Category, Goal, GoalDraft, GoalId, GoalPatch, GoalQuery,
    GoalStore, Location, SqliteBlobStore, StoreConfig,
};
use chrono::{DateTime, TimeZone, Utc};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const GOALS_DB_FILE_NAME: &str = "atlas_goals.sqlite3";
static GOALS_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Location supplied by the location picker.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalLocationInput {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub country: String,
    pub place_id: Option<String>,
}

/// Flat goal projection for Dart.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalItem {
    pub goal_id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    /// Category wire name (`travel`, `food`, ...).
    pub category: String,
    pub category_label: String,
    pub category_icon: String,
    /// `planned|completed|wishlist`, evaluated at call time.
    pub status: String,
    pub created_at_ms: i64,
    pub timeline_date_ms: i64,
    pub completed: bool,
    pub completed_at_ms: Option<i64>,
    pub notes: String,
    pub location: Option<GoalLocationInput>,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalListResponse {
    pub items: Vec<GoalItem>,
    pub message: String,
}

/// One year section of the timeline/archive.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineYear {
    pub year: i32,
    pub items: Vec<GoalItem>,
}

/// Timeline response envelope, newest year first.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineResponse {
    pub years: Vec<TimelineYear>,
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalActionResponse {
    pub ok: bool,
    pub goal_id: Option<String>,
    pub message: String,
}

impl GoalActionResponse {
    fn success(message: impl Into<String>, goal_id: String) -> Self {
        Self {
            ok: true,
            goal_id: Some(goal_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            goal_id: None,
            message: message.into(),
        }
    }
}

/// Lists goals in collection order.
///
/// - `category`: optional category name; unknown names match `other`.
/// - `completed`: `Some(true)` archive, `Some(false)` active, `None` all.
#[flutter_rust_bridge::frb(sync)]
pub fn goals_list(category: Option<String>, completed: Option<bool>) -> GoalListResponse {
    let query = GoalQuery {
        category: category.as_deref().map(Category::parse_lenient),
        completed,
        ..GoalQuery::default()
    };
    let now = Utc::now();

    match with_store(|store| {
        store
            .list_goals(&query)
            .into_iter()
            .map(|goal| to_goal_item(goal, now))
            .collect::<Vec<_>>()
    }) {
        Ok(items) => {
            let message = if items.is_empty() {
                "No goals.".to_string()
            } else {
                format!("Found {} goal(s).", items.len())
            };
            GoalListResponse { items, message }
        }
        Err(err) => GoalListResponse {
            items: Vec::new(),
            message: format!("goals_list failed: {err}"),
        },
    }
}

/// Groups goals by year for the timeline (`completed_only=false`) or the
/// archive (`completed_only=true`).
#[flutter_rust_bridge::frb(sync)]
pub fn goals_timeline(completed_only: bool) -> TimelineResponse {
    let now = Utc::now();
    let result = with_store(|store| {
        let source = if completed_only {
            store.completed_goals()
        } else {
            store.goals().iter().collect()
        };
        group_by_year(source)
            .into_iter()
            .map(|group| TimelineYear {
                year: group.year,
                items: group
                    .goals
                    .into_iter()
                    .map(|goal| to_goal_item(goal, now))
                    .collect(),
            })
            .collect::<Vec<_>>()
    });

    match result {
        Ok(years) => TimelineResponse {
            message: format!("{} year(s).", years.len()),
            years,
        },
        Err(err) => TimelineResponse {
            years: Vec::new(),
            message: format!("goals_timeline failed: {err}"),
        },
    }
}

/// Creates a goal from the creation form.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_add(
    title: String,
    description: String,
    category: String,
    timeline_date_ms: i64,
    image: Option<String>,
    location: Option<GoalLocationInput>,
) -> GoalActionResponse {
    let Some(timeline_date) = from_epoch_ms(timeline_date_ms) else {
        return GoalActionResponse::failure(format!(
            "goal_add failed: timeline_date_ms {timeline_date_ms} is out of range"
        ));
    };

    let mut draft = GoalDraft::new(
        title.trim().to_string(),
        Category::parse_lenient(&category),
        timeline_date,
    );
    draft.description = description;
    draft.image = image.filter(|uri| !uri.trim().is_empty());
    draft.location = location.map(to_location);

    match with_store(|store| store.add_goal(draft)) {
        Ok(goal_id) => GoalActionResponse::success("Goal created.", goal_id.to_string()),
        Err(err) => GoalActionResponse::failure(format!("goal_add failed: {err}")),
    }
}

/// Replaces any supplied text fields of one goal.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_update_text(
    goal_id: String,
    title: Option<String>,
    description: Option<String>,
    notes: Option<String>,
) -> GoalActionResponse {
    let patch = GoalPatch {
        title: title.map(|value| value.trim().to_string()),
        description,
        notes,
        ..GoalPatch::default()
    };
    mutate("goal_update_text", "Goal updated.", goal_id, |store, id| {
        store.update_goal(id, patch)
    })
}

/// Permanently deletes one goal.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_delete(goal_id: String) -> GoalActionResponse {
    mutate("goal_delete", "Goal deleted.", goal_id, |store, id| {
        store.delete_goal(id)
    })
}

/// Marks one goal completed now, optionally replacing its notes.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_mark_complete(goal_id: String, notes: Option<String>) -> GoalActionResponse {
    mutate("goal_mark_complete", "Goal completed.", goal_id, |store, id| {
        store.mark_complete(id, notes)
    })
}

/// Reopens one completed goal.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_mark_incomplete(goal_id: String) -> GoalActionResponse {
    mutate("goal_mark_incomplete", "Goal reopened.", goal_id, |store, id| {
        store.mark_incomplete(id)
    })
}

type FfiStore<'conn> = GoalStore<SqliteBlobStore<'conn>>;

fn mutate(
    op: &str,
    success_message: &str,
    goal_id: String,
    apply: impl FnOnce(&mut FfiStore<'_>, &GoalId) -> bool,
) -> GoalActionResponse {
    let id = match GoalId::parse(goal_id) {
        Ok(id) => id,
        Err(err) => return GoalActionResponse::failure(format!("{op} failed: {err}")),
    };

    match with_store(|store| apply(store, &id)) {
        Ok(true) => GoalActionResponse::success(success_message, id.to_string()),
        Ok(false) => GoalActionResponse::failure(format!("{op} failed: goal not found: {id}")),
        Err(err) => GoalActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn with_store<T>(f: impl FnOnce(&mut FfiStore<'_>) -> T) -> Result<T, String> {
    let _guard = STORE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let db_path = resolve_goals_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("goal DB open failed: {err}"))?;
    let backend = SqliteBlobStore::try_new(&conn)
        .map_err(|err| format!("goal storage init failed: {err}"))?;
    let mut store = GoalStore::try_open(backend, StoreConfig::default())
        .map_err(|err| format!("goal storage read failed: {err}"))?;

    let output = f(&mut store);
    if store.last_save_failed() {
        warn!("event=ffi_call module=ffi status=error error_code=persist_failed");
        return Err("goal changes could not be saved".to_string());
    }
    Ok(output)
}

fn resolve_goals_db_path() -> PathBuf {
    GOALS_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("ATLAS_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(GOALS_DB_FILE_NAME)
        })
        .clone()
}

fn from_epoch_ms(epoch_ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(epoch_ms).single()
}

fn to_location(input: GoalLocationInput) -> Location {
    Location {
        latitude: input.latitude,
        longitude: input.longitude,
        city: input.city,
        country: input.country,
        place_id: input.place_id,
    }
}

fn to_goal_item(goal: &Goal, now: DateTime<Utc>) -> GoalItem {
    let meta = goal.category.meta();
    GoalItem {
        goal_id: goal.id.to_string(),
        title: goal.title.clone(),
        description: goal.description.clone(),
        image: goal.image.clone(),
        category: goal.category.as_str().to_string(),
        category_label: meta.label.to_string(),
        category_icon: meta.icon.to_string(),
        status: status_at(goal, now).as_str().to_string(),
        created_at_ms: goal.created_at.timestamp_millis(),
        timeline_date_ms: goal.timeline_date.timestamp_millis(),
        completed: goal.completed,
        completed_at_ms: goal.completed_at.map(|instant| instant.timestamp_millis()),
        notes: goal.notes.clone(),
        location: goal.location.as_ref().map(|location| GoalLocationInput {
            latitude: location.latitude,
            longitude: location.longitude,
            city: location.city.clone(),
            country: location.country.clone(),
            place_id: location.place_id.clone(),
        }),
    }
}
