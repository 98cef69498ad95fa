//! Authoritative in-memory goal collection with a durable mirror.
//!
//! # Responsibility
//! - Own the ordered goal list for one application session.
//! - Apply CRUD and completion mutations, then mirror the collection into
//!   the blob store and notify subscribers.
//! - Serve read-only selectors over the current collection.
//!
//! # Invariants
//! - Insertion order is preserved; updates never reorder.
//! - Ids are unique within the collection.
//! - Mutations on an unknown id are silent no-ops returning `false`.
//! - A failed durable write never rolls back in-memory state.
//! - While the last read of the blob failed, nothing is written back, so an
//!   intact blob is never replaced by the fallback collection.

use crate::model::category::Category;
use crate::model::goal::{Goal, GoalDraft, GoalId, GoalPatch};
use crate::model::time::{local_year, now_millis};
use crate::persist::{decode_blob, encode_blob};
use crate::storage::{BlobStore, MemoryBlobStore, StorageResult};
use crate::store::config::{SeedPolicy, StoreConfig};
use crate::store::events::{GoalEvent, Listener, SubscriptionId};
use crate::store::query::GoalQuery;
use crate::store::seed::sample_goals;
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::time::Instant;

/// Goal collection bound to one blob store.
pub struct GoalStore<B: BlobStore> {
    goals: Vec<Goal>,
    backend: B,
    config: StoreConfig,
    listeners: BTreeMap<SubscriptionId, Listener>,
    next_subscription: u64,
    revision: u64,
    last_save_failed: bool,
    load_failed: bool,
}

impl GoalStore<MemoryBlobStore> {
    /// Empty store over a fresh in-memory backend.
    pub fn in_memory() -> Self {
        Self::open(MemoryBlobStore::new(), StoreConfig::default())
    }
}

impl<B: BlobStore> GoalStore<B> {
    /// Loads the collection from `backend`.
    ///
    /// Missing or malformed blobs fall back to the configured seed
    /// collection. A read error also falls back, but the store then refuses
    /// to write until a later `reload` reads the blob successfully.
    pub fn open(backend: B, config: StoreConfig) -> Self {
        let (goals, load_failed) = match load_goals(&backend, &config) {
            Ok(goals) => (goals, false),
            Err(_) => (seed_goals(config.seed), true),
        };
        Self::assemble(backend, config, goals, load_failed)
    }

    /// Like [`GoalStore::open`], but returns backend read errors instead of
    /// falling back.
    pub fn try_open(backend: B, config: StoreConfig) -> StorageResult<Self> {
        let goals = load_goals(&backend, &config)?;
        Ok(Self::assemble(backend, config, goals, false))
    }

    fn assemble(backend: B, config: StoreConfig, goals: Vec<Goal>, load_failed: bool) -> Self {
        Self {
            goals,
            backend,
            config,
            listeners: BTreeMap::new(),
            next_subscription: 0,
            revision: 0,
            last_save_failed: false,
            load_failed,
        }
    }

    /// Re-reads the blob, replacing the in-memory collection.
    ///
    /// On a read error the current collection is kept.
    pub fn reload(&mut self) {
        match load_goals(&self.backend, &self.config) {
            Ok(goals) => {
                self.goals = goals;
                self.load_failed = false;
            }
            Err(_) => {
                self.load_failed = true;
                return;
            }
        }
        let count = self.goals.len();
        self.changed(GoalEvent::Loaded { count });
    }

    /// Creates a goal from `draft` and returns its new id.
    pub fn add_goal(&mut self, draft: GoalDraft) -> GoalId {
        let now = now_millis();
        let mut id = GoalId::generate(now);
        while self.position(&id).is_some() {
            id = GoalId::generate(now);
        }

        self.goals.push(Goal::from_draft(id.clone(), now, draft));
        info!(
            "event=goal_add module=store status=ok goal_id={} total={}",
            id,
            self.goals.len()
        );
        self.persist();
        self.changed(GoalEvent::Added(id.clone()));
        id
    }

    /// Shallow-merges `patch` into the goal with `id`.
    ///
    /// Returns `false` without side effects when `id` is unknown. An empty
    /// patch touches nothing and emits no event.
    pub fn update_goal(&mut self, id: &GoalId, patch: GoalPatch) -> bool {
        let Some(index) = self.position(id) else {
            return self.miss("goal_update", id);
        };
        if patch.is_empty() {
            return true;
        }

        self.goals[index].apply_patch(patch, now_millis());
        info!("event=goal_update module=store status=ok goal_id={id}");
        self.persist();
        self.changed(GoalEvent::Updated(id.clone()));
        true
    }

    /// Permanently removes the goal with `id`.
    pub fn delete_goal(&mut self, id: &GoalId) -> bool {
        let Some(index) = self.position(id) else {
            return self.miss("goal_delete", id);
        };

        self.goals.remove(index);
        info!(
            "event=goal_delete module=store status=ok goal_id={} total={}",
            id,
            self.goals.len()
        );
        self.persist();
        self.changed(GoalEvent::Deleted(id.clone()));
        true
    }

    /// Marks the goal done now. Supplied `notes` replace existing notes.
    pub fn mark_complete(&mut self, id: &GoalId, notes: Option<String>) -> bool {
        let Some(index) = self.position(id) else {
            return self.miss("goal_complete", id);
        };

        self.goals[index].complete(notes, now_millis());
        info!("event=goal_complete module=store status=ok goal_id={id}");
        self.persist();
        self.changed(GoalEvent::Completed(id.clone()));
        true
    }

    /// Reopens the goal, clearing its completion timestamp.
    pub fn mark_incomplete(&mut self, id: &GoalId) -> bool {
        let Some(index) = self.position(id) else {
            return self.miss("goal_reopen", id);
        };

        self.goals[index].reopen();
        info!("event=goal_reopen module=store status=ok goal_id={id}");
        self.persist();
        self.changed(GoalEvent::Reopened(id.clone()));
        true
    }

    /// Flips completion. Supplied `notes` replace existing notes either way.
    pub fn toggle_complete(&mut self, id: &GoalId, notes: Option<String>) -> bool {
        let Some(index) = self.position(id) else {
            return self.miss("goal_toggle", id);
        };

        let goal = &mut self.goals[index];
        let event = if goal.completed {
            if let Some(notes) = notes {
                goal.notes = notes;
            }
            goal.reopen();
            GoalEvent::Reopened(id.clone())
        } else {
            goal.complete(notes, now_millis());
            GoalEvent::Completed(id.clone())
        };
        info!(
            "event=goal_toggle module=store status=ok goal_id={} completed={}",
            id, goal.completed
        );
        self.persist();
        self.changed(event);
        true
    }

    /// Registers a change listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&GoalEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.insert(id, Box::new(listener));
        id
    }

    /// Removes a listener. Returns `false` when it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Counter bumped on every applied change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the most recent durable write failed or was withheld.
    pub fn last_save_failed(&self) -> bool {
        self.last_save_failed
    }

    /// Whether the most recent read of the blob failed.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Full collection in insertion order.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn goal_by_id(&self, id: &GoalId) -> Option<&Goal> {
        self.goals.iter().find(|goal| &goal.id == id)
    }

    pub fn goals_by_category(&self, category: Category) -> Vec<&Goal> {
        self.filtered(|goal| goal.category == category)
    }

    /// Goals whose target date falls in local calendar `year`.
    pub fn goals_by_year(&self, year: i32) -> Vec<&Goal> {
        self.filtered(|goal| local_year(goal.timeline_date) == year)
    }

    pub fn completed_goals(&self) -> Vec<&Goal> {
        self.filtered(|goal| goal.completed)
    }

    pub fn active_goals(&self) -> Vec<&Goal> {
        self.filtered(|goal| !goal.completed)
    }

    pub fn goals_with_location(&self) -> Vec<&Goal> {
        self.filtered(Goal::has_location)
    }

    pub fn list_goals(&self, query: &GoalQuery) -> Vec<&Goal> {
        self.filtered(|goal| query.matches(goal))
    }

    pub fn total_count(&self) -> usize {
        self.goals.len()
    }

    pub fn completed_count(&self) -> usize {
        self.goals.iter().filter(|goal| goal.completed).count()
    }

    /// Distinct categories present in the collection.
    pub fn categories(&self) -> BTreeSet<Category> {
        self.goals.iter().map(|goal| goal.category).collect()
    }

    fn filtered(&self, predicate: impl Fn(&Goal) -> bool) -> Vec<&Goal> {
        self.goals.iter().filter(|goal| predicate(goal)).collect()
    }

    fn position(&self, id: &GoalId) -> Option<usize> {
        self.goals.iter().position(|goal| &goal.id == id)
    }

    fn miss(&self, event: &str, id: &GoalId) -> bool {
        debug!("event={event} module=store status=not_found goal_id={id}");
        false
    }

    fn persist(&mut self) {
        if self.load_failed {
            self.last_save_failed = true;
            warn!(
                "event=goals_persist module=store status=skipped reason=load_failed count={}",
                self.goals.len()
            );
            return;
        }
        let started_at = Instant::now();
        let result = encode_blob(&self.goals)
            .map_err(|err| err.to_string())
            .and_then(|blob| {
                self.backend
                    .set(&self.config.storage_key, &blob)
                    .map_err(|err| err.to_string())
            });

        match result {
            Ok(()) => {
                self.last_save_failed = false;
                debug!(
                    "event=goals_persist module=store status=ok count={} duration_ms={}",
                    self.goals.len(),
                    started_at.elapsed().as_millis()
                );
            }
            Err(err) => {
                self.last_save_failed = true;
                error!(
                    "event=goals_persist module=store status=error count={} duration_ms={} error={}",
                    self.goals.len(),
                    started_at.elapsed().as_millis(),
                    err
                );
            }
        }
    }

    fn changed(&mut self, event: GoalEvent) {
        self.revision += 1;
        for listener in self.listeners.values_mut() {
            listener(&event);
        }
    }
}

fn load_goals<B: BlobStore>(backend: &B, config: &StoreConfig) -> StorageResult<Vec<Goal>> {
    let key = config.storage_key.as_str();
    let goals = match backend.get(key) {
        Ok(Some(raw)) => match decode_blob(&raw) {
            Ok(goals) => {
                let goals = dedupe_ids(goals);
                info!(
                    "event=goals_load module=store status=ok key={} count={}",
                    key,
                    goals.len()
                );
                goals
            }
            Err(err) => {
                warn!(
                    "event=goals_load module=store status=discarded key={} error={}",
                    key, err
                );
                seed_goals(config.seed)
            }
        },
        Ok(None) => {
            info!("event=goals_load module=store status=empty key={key}");
            seed_goals(config.seed)
        }
        Err(err) => {
            error!(
                "event=goals_load module=store status=error key={} error={}",
                key, err
            );
            return Err(err);
        }
    };
    Ok(goals)
}

fn seed_goals(seed: SeedPolicy) -> Vec<Goal> {
    match seed {
        SeedPolicy::Empty => Vec::new(),
        SeedPolicy::Sample => sample_goals(now_millis()),
    }
}

fn dedupe_ids(goals: Vec<Goal>) -> Vec<Goal> {
    let mut seen = HashSet::new();
    let before = goals.len();
    let unique: Vec<Goal> = goals
        .into_iter()
        .filter(|goal| seen.insert(goal.id.clone()))
        .collect();
    if unique.len() != before {
        warn!(
            "event=goals_load module=store status=deduplicated dropped={}",
            before - unique.len()
        );
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::GoalStore;
    use crate::model::category::Category;
    use crate::model::goal::{GoalDraft, GoalId};
    use crate::model::time::now_millis;
    use crate::storage::{BlobStore, MemoryBlobStore};
    use crate::store::config::StoreConfig;
    use crate::store::events::GoalEvent;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn misses_do_not_bump_revision_or_notify() {
        let mut store = GoalStore::in_memory();
        let seen = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&seen);
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        let missing = GoalId::parse("missing").unwrap();
        assert!(!store.delete_goal(&missing));
        assert!(!store.mark_complete(&missing, None));
        assert_eq!(store.revision(), 0);
        assert_eq!(*seen.borrow(), 0);
        assert!(store.backend().is_empty());
    }

    #[test]
    fn toggle_flips_completion_and_overwrites_notes() {
        let mut store = GoalStore::in_memory();
        let id = store.add_goal(GoalDraft::new("Learn Italian", Category::Learning, now_millis()));
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        store.subscribe(move |event: &GoalEvent| sink.borrow_mut().push(event.clone()));

        assert!(store.toggle_complete(&id, Some("ciao".to_string())));
        let goal = store.goal_by_id(&id).unwrap();
        assert!(goal.completed);
        assert_eq!(goal.notes, "ciao");

        assert!(store.toggle_complete(&id, Some("again".to_string())));
        let goal = store.goal_by_id(&id).unwrap();
        assert!(!goal.completed);
        assert_eq!(goal.completed_at, None);
        assert_eq!(goal.notes, "again");

        assert_eq!(
            *events.borrow(),
            vec![GoalEvent::Completed(id.clone()), GoalEvent::Reopened(id.clone())]
        );
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn duplicate_ids_in_blob_keep_first_record() {
        let blob = r#"{"goals":[
            {"id":"1","title":"first","description":"","image":null,"category":"travel",
             "createdAt":"2024-01-01T00:00:00.000Z","timelineDate":"2024-06-01T00:00:00.000Z",
             "completed":false,"completedAt":null,"notes":"","location":null},
            {"id":"1","title":"second","description":"","image":null,"category":"travel",
             "createdAt":"2024-01-01T00:00:00.000Z","timelineDate":"2024-06-01T00:00:00.000Z",
             "completed":false,"completedAt":null,"notes":"","location":null}
        ]}"#;
        let backend = MemoryBlobStore::with_entry("atlas-goals-storage", blob);
        let store = GoalStore::open(backend, StoreConfig::default());
        assert_eq!(store.total_count(), 1);
        assert_eq!(store.goals()[0].title, "first");
    }

    #[test]
    fn writes_land_under_configured_key() {
        let config = StoreConfig::default().with_storage_key("custom-key");
        let mut store = GoalStore::open(MemoryBlobStore::new(), config);
        store.add_goal(GoalDraft::new("Plant a tree", Category::Nature, now_millis()));
        assert!(store.backend().get("custom-key").unwrap().is_some());
        assert!(store.backend().get("atlas-goals-storage").unwrap().is_none());
    }
}
