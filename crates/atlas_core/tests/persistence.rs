use atlas_core::db::open_db;
use atlas_core::{
    decode_blob, deserialize_goal, encode_blob, serialize_goal, Category, Goal, GoalDraft, GoalId,
    GoalStore, Location, PersistError, SqliteBlobStore, StoreConfig, DEFAULT_STORAGE_KEY,
};
use chrono::{TimeZone, Timelike, Utc};

fn detailed_goal() -> Goal {
    let created = Utc
        .with_ymd_and_hms(2024, 2, 29, 23, 59, 58)
        .unwrap()
        .with_nanosecond(987_000_000)
        .unwrap();
    let mut draft = GoalDraft::new(
        "Northern lights",
        Category::Nature,
        Utc.with_ymd_and_hms(2025, 1, 10, 20, 0, 0).unwrap(),
    );
    draft.description = "Tromsø in winter".to_string();
    draft.image = Some("file:///photos/aurora.jpg".to_string());
    draft.notes = "bring a tripod".to_string();
    let mut location = Location::new(69.6492, 18.9553, "Tromsø", "Norway");
    location.place_id = Some("ChIJ-tromso".to_string());
    draft.location = Some(location);
    Goal::from_draft(GoalId::parse("goal_1709251198987_abc123xyz").unwrap(), created, draft)
}

#[test]
fn serialize_then_deserialize_is_lossless() {
    let mut goal = detailed_goal();
    assert_eq!(deserialize_goal(serialize_goal(&goal)).unwrap(), goal);

    goal.complete(
        None,
        Utc.with_ymd_and_hms(2025, 1, 11, 1, 2, 3)
            .unwrap()
            .with_nanosecond(4_000_000)
            .unwrap(),
    );
    assert_eq!(deserialize_goal(serialize_goal(&goal)).unwrap(), goal);
}

#[test]
fn persisted_goal_uses_expected_wire_fields() {
    let goal = detailed_goal();
    let json = serde_json::to_value(serialize_goal(&goal)).unwrap();

    assert_eq!(json["id"], "goal_1709251198987_abc123xyz");
    assert_eq!(json["category"], "nature");
    assert_eq!(json["createdAt"], "2024-02-29T23:59:58.987Z");
    assert_eq!(json["timelineDate"], "2025-01-10T20:00:00.000Z");
    assert_eq!(json["completed"], false);
    assert!(json["completedAt"].is_null());
    assert_eq!(json["image"], "file:///photos/aurora.jpg");
    assert_eq!(json["location"]["city"], "Tromsø");
    assert_eq!(json["location"]["placeId"], "ChIJ-tromso");
}

#[test]
fn location_without_place_id_omits_the_field() {
    let mut goal = detailed_goal();
    if let Some(location) = goal.location.as_mut() {
        location.place_id = None;
    }
    let json = serde_json::to_value(serialize_goal(&goal)).unwrap();
    assert!(json["location"].get("placeId").is_none());
}

#[test]
fn blob_round_trips_through_goals_envelope() {
    let goals = vec![detailed_goal()];
    let blob = encode_blob(&goals).unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert!(value["goals"].is_array());
    assert_eq!(decode_blob(&blob).unwrap(), goals);
}

#[test]
fn decode_accepts_persist_middleware_envelope_and_legacy_values() {
    let raw = serde_json::json!({
        "state": {
            "goals": [{
                "id": "3",
                "title": "Paris Nights",
                "description": "Drink wine under the Eiffel Tower.",
                "image": null,
                "category": "Travel",
                "createdAt": "2024-03-01T10:00:00.000Z",
                "timelineDate": "2024-01-01",
                "completed": true,
                "completedAt": null,
                "notes": "It was magical.",
                "location": {
                    "latitude": 48.8566,
                    "longitude": 2.3522,
                    "city": "Paris",
                    "country": "France"
                }
            }]
        },
        "version": 0
    })
    .to_string();

    let goals = decode_blob(&raw).unwrap();
    assert_eq!(goals.len(), 1);
    let goal = &goals[0];
    assert_eq!(goal.category, Category::Travel);
    assert_eq!(
        goal.timeline_date,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(goal.completed_at, Some(goal.timeline_date));
    goal.validate().unwrap();
}

#[test]
fn decode_rejects_invalid_timestamps() {
    let raw = serde_json::json!({
        "goals": [{
            "id": "1",
            "title": "broken",
            "category": "food",
            "createdAt": "not a date",
            "timelineDate": "2024-01-01T00:00:00.000Z"
        }]
    })
    .to_string();

    let err = decode_blob(&raw).unwrap_err();
    assert!(matches!(
        err,
        PersistError::InvalidTimestamp {
            field: "createdAt",
            ..
        }
    ));
}

#[test]
fn sqlite_backed_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("atlas.db");

    let kept_id = {
        let conn = open_db(&path).unwrap();
        let backend = SqliteBlobStore::try_new(&conn).unwrap();
        let mut store = GoalStore::open(backend, StoreConfig::default());
        let kept = store.add_goal(GoalDraft::new("Keep", Category::Travel, Utc::now()));
        let dropped = store.add_goal(GoalDraft::new("Drop", Category::Travel, Utc::now()));
        store.mark_complete(&kept, Some("done".to_string()));
        store.delete_goal(&dropped);
        assert!(!store.last_save_failed());
        kept
    };

    let conn = open_db(&path).unwrap();
    let stored: String = conn
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1;",
            [DEFAULT_STORAGE_KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert!(stored.starts_with("{\"goals\":["));

    let backend = SqliteBlobStore::try_new(&conn).unwrap();
    let store = GoalStore::open(backend, StoreConfig::default());
    assert_eq!(store.total_count(), 1);
    let goal = store.goal_by_id(&kept_id).unwrap();
    assert!(goal.completed);
    assert_eq!(goal.notes, "done");
}
