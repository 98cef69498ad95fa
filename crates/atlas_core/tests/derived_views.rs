use atlas_core::{
    goal_status, group_by_year_in, map_region, status_at, Category, Goal, GoalDraft, GoalId,
    GoalStatus, GoalStore, Location, MapRegion,
};
use chrono::{Duration, TimeZone, Utc};

fn goal_dated(id: &str, year: i32, month: u32, day: u32) -> Goal {
    let date = Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap();
    Goal::from_draft(
        GoalId::parse(id).unwrap(),
        date,
        GoalDraft::new(id, Category::Travel, date),
    )
}

#[test]
fn status_follows_target_date_and_completion() {
    let now = Utc::now();
    let future = Goal::from_draft(
        GoalId::parse("future").unwrap(),
        now,
        GoalDraft::new("future", Category::Travel, now + Duration::days(1)),
    );
    let past = Goal::from_draft(
        GoalId::parse("past").unwrap(),
        now,
        GoalDraft::new("past", Category::Travel, now - Duration::days(1)),
    );
    let mut done = future.clone();
    done.complete(None, now);

    assert_eq!(goal_status(&future), GoalStatus::Wishlist);
    assert_eq!(goal_status(&past), GoalStatus::Planned);
    assert_eq!(goal_status(&done), GoalStatus::Completed);

    let mut done_in_past = past.clone();
    done_in_past.complete(None, now);
    assert_eq!(status_at(&done_in_past, now), GoalStatus::Completed);
}

#[test]
fn status_serializes_lowercase() {
    assert_eq!(
        serde_json::to_value(GoalStatus::Wishlist).unwrap(),
        "wishlist"
    );
    assert_eq!(GoalStatus::Planned.to_string(), "planned");
}

#[test]
fn grouping_orders_years_and_entries_descending() {
    let goals = vec![
        goal_dated("2022-03-01", 2022, 3, 1),
        goal_dated("2023-07-15", 2023, 7, 15),
        goal_dated("2023-01-10", 2023, 1, 10),
    ];

    let groups = group_by_year_in(&goals, &Utc);
    let years: Vec<i32> = groups.iter().map(|group| group.year).collect();
    assert_eq!(years, vec![2023, 2022]);

    let in_2023: Vec<&str> = groups[0].goals.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(in_2023, vec!["2023-07-15", "2023-01-10"]);
}

#[test]
fn grouping_uses_completion_date_for_completed_goals() {
    let mut finished = goal_dated("planned-2021", 2021, 5, 1);
    finished.complete(None, Utc.with_ymd_and_hms(2024, 8, 20, 12, 0, 0).unwrap());
    let open = goal_dated("open-2024", 2024, 2, 1);
    let goals = vec![open, finished];

    let groups = group_by_year_in(&goals, &Utc);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].year, 2024);
    let ids: Vec<&str> = groups[0].goals.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, vec!["planned-2021", "open-2024"]);
}

#[test]
fn archive_groups_completed_goals_from_store() {
    let mut store = GoalStore::in_memory();
    let a = store.add_goal(GoalDraft::new("a", Category::Culture, Utc::now()));
    store.add_goal(GoalDraft::new("b", Category::Culture, Utc::now()));
    store.mark_complete(&a, None);

    let groups = group_by_year_in(store.completed_goals(), &Utc);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].goals.len(), 1);
    assert_eq!(groups[0].goals[0].id, a);
}

#[test]
fn map_region_uses_located_goals_only() {
    let mut store = GoalStore::in_memory();
    store.add_goal(GoalDraft::new("indoor", Category::Learning, Utc::now()));
    assert_eq!(map_region(store.goals_with_location()), MapRegion::WORLD);

    let mut draft = GoalDraft::new("Machu Picchu", Category::Adventure, Utc::now());
    draft.location = Some(Location::new(-13.1631, -72.545, "Cusco", "Peru"));
    store.add_goal(draft);

    let region = map_region(store.goals_with_location());
    assert_eq!(region.latitude, -13.1631);
    assert_eq!(region.longitude, -72.545);
    assert_eq!(region.longitude_delta, 10.0);
}
