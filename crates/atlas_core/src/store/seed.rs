//! Built-in sample goals shown before the user adds their own.

use crate::model::category::Category;
use crate::model::goal::{Goal, GoalDraft, GoalId, Location};
use chrono::{DateTime, Duration, Utc};

/// Three sample goals dated relative to `now`: two upcoming, one done.
pub fn sample_goals(now: DateTime<Utc>) -> Vec<Goal> {
    let mut japan = GoalDraft::new("Trip to Japan", Category::Travel, now + Duration::days(61));
    japan.description = "Explore the neon streets of Tokyo and the temples of Kyoto.".to_string();
    japan.location = Some(Location::new(35.6762, 139.6503, "Tokyo", "Japan"));

    let mut diving = GoalDraft::new("Scuba Diving", Category::Adventure, now + Duration::days(122));
    diving.description = "Get PADI certified and dive in the Great Barrier Reef.".to_string();
    diving.location = Some(Location::new(-18.2871, 147.6992, "Queensland", "Australia"));

    let visited = now - Duration::days(61);
    let mut paris = GoalDraft::new("Paris Nights", Category::Travel, visited);
    paris.description = "Drink wine under the Eiffel Tower.".to_string();
    paris.completed = true;
    paris.completed_at = Some(visited);
    paris.notes = "It was magical.".to_string();
    paris.location = Some(Location::new(48.8566, 2.3522, "Paris", "France"));

    [("1", japan), ("2", diving), ("3", paris)]
        .into_iter()
        .filter_map(|(id, draft)| {
            GoalId::parse(id)
                .ok()
                .map(|id| Goal::from_draft(id, now, draft))
        })
        .collect()
}
