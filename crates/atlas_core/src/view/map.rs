//! Initial map viewport derived from located goals.

use crate::model::goal::Goal;
use serde::{Deserialize, Serialize};

const FOCUSED_DELTA_DEGREES: f64 = 10.0;
const WORLD_CENTER_LATITUDE: f64 = 20.0;
const WORLD_CENTER_LONGITUDE: f64 = 0.0;
const WORLD_DELTA_DEGREES: f64 = 60.0;

/// Map viewport: center plus visible span in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapRegion {
    pub latitude: f64,
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    /// Zoomed-out default used when no goal has a location.
    pub const WORLD: MapRegion = MapRegion {
        latitude: WORLD_CENTER_LATITUDE,
        longitude: WORLD_CENTER_LONGITUDE,
        latitude_delta: WORLD_DELTA_DEGREES,
        longitude_delta: WORLD_DELTA_DEGREES,
    };
}

/// Centers on the first located goal, or returns [`MapRegion::WORLD`].
pub fn map_region<'a>(goals: impl IntoIterator<Item = &'a Goal>) -> MapRegion {
    goals
        .into_iter()
        .find_map(|goal| goal.location.as_ref())
        .map_or(MapRegion::WORLD, |location| MapRegion {
            latitude: location.latitude,
            longitude: location.longitude,
            latitude_delta: FOCUSED_DELTA_DEGREES,
            longitude_delta: FOCUSED_DELTA_DEGREES,
        })
}

#[cfg(test)]
mod tests {
    use super::{map_region, MapRegion};
    use crate::model::category::Category;
    use crate::model::goal::{Goal, GoalDraft, GoalId, Location};
    use chrono::{TimeZone, Utc};

    #[test]
    fn region_follows_first_located_goal() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let unlocated = Goal::from_draft(
            GoalId::parse("a").unwrap(),
            now,
            GoalDraft::new("Write a novel", Category::Creative, now),
        );
        let mut located_draft = GoalDraft::new("See Paris", Category::Travel, now);
        located_draft.location = Some(Location::new(48.8566, 2.3522, "Paris", "France"));
        let located = Goal::from_draft(GoalId::parse("b").unwrap(), now, located_draft);

        assert_eq!(map_region([&unlocated]), MapRegion::WORLD);

        let region = map_region([&unlocated, &located]);
        assert_eq!(region.latitude, 48.8566);
        assert_eq!(region.longitude, 2.3522);
        assert_eq!(region.latitude_delta, 10.0);
    }
}
