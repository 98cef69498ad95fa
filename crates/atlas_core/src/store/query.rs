//! Combined filter over the goal collection.

use crate::model::category::Category;
use crate::model::goal::Goal;
use crate::model::time::local_year;

/// Filter options for listing goals. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalQuery {
    pub category: Option<Category>,
    pub completed: Option<bool>,
    pub has_location: Option<bool>,
    /// Local calendar year of `timeline_date`.
    pub year: Option<i32>,
}

impl GoalQuery {
    pub fn matches(&self, goal: &Goal) -> bool {
        self.category.map_or(true, |category| goal.category == category)
            && self.completed.map_or(true, |completed| goal.completed == completed)
            && self
                .has_location
                .map_or(true, |has_location| goal.has_location() == has_location)
            && self
                .year
                .map_or(true, |year| local_year(goal.timeline_date) == year)
    }
}
