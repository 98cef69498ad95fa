//! Year grouping for timeline and archive screens.

use crate::model::goal::Goal;
use chrono::{Datelike, Local, TimeZone};
use std::collections::BTreeMap;

/// Goals sharing one calendar year, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGroup<'a> {
    pub year: i32,
    pub goals: Vec<&'a Goal>,
}

/// Groups goals by the local calendar year of their anchor date.
///
/// The anchor is `completed_at` for completed goals and `timeline_date`
/// otherwise. Groups are ordered by year descending; entries inside a group
/// by anchor date descending, ties keeping collection order.
pub fn group_by_year<'a>(goals: impl IntoIterator<Item = &'a Goal>) -> Vec<YearGroup<'a>> {
    group_by_year_in(goals, &Local)
}

/// Same as [`group_by_year`] with an explicit time zone for year extraction.
pub fn group_by_year_in<'a, Tz: TimeZone>(
    goals: impl IntoIterator<Item = &'a Goal>,
    tz: &Tz,
) -> Vec<YearGroup<'a>> {
    let mut by_year: BTreeMap<i32, Vec<&'a Goal>> = BTreeMap::new();
    for goal in goals {
        let year = goal.anchor_date().with_timezone(tz).year();
        by_year.entry(year).or_default().push(goal);
    }

    by_year
        .into_iter()
        .rev()
        .map(|(year, mut goals)| {
            goals.sort_by(|a, b| b.anchor_date().cmp(&a.anchor_date()));
            YearGroup { year, goals }
        })
        .collect()
}
