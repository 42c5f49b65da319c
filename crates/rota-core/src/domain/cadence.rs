//! Calendar gates for the daily rotation pass.

use chrono::{Datelike, NaiveDate, Weekday};

/// Saturday or Sunday: no standup, no rotation.
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether `today` falls on a fortnightly sprint boundary counted from
/// `anchor` (the first day of some past sprint). Sprint-boundary days have
/// sprint planning instead of standup.
pub fn is_sprint_boundary(anchor: NaiveDate, today: NaiveDate) -> bool {
    let days = (today - anchor).num_days();
    days >= 0 && days % 14 == 0
}
