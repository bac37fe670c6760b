use chrono::{DateTime, Utc};

use crate::models::{DisplayStatus, InterviewStatus, TimeSlot};

/// Derive the user-visible status of an interview from the clock
///
/// Stored state only knows Upcoming/Completed; `Live` is a pure function
/// of the current time relative to the slot window. A stored `Completed`
/// always wins, regardless of the clock.
pub fn derive_status(
    stored: InterviewStatus,
    slot: &TimeSlot,
    now: DateTime<Utc>,
) -> DisplayStatus {
    if stored == InterviewStatus::Completed {
        return DisplayStatus::Completed;
    }

    let (start, end) = slot.window();
    if now >= end {
        DisplayStatus::Completed
    } else if now >= start {
        DisplayStatus::Live
    } else {
        DisplayStatus::Upcoming
    }
}
