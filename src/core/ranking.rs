use uuid::Uuid;

use crate::core::engine::BookingLedger;
use crate::models::{Availability, Subject};

/// One eligible (interviewer, slot) option for an interviewee
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub interviewer: &'a Availability,
    pub time_slot_id: Uuid,
    pub subject: Subject,
}

/// Order interviewees for processing: unmatched first, then earliest
/// submission
///
/// The sort is stable, so interviewees sharing a timestamp keep their
/// input order; callers must not rely on sub-timestamp ordering.
pub fn order_interviewees(interviewees: &mut [&Availability], ledger: &BookingLedger) {
    interviewees.sort_by(|a, b| {
        let a_matched = ledger.interviewee_is_matched(a.user_id);
        let b_matched = ledger.interviewee_is_matched(b.user_id);
        a_matched
            .cmp(&b_matched)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Rank candidates for one interviewee: fewest interviews already assigned
/// as interviewer first (load balancing), then earliest interviewer
/// submission (first-come-first-served)
pub fn rank_candidates(candidates: &mut [Candidate<'_>], ledger: &BookingLedger) {
    candidates.sort_by(|a, b| {
        ledger
            .interviewer_load(a.interviewer.user_id)
            .cmp(&ledger.interviewer_load(b.interviewer.user_id))
            .then_with(|| a.interviewer.created_at.cmp(&b.interviewer.created_at))
    });
}
