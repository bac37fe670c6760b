use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::core::{
    eligibility::{common_slots, shared_subject},
    ranking::{order_interviewees, rank_candidates, Candidate},
};
use crate::models::{
    Availability, Interview, InterviewStatus, NewInterview, Role, SkipReason, SkippedInterviewee,
};

/// Result of one matchmaking pass
#[derive(Debug, Default)]
pub struct MatchOutcome {
    /// Fully paired interviews to persist, in creation order
    pub interviews: Vec<NewInterview>,
    /// One diagnostic per interviewee who wanted a match but got none
    pub skipped: Vec<SkippedInterviewee>,
    pub total_interviewees: usize,
}

/// In-memory view of the round's booking state
///
/// Seeded from existing interviews and updated after every pairing made
/// within a run, so later interviewees cannot double-book an interviewer
/// or slot claimed earlier in the same pass. Open single-sided rows count
/// too: an interviewee with any interview row is considered matched, and
/// an interviewer's open rows count toward their load.
#[derive(Debug, Default)]
pub struct BookingLedger {
    interviewer_slots: HashSet<(Uuid, Uuid)>,
    matched_interviewees: HashSet<Uuid>,
    pairs: HashSet<(Uuid, Uuid)>,
    interviewer_load: HashMap<Uuid, usize>,
}

impl BookingLedger {
    pub fn from_existing(existing: &[Interview]) -> Self {
        let mut ledger = Self::default();
        for interview in existing {
            if let Some(interviewer_id) = interview.interviewer_id {
                ledger
                    .interviewer_slots
                    .insert((interviewer_id, interview.time_slot_id));
                *ledger.interviewer_load.entry(interviewer_id).or_insert(0) += 1;
            }
            if let Some(interviewee_id) = interview.interviewee_id {
                ledger.matched_interviewees.insert(interviewee_id);
            }
            if let (Some(interviewer_id), Some(interviewee_id)) =
                (interview.interviewer_id, interview.interviewee_id)
            {
                ledger.pairs.insert((interviewer_id, interviewee_id));
            }
        }
        ledger
    }

    pub fn interviewee_is_matched(&self, user_id: Uuid) -> bool {
        self.matched_interviewees.contains(&user_id)
    }

    pub fn interviewer_booked(&self, user_id: Uuid, slot_id: Uuid) -> bool {
        self.interviewer_slots.contains(&(user_id, slot_id))
    }

    pub fn pair_exists(&self, interviewer_id: Uuid, interviewee_id: Uuid) -> bool {
        self.pairs.contains(&(interviewer_id, interviewee_id))
    }

    pub fn interviewer_load(&self, user_id: Uuid) -> usize {
        self.interviewer_load.get(&user_id).copied().unwrap_or(0)
    }

    /// Fold a pairing made this run into the ledger
    pub fn record(&mut self, interview: &NewInterview) {
        self.interviewer_slots
            .insert((interview.interviewer_id, interview.time_slot_id));
        self.matched_interviewees.insert(interview.interviewee_id);
        self.pairs
            .insert((interview.interviewer_id, interview.interviewee_id));
        *self
            .interviewer_load
            .entry(interview.interviewer_id)
            .or_insert(0) += 1;
    }
}

/// The matchmaking engine
///
/// A pure, stateless batch computation: given the round's availabilities
/// and its existing interviews, it produces the incremental set of new
/// pairings. It never mutates existing interviews, and re-running it
/// against unchanged state produces nothing.
#[derive(Debug, Clone)]
pub struct Matchmaker {
    placeholder_meeting_link: String,
}

pub const DEFAULT_MEETING_LINK: &str = "https://meet.google.com/placeholder";

impl Matchmaker {
    pub fn new(placeholder_meeting_link: impl Into<String>) -> Self {
        Self {
            placeholder_meeting_link: placeholder_meeting_link.into(),
        }
    }

    pub fn with_default_link() -> Self {
        Self::new(DEFAULT_MEETING_LINK)
    }

    /// Compute the incremental set of new pairings for a round
    ///
    /// Interviewees are processed unmatched-first, earliest submission
    /// first. For each, every eligible (interviewer, slot) candidate is
    /// collected, ranked by interviewer load then submission time, and
    /// only the single best candidate is taken. Each pairing is recorded
    /// into the ledger immediately so the rest of the pass sees it.
    pub fn run(
        &self,
        round_id: Uuid,
        availabilities: &[Availability],
        existing: &[Interview],
    ) -> MatchOutcome {
        let interviewers: Vec<&Availability> = availabilities
            .iter()
            .filter(|a| a.role == Role::Interviewer)
            .collect();
        let mut interviewees: Vec<&Availability> = availabilities
            .iter()
            .filter(|a| a.role == Role::Interviewee)
            .collect();

        let mut ledger = BookingLedger::from_existing(existing);
        order_interviewees(&mut interviewees, &ledger);

        let mut outcome = MatchOutcome {
            total_interviewees: interviewees.len(),
            ..MatchOutcome::default()
        };

        for interviewee in interviewees {
            // Already-matched interviewees pass through; a second match per
            // round is not granted today.
            if ledger.interviewee_is_matched(interviewee.user_id) {
                continue;
            }

            let mut saw_interviewer = false;
            let mut saw_subject = false;
            let mut saw_common_slot = false;
            let mut candidates: Vec<Candidate> = Vec::new();

            for interviewer in &interviewers {
                if interviewer.user_id == interviewee.user_id {
                    continue; // no self-pairing
                }
                saw_interviewer = true;

                let Some(subject) = shared_subject(interviewer, interviewee) else {
                    continue;
                };
                saw_subject = true;

                let slots = common_slots(interviewer, interviewee);
                if slots.is_empty() {
                    continue;
                }
                saw_common_slot = true;

                if ledger.pair_exists(interviewer.user_id, interviewee.user_id) {
                    continue;
                }

                for slot_id in slots {
                    if ledger.interviewer_booked(interviewer.user_id, slot_id) {
                        continue;
                    }
                    candidates.push(Candidate {
                        interviewer,
                        time_slot_id: slot_id,
                        subject,
                    });
                }
            }

            if candidates.is_empty() {
                let reason = if !saw_interviewer {
                    SkipReason::NoInterviewers
                } else if !saw_subject {
                    SkipReason::NoSubjectOverlap
                } else if !saw_common_slot {
                    SkipReason::NoCommonSlot
                } else {
                    SkipReason::AllCandidatesBooked
                };
                outcome.skipped.push(SkippedInterviewee {
                    user_id: interviewee.user_id,
                    reason,
                });
                continue;
            }

            rank_candidates(&mut candidates, &ledger);
            let best = &candidates[0];

            let interview = NewInterview {
                round_id,
                subject: best.subject,
                interviewer_id: best.interviewer.user_id,
                interviewee_id: interviewee.user_id,
                time_slot_id: best.time_slot_id,
                recording_allowed: interviewee.recording_consent
                    && best.interviewer.recording_consent,
                meeting_link: self.placeholder_meeting_link.clone(),
                status: InterviewStatus::Upcoming,
            };

            ledger.record(&interview);
            outcome.interviews.push(interview);
        }

        outcome
    }
}

impl Default for Matchmaker {
    fn default() -> Self {
        Self::with_default_link()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subject;
    use chrono::{Duration, Utc};

    fn availability(
        user_id: Uuid,
        round_id: Uuid,
        role: Role,
        subjects: Vec<Subject>,
        slot_ids: Vec<Uuid>,
        created_offset_secs: i64,
        consent: bool,
    ) -> Availability {
        Availability {
            id: Uuid::new_v4(),
            user_id,
            round_id,
            role,
            subjects,
            recording_consent: consent,
            created_at: Utc::now() + Duration::seconds(created_offset_secs),
            slot_ids,
        }
    }

    #[test]
    fn test_basic_pairing() {
        let round_id = Uuid::new_v4();
        let slot = Uuid::new_v4();
        let ee = Uuid::new_v4();
        let er = Uuid::new_v4();

        let pool = vec![
            availability(ee, round_id, Role::Interviewee, vec![Subject::Metrics], vec![slot], 0, true),
            availability(er, round_id, Role::Interviewer, vec![Subject::Metrics], vec![slot], 10, true),
        ];

        let outcome = Matchmaker::with_default_link().run(round_id, &pool, &[]);

        assert_eq!(outcome.interviews.len(), 1);
        let interview = &outcome.interviews[0];
        assert_eq!(interview.interviewer_id, er);
        assert_eq!(interview.interviewee_id, ee);
        assert_eq!(interview.time_slot_id, slot);
        assert_eq!(interview.subject, Subject::Metrics);
        assert!(interview.recording_allowed);
        assert_eq!(interview.status, InterviewStatus::Upcoming);
        assert_eq!(interview.meeting_link, DEFAULT_MEETING_LINK);
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_no_self_pairing() {
        let round_id = Uuid::new_v4();
        let slot = Uuid::new_v4();
        let user = Uuid::new_v4();

        let pool = vec![
            availability(user, round_id, Role::Interviewee, vec![Subject::Rca], vec![slot], 0, true),
            availability(user, round_id, Role::Interviewer, vec![Subject::Rca], vec![slot], 5, true),
        ];

        let outcome = Matchmaker::with_default_link().run(round_id, &pool, &[]);

        assert!(outcome.interviews.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].reason, SkipReason::NoInterviewers);
    }

    #[test]
    fn test_skip_reason_no_subject_overlap() {
        let round_id = Uuid::new_v4();
        let slot = Uuid::new_v4();

        let pool = vec![
            availability(Uuid::new_v4(), round_id, Role::Interviewee, vec![Subject::Behavioral], vec![slot], 0, true),
            availability(Uuid::new_v4(), round_id, Role::Interviewer, vec![Subject::Execution], vec![slot], 5, true),
        ];

        let outcome = Matchmaker::with_default_link().run(round_id, &pool, &[]);

        assert!(outcome.interviews.is_empty());
        assert_eq!(outcome.skipped[0].reason, SkipReason::NoSubjectOverlap);
    }

    #[test]
    fn test_skip_reason_no_common_slot() {
        let round_id = Uuid::new_v4();

        let pool = vec![
            availability(Uuid::new_v4(), round_id, Role::Interviewee, vec![Subject::Metrics], vec![Uuid::new_v4()], 0, true),
            availability(Uuid::new_v4(), round_id, Role::Interviewer, vec![Subject::Metrics], vec![Uuid::new_v4()], 5, true),
        ];

        let outcome = Matchmaker::with_default_link().run(round_id, &pool, &[]);

        assert!(outcome.interviews.is_empty());
        assert_eq!(outcome.skipped[0].reason, SkipReason::NoCommonSlot);
    }

    #[test]
    fn test_same_run_double_booking_prevented() {
        let round_id = Uuid::new_v4();
        let slot = Uuid::new_v4();
        let er = Uuid::new_v4();

        // Two interviewees, one interviewer, one slot: only one pairing fits.
        let pool = vec![
            availability(Uuid::new_v4(), round_id, Role::Interviewee, vec![Subject::Metrics], vec![slot], 0, true),
            availability(Uuid::new_v4(), round_id, Role::Interviewee, vec![Subject::Metrics], vec![slot], 10, true),
            availability(er, round_id, Role::Interviewer, vec![Subject::Metrics], vec![slot], 20, true),
        ];

        let outcome = Matchmaker::with_default_link().run(round_id, &pool, &[]);

        assert_eq!(outcome.interviews.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].reason, SkipReason::AllCandidatesBooked);
    }

    #[test]
    fn test_recording_requires_both_consents() {
        let round_id = Uuid::new_v4();
        let slot = Uuid::new_v4();

        let pool = vec![
            availability(Uuid::new_v4(), round_id, Role::Interviewee, vec![Subject::Metrics], vec![slot], 0, true),
            availability(Uuid::new_v4(), round_id, Role::Interviewer, vec![Subject::Metrics], vec![slot], 5, false),
        ];

        let outcome = Matchmaker::with_default_link().run(round_id, &pool, &[]);

        assert_eq!(outcome.interviews.len(), 1);
        assert!(!outcome.interviews[0].recording_allowed);
    }
}
