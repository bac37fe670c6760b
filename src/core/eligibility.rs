use uuid::Uuid;

use crate::models::{Availability, Subject};

/// Find the subject a pairing would be held on, if any
///
/// Subject sets must intersect; the chosen subject is the first of the
/// interviewee's declared subjects that the interviewer also declared, so
/// the interview's subject always comes from the interviewee's declaration.
#[inline]
pub fn shared_subject(interviewer: &Availability, interviewee: &Availability) -> Option<Subject> {
    interviewee
        .subjects
        .iter()
        .copied()
        .find(|subject| interviewer.has_subject(*subject))
}

/// Slots both sides selected, in the interviewee's selection order
#[inline]
pub fn common_slots(interviewer: &Availability, interviewee: &Availability) -> Vec<Uuid> {
    interviewee
        .slot_ids
        .iter()
        .copied()
        .filter(|slot_id| interviewer.has_slot(*slot_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use chrono::Utc;

    fn availability(role: Role, subjects: Vec<Subject>, slot_ids: Vec<Uuid>) -> Availability {
        Availability {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            round_id: Uuid::new_v4(),
            role,
            subjects,
            recording_consent: true,
            created_at: Utc::now(),
            slot_ids,
        }
    }

    #[test]
    fn test_shared_subject_exact_match() {
        let er = availability(Role::Interviewer, vec![Subject::Metrics], vec![]);
        let ee = availability(Role::Interviewee, vec![Subject::Metrics], vec![]);

        assert_eq!(shared_subject(&er, &ee), Some(Subject::Metrics));
    }

    #[test]
    fn test_shared_subject_none() {
        let er = availability(Role::Interviewer, vec![Subject::Rca], vec![]);
        let ee = availability(Role::Interviewee, vec![Subject::Behavioral], vec![]);

        assert_eq!(shared_subject(&er, &ee), None);
    }

    #[test]
    fn test_shared_subject_prefers_interviewee_order() {
        let er = availability(
            Role::Interviewer,
            vec![Subject::Execution, Subject::Metrics],
            vec![],
        );
        let ee = availability(
            Role::Interviewee,
            vec![Subject::ProductSense, Subject::Metrics, Subject::Execution],
            vec![],
        );

        // Metrics comes first in the interviewee's declaration
        assert_eq!(shared_subject(&er, &ee), Some(Subject::Metrics));
    }

    #[test]
    fn test_common_slots_intersection() {
        let s1 = Uuid::new_v4();
        let s2 = Uuid::new_v4();
        let s3 = Uuid::new_v4();

        let er = availability(Role::Interviewer, vec![Subject::Metrics], vec![s1, s3]);
        let ee = availability(Role::Interviewee, vec![Subject::Metrics], vec![s2, s3, s1]);

        // Interviewee order is preserved
        assert_eq!(common_slots(&er, &ee), vec![s3, s1]);
    }

    #[test]
    fn test_common_slots_disjoint() {
        let er = availability(Role::Interviewer, vec![Subject::Metrics], vec![Uuid::new_v4()]);
        let ee = availability(Role::Interviewee, vec![Subject::Metrics], vec![Uuid::new_v4()]);

        assert!(common_slots(&er, &ee).is_empty());
    }
}
