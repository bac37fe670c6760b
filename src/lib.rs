//! Mockmatch - matchmaking service for paired mock-interview scheduling
//!
//! Participants declare per-role availability (subjects, consent, time
//! slots) for a round; the matchmaking engine greedily pairs interviewees
//! with interviewers under subject, slot and booking constraints and
//! persists the resulting interviews. The engine is incremental and
//! idempotent: re-running it against unchanged state creates nothing.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{derive_status, MatchOutcome, Matchmaker};
pub use models::{
    Availability, DisplayStatus, Interview, InterviewStatus, MatchmakeRequest, MatchmakeResponse,
    NewInterview, Role, SkipReason, Subject, TimeSlot,
};

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_library_exports() {
        // An empty round produces an empty outcome
        let outcome = Matchmaker::with_default_link().run(Uuid::new_v4(), &[], &[]);
        assert!(outcome.interviews.is_empty());
        assert!(outcome.skipped.is_empty());
    }
}
