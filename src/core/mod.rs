// Core algorithm exports
pub mod eligibility;
pub mod engine;
pub mod ranking;
pub mod status;

pub use eligibility::{common_slots, shared_subject};
pub use engine::{BookingLedger, MatchOutcome, Matchmaker, DEFAULT_MEETING_LINK};
pub use ranking::{order_interviewees, rank_candidates, Candidate};
pub use status::derive_status;
