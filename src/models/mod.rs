// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Availability, DisplayStatus, Interview, InterviewStatus, NewInterview, Role, SkipReason,
    SkippedInterviewee, Subject, TimeSlot,
};
pub use requests::{
    CreateOpenInterviewRequest, JoinInterviewRequest, ListInterviewsQuery, ListScope,
    MatchmakeRequest, SubmitAvailabilityRequest, UpdateLinkRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, InterviewView, ListInterviewsResponse, MatchmakeResponse,
    SubmitAvailabilityResponse,
};
