use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{DisplayStatus, Subject, TimeSlot};

/// Response for the matchmake endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchmakeResponse {
    pub success: bool,
    #[serde(rename = "matchesCreated")]
    pub matches_created: usize,
}

/// Response for availability submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAvailabilityResponse {
    pub success: bool,
    #[serde(rename = "availabilityId")]
    pub availability_id: Uuid,
    #[serde(rename = "slotsAdded")]
    pub slots_added: usize,
    #[serde(rename = "slotsRemoved")]
    pub slots_removed: usize,
}

/// One interview as presented to clients, with its slot joined in and
/// the status derived from the clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewView {
    pub id: Uuid,
    #[serde(rename = "roundId")]
    pub round_id: Uuid,
    pub subject: Subject,
    #[serde(rename = "interviewerId")]
    pub interviewer_id: Option<Uuid>,
    #[serde(rename = "intervieweeId")]
    pub interviewee_id: Option<Uuid>,
    #[serde(rename = "timeSlot")]
    pub time_slot: TimeSlot,
    #[serde(rename = "recordingAllowed")]
    pub recording_allowed: bool,
    #[serde(rename = "meetingLink")]
    pub meeting_link: Option<String>,
    #[serde(rename = "recordingLink")]
    pub recording_link: Option<String>,
    pub status: DisplayStatus,
}

/// Response for interview listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListInterviewsResponse {
    pub interviews: Vec<InterviewView>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
