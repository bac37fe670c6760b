use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Role, Subject};

/// Request to run matchmaking for a round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchmakeRequest {
    #[serde(alias = "round_id", rename = "roundId")]
    pub round_id: Uuid,
}

/// Request to submit (upsert) availability for one role in a round
///
/// The slot list is authoritative: links are reconciled against it,
/// not appended.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAvailabilityRequest {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: Uuid,
    #[serde(alias = "round_id", rename = "roundId")]
    pub round_id: Uuid,
    pub role: Role,
    #[validate(length(min = 1, message = "at least one subject is required"))]
    pub subjects: Vec<Subject>,
    #[serde(alias = "recording_consent", rename = "recordingConsent", default)]
    pub recording_consent: bool,
    #[serde(alias = "time_slot_ids", rename = "timeSlotIds", default)]
    pub time_slot_ids: Vec<Uuid>,
}

/// Request to update the meeting link of an interview
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateLinkRequest {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "link must not be empty"))]
    pub link: String,
}

/// Request to join an open interview on its unfilled side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinInterviewRequest {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: Uuid,
}

/// Request to create an open, single-sided interview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOpenInterviewRequest {
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: Uuid,
    #[serde(alias = "round_id", rename = "roundId")]
    pub round_id: Uuid,
    pub role: Role,
    pub subject: Subject,
    #[serde(alias = "time_slot_id", rename = "timeSlotId")]
    pub time_slot_id: Uuid,
}

/// Query parameters for listing a round's interviews
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListInterviewsQuery {
    #[serde(alias = "round_id", rename = "roundId")]
    pub round_id: Uuid,
    #[serde(alias = "user_id", rename = "userId", default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub scope: ListScope,
}

/// Which interviews to list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListScope {
    #[default]
    All,
    My,
    Open,
}
