use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgTypeInfo;
use uuid::Uuid;

/// The role a participant declares availability for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "participant_role", rename_all = "lowercase")]
pub enum Role {
    Interviewer,
    Interviewee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Interviewer => "interviewer",
            Role::Interviewee => "interviewee",
        }
    }
}

/// Fixed set of interview subjects participants can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subject", rename_all = "snake_case", no_pg_array)]
pub enum Subject {
    #[serde(rename = "Product Sense")]
    ProductSense,
    #[serde(rename = "Metrics")]
    Metrics,
    #[serde(rename = "RCA")]
    Rca,
    #[serde(rename = "Execution")]
    Execution,
    #[serde(rename = "Behavioral")]
    Behavioral,
}

impl sqlx::postgres::PgHasArrayType for Subject {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_subject")
    }
}

/// A participant's declared willingness to be matched in one role for one round
///
/// At most one record exists per (user_id, round_id, role); edits upsert the
/// record and fully reconcile its slot links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "roundId")]
    pub round_id: Uuid,
    pub role: Role,
    pub subjects: Vec<Subject>,
    #[serde(rename = "recordingConsent")]
    pub recording_consent: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "timeSlotIds", default)]
    pub slot_ids: Vec<Uuid>,
}

impl Availability {
    /// Whether this participant selected the given slot
    pub fn has_slot(&self, slot_id: Uuid) -> bool {
        self.slot_ids.contains(&slot_id)
    }

    /// Whether this participant declared the given subject
    pub fn has_subject(&self, subject: Subject) -> bool {
        self.subjects.contains(&subject)
    }
}

/// A fixed, round-scoped time interval, owned by round administration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    #[serde(rename = "roundId")]
    pub round_id: Uuid,
    pub date: NaiveDate,
    #[serde(rename = "startTime")]
    pub start_time: NaiveTime,
    #[serde(rename = "endTime")]
    pub end_time: NaiveTime,
}

impl TimeSlot {
    /// The slot's absolute start/end instants (slot times are stored in UTC)
    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = NaiveDateTime::new(self.date, self.start_time).and_utc();
        let end = NaiveDateTime::new(self.date, self.end_time).and_utc();
        (start, end)
    }
}

/// Interview status as persisted
///
/// Only `Upcoming` and `Completed` are stored; `Live` exists purely as a
/// display derivation (see `crate::core::status`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interview_status", rename_all = "lowercase")]
pub enum InterviewStatus {
    Upcoming,
    Completed,
}

/// Interview status as shown to users, derived from the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayStatus {
    Upcoming,
    Live,
    Completed,
}

/// A scheduled (possibly single-sided) interview pairing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interview {
    pub id: Uuid,
    #[serde(rename = "roundId")]
    pub round_id: Uuid,
    pub subject: Subject,
    #[serde(rename = "interviewerId")]
    pub interviewer_id: Option<Uuid>,
    #[serde(rename = "intervieweeId")]
    pub interviewee_id: Option<Uuid>,
    #[serde(rename = "timeSlotId")]
    pub time_slot_id: Uuid,
    #[serde(rename = "recordingAllowed")]
    pub recording_allowed: bool,
    #[serde(rename = "meetingLink")]
    pub meeting_link: Option<String>,
    #[serde(rename = "recordingLink")]
    pub recording_link: Option<String>,
    pub status: InterviewStatus,
}

impl Interview {
    /// An interview is open while one side is still unfilled
    pub fn is_open(&self) -> bool {
        self.interviewer_id.is_none() || self.interviewee_id.is_none()
    }

    /// Whether the user holds either side of this interview
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.interviewer_id == Some(user_id) || self.interviewee_id == Some(user_id)
    }
}

/// A fully paired interview computed by the engine, pending insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInterview {
    pub round_id: Uuid,
    pub subject: Subject,
    pub interviewer_id: Uuid,
    pub interviewee_id: Uuid,
    pub time_slot_id: Uuid,
    pub recording_allowed: bool,
    pub meeting_link: String,
    pub status: InterviewStatus,
}

/// Why an interviewee left a matchmaking pass without a new pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No interviewer availability exists in the round at all
    NoInterviewers,
    /// Interviewers exist but none share a declared subject
    NoSubjectOverlap,
    /// Subject-compatible interviewers exist but no slot is shared
    NoCommonSlot,
    /// Shared slots exist but every candidate is booked for them,
    /// or the pair has already met
    AllCandidatesBooked,
}

/// Diagnostic for an interviewee the engine could not pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedInterviewee {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub reason: SkipReason,
}
