use std::collections::{HashMap, HashSet};
use std::time::Duration;

use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    Availability, Interview, InterviewStatus, NewInterview, Role, Subject, TimeSlot,
};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .as_deref()
        == Some("23505")
}

/// Outcome of reconciling an availability's slot links
#[derive(Debug, Clone, Copy)]
pub struct SlotReconciliation {
    pub added: usize,
    pub removed: usize,
}

/// PostgreSQL store for rounds, availabilities and interviews
///
/// All persistence for the matchmaking service lives here. The interviews
/// table carries the uniqueness constraints that reject racing duplicate
/// pairings at the store level (see migrations).
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new store from a connection string
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new store from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    /// Whether the round exists
    pub async fn round_exists(&self, round_id: Uuid) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM rounds WHERE id = $1")
            .bind(round_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Fetch all availabilities for a round, each joined with its selected
    /// time-slot ids
    pub async fn fetch_availabilities(
        &self,
        round_id: Uuid,
    ) -> Result<Vec<Availability>, StoreError> {
        let query = r#"
            SELECT id, user_id, round_id, role, subjects, recording_consent, created_at
            FROM availabilities
            WHERE round_id = $1
            ORDER BY created_at
        "#;

        let rows = sqlx::query(query)
            .bind(round_id)
            .fetch_all(&self.pool)
            .await?;

        let mut availabilities: Vec<Availability> = rows
            .iter()
            .map(|row| Availability {
                id: row.get("id"),
                user_id: row.get("user_id"),
                round_id: row.get("round_id"),
                role: row.get("role"),
                subjects: row.get("subjects"),
                recording_consent: row.get("recording_consent"),
                created_at: row.get("created_at"),
                slot_ids: Vec::new(),
            })
            .collect();

        if availabilities.is_empty() {
            return Ok(availabilities);
        }

        let ids: Vec<Uuid> = availabilities.iter().map(|a| a.id).collect();
        let slot_rows = sqlx::query(
            r#"
            SELECT availability_id, time_slot_id
            FROM availability_slots
            WHERE availability_id = ANY($1)
            ORDER BY time_slot_id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut slots_by_availability: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in &slot_rows {
            slots_by_availability
                .entry(row.get("availability_id"))
                .or_default()
                .push(row.get("time_slot_id"));
        }

        for availability in &mut availabilities {
            if let Some(slot_ids) = slots_by_availability.remove(&availability.id) {
                availability.slot_ids = slot_ids;
            }
        }

        tracing::debug!(
            "Fetched {} availabilities for round {}",
            availabilities.len(),
            round_id
        );

        Ok(availabilities)
    }

    /// Fetch all time slots scheduled for a round
    pub async fn fetch_time_slots(&self, round_id: Uuid) -> Result<Vec<TimeSlot>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, round_id, date, start_time, end_time
            FROM time_slots
            WHERE round_id = $1
            ORDER BY date, start_time
            "#,
        )
        .bind(round_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| TimeSlot {
                id: row.get("id"),
                round_id: row.get("round_id"),
                date: row.get("date"),
                start_time: row.get("start_time"),
                end_time: row.get("end_time"),
            })
            .collect())
    }

    /// Fetch all interviews for a round, open and fully paired alike
    pub async fn fetch_interviews(&self, round_id: Uuid) -> Result<Vec<Interview>, StoreError> {
        let query = r#"
            SELECT id, round_id, subject, interviewer_id, interviewee_id,
                   time_slot_id, recording_allowed, meeting_link, recording_link, status
            FROM interviews
            WHERE round_id = $1
        "#;

        let rows = sqlx::query(query)
            .bind(round_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(interview_from_row).collect())
    }

    /// Insert the batch of interviews computed by the engine
    ///
    /// The batch commits atomically: a failure (including a uniqueness
    /// violation from a racing invocation) rolls back every row.
    pub async fn insert_interviews(&self, batch: &[NewInterview]) -> Result<u64, StoreError> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        for interview in batch {
            let result = sqlx::query(
                r#"
                INSERT INTO interviews
                    (round_id, subject, interviewer_id, interviewee_id,
                     time_slot_id, recording_allowed, meeting_link, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(interview.round_id)
            .bind(interview.subject)
            .bind(interview.interviewer_id)
            .bind(interview.interviewee_id)
            .bind(interview.time_slot_id)
            .bind(interview.recording_allowed)
            .bind(&interview.meeting_link)
            .bind(interview.status)
            .execute(&mut *tx)
            .await;

            if let Err(e) = result {
                if is_unique_violation(&e) {
                    return Err(StoreError::Conflict(
                        "a conflicting pairing was created concurrently".to_string(),
                    ));
                }
                return Err(e.into());
            }
        }

        tx.commit().await?;

        tracing::debug!("Inserted {} interviews", batch.len());

        Ok(batch.len() as u64)
    }

    /// Upsert the (user, round, role) availability record
    ///
    /// Returns the availability id. `created_at` is set on first insert
    /// only, so the fairness tie-break keys off the original submission.
    pub async fn upsert_availability(
        &self,
        user_id: Uuid,
        round_id: Uuid,
        role: Role,
        subjects: &[Subject],
        recording_consent: bool,
    ) -> Result<Uuid, StoreError> {
        let query = r#"
            INSERT INTO availabilities (user_id, round_id, role, subjects, recording_consent)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, round_id, role)
            DO UPDATE SET
                subjects = EXCLUDED.subjects,
                recording_consent = EXCLUDED.recording_consent
            RETURNING id
        "#;

        let row = sqlx::query(query)
            .bind(user_id)
            .bind(round_id)
            .bind(role)
            .bind(subjects)
            .bind(recording_consent)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get("id"))
    }

    /// Reconcile an availability's slot links against the desired set
    ///
    /// Missing links are added, stale links removed. Removing a slot also
    /// destroys the user's open single-sided interviews for that slot in
    /// the submitted role, since the offer they represented is withdrawn.
    pub async fn reconcile_slots(
        &self,
        availability_id: Uuid,
        user_id: Uuid,
        round_id: Uuid,
        role: Role,
        desired: &[Uuid],
    ) -> Result<SlotReconciliation, StoreError> {
        let mut tx = self.pool.begin().await?;

        let existing_rows = sqlx::query(
            "SELECT time_slot_id FROM availability_slots WHERE availability_id = $1",
        )
        .bind(availability_id)
        .fetch_all(&mut *tx)
        .await?;

        let existing: HashSet<Uuid> = existing_rows
            .iter()
            .map(|row| row.get("time_slot_id"))
            .collect();
        let wanted: HashSet<Uuid> = desired.iter().copied().collect();

        let to_add: Vec<Uuid> = desired
            .iter()
            .copied()
            .filter(|id| !existing.contains(id))
            .collect();
        let to_remove: Vec<Uuid> = existing
            .iter()
            .copied()
            .filter(|id| !wanted.contains(id))
            .collect();

        if !to_remove.is_empty() {
            sqlx::query(
                r#"
                DELETE FROM availability_slots
                WHERE availability_id = $1 AND time_slot_id = ANY($2)
                "#,
            )
            .bind(availability_id)
            .bind(&to_remove)
            .execute(&mut *tx)
            .await?;

            // Withdraw open offers for the dropped slots
            let delete_open = match role {
                Role::Interviewer => {
                    r#"
                    DELETE FROM interviews
                    WHERE round_id = $1 AND interviewer_id = $2
                      AND interviewee_id IS NULL AND time_slot_id = ANY($3)
                    "#
                }
                Role::Interviewee => {
                    r#"
                    DELETE FROM interviews
                    WHERE round_id = $1 AND interviewee_id = $2
                      AND interviewer_id IS NULL AND time_slot_id = ANY($3)
                    "#
                }
            };
            sqlx::query(delete_open)
                .bind(round_id)
                .bind(user_id)
                .bind(&to_remove)
                .execute(&mut *tx)
                .await?;
        }

        for slot_id in &to_add {
            sqlx::query(
                r#"
                INSERT INTO availability_slots (availability_id, time_slot_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(availability_id)
            .bind(slot_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Reconciled slots for availability {}: +{} -{}",
            availability_id,
            to_add.len(),
            to_remove.len()
        );

        Ok(SlotReconciliation {
            added: to_add.len(),
            removed: to_remove.len(),
        })
    }

    /// Update an interview's meeting link, participants only
    pub async fn update_meeting_link(
        &self,
        interview_id: Uuid,
        user_id: Uuid,
        link: &str,
    ) -> Result<(), StoreError> {
        self.update_link(interview_id, user_id, "meeting_link", link)
            .await
    }

    /// Update an interview's recording link, participants only
    pub async fn update_recording_link(
        &self,
        interview_id: Uuid,
        user_id: Uuid,
        link: &str,
    ) -> Result<(), StoreError> {
        self.update_link(interview_id, user_id, "recording_link", link)
            .await
    }

    async fn update_link(
        &self,
        interview_id: Uuid,
        user_id: Uuid,
        column: &str,
        link: &str,
    ) -> Result<(), StoreError> {
        let interview = self.fetch_interview(interview_id).await?;

        if !interview.is_participant(user_id) {
            return Err(StoreError::Forbidden(
                "only interview participants may edit links".to_string(),
            ));
        }

        let query = format!("UPDATE interviews SET {column} = $1 WHERE id = $2");
        sqlx::query(&query)
            .bind(link)
            .bind(interview_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create an open, single-sided interview offer
    pub async fn create_open_interview(
        &self,
        round_id: Uuid,
        user_id: Uuid,
        role: Role,
        subject: Subject,
        time_slot_id: Uuid,
    ) -> Result<Uuid, StoreError> {
        let (interviewer_id, interviewee_id) = match role {
            Role::Interviewer => (Some(user_id), None),
            Role::Interviewee => (None, Some(user_id)),
        };

        let result = sqlx::query(
            r#"
            INSERT INTO interviews
                (round_id, subject, interviewer_id, interviewee_id,
                 time_slot_id, recording_allowed, status)
            VALUES ($1, $2, $3, $4, $5, false, 'upcoming')
            RETURNING id
            "#,
        )
        .bind(round_id)
        .bind(subject)
        .bind(interviewer_id)
        .bind(interviewee_id)
        .bind(time_slot_id)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.get("id")),
            Err(e) if is_unique_violation(&e) => Err(StoreError::Conflict(
                "an interview for this slot already exists".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Join an open interview on its unfilled side
    pub async fn join_interview(
        &self,
        interview_id: Uuid,
        user_id: Uuid,
    ) -> Result<Interview, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT id, round_id, subject, interviewer_id, interviewee_id,
                   time_slot_id, recording_allowed, meeting_link, recording_link, status
            FROM interviews
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(interview_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("interview {interview_id}")))?;

        let interview = interview_from_row(&row);

        if interview.is_participant(user_id) {
            return Err(StoreError::InvalidInput(
                "cannot hold both sides of the same interview".to_string(),
            ));
        }

        let column = if interview.interviewer_id.is_none() {
            "interviewer_id"
        } else if interview.interviewee_id.is_none() {
            "interviewee_id"
        } else {
            return Err(StoreError::Conflict(
                "interview is already fully booked".to_string(),
            ));
        };

        let query = format!("UPDATE interviews SET {column} = $1 WHERE id = $2 AND {column} IS NULL");
        let result = sqlx::query(&query)
            .bind(user_id)
            .bind(interview_id)
            .execute(&mut *tx)
            .await;

        match result {
            Ok(r) if r.rows_affected() == 1 => {}
            Ok(_) => {
                return Err(StoreError::Conflict(
                    "interview was filled concurrently".to_string(),
                ));
            }
            Err(e) if is_unique_violation(&e) => {
                return Err(StoreError::Conflict(
                    "joining would double-book this slot".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;

        self.fetch_interview(interview_id).await
    }

    /// Fetch a single interview by id
    pub async fn fetch_interview(&self, interview_id: Uuid) -> Result<Interview, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, round_id, subject, interviewer_id, interviewee_id,
                   time_slot_id, recording_allowed, meeting_link, recording_link, status
            FROM interviews
            WHERE id = $1
            "#,
        )
        .bind(interview_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("interview {interview_id}")))?;

        Ok(interview_from_row(&row))
    }
}

fn interview_from_row(row: &PgRow) -> Interview {
    Interview {
        id: row.get("id"),
        round_id: row.get("round_id"),
        subject: row.get("subject"),
        interviewer_id: row.get("interviewer_id"),
        interviewee_id: row.get("interviewee_id"),
        time_slot_id: row.get("time_slot_id"),
        recording_allowed: row.get("recording_allowed"),
        meeting_link: row.get("meeting_link"),
        recording_link: row.get("recording_link"),
        status: row.get::<InterviewStatus, _>("status"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Forbidden("only interview participants may edit links".to_string());
        assert!(err.to_string().contains("Forbidden"));
    }
}
