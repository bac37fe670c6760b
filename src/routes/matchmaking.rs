use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};

use crate::core::Matchmaker;
use crate::models::{ErrorResponse, HealthResponse, MatchmakeRequest, MatchmakeResponse};
use crate::routes::store_error_response;
use crate::services::{PostgresStore, RoundLocks};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostgresStore>,
    pub locks: Arc<RoundLocks>,
    pub matchmaker: Matchmaker,
    pub max_interviewee_slots: usize,
    pub max_interviewer_slots: usize,
}

/// Configure matchmaking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matchmake", web::post().to(matchmake));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let db_healthy = state.store.health_check().await.unwrap_or(false);

    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Run matchmaking for a round
///
/// POST /api/v1/matchmake
///
/// Request body:
/// ```json
/// { "roundId": "uuid" }
/// ```
///
/// Safe to call speculatively after any availability change: the engine
/// recomputes from persisted state and only appends newly eligible
/// pairings. Invocations for the same round are serialized by a per-round
/// lock; the batch insert is atomic.
async fn matchmake(
    state: web::Data<AppState>,
    req: web::Json<MatchmakeRequest>,
) -> impl Responder {
    let round_id = req.round_id;

    match state.store.round_exists(round_id).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "unknown_round".to_string(),
                message: format!("round {round_id} does not exist"),
                status_code: 404,
            });
        }
        Err(e) => {
            tracing::error!("Failed to look up round {}: {}", round_id, e);
            return store_error_response(&e);
        }
    }

    // Serialize invocations per round across the read-compute-insert pass
    let _guard = state.locks.acquire(round_id).await;

    let availabilities = match state.store.fetch_availabilities(round_id).await {
        Ok(list) => list,
        Err(e) => {
            tracing::error!("Failed to fetch availabilities for {}: {}", round_id, e);
            return store_error_response(&e);
        }
    };

    let existing = match state.store.fetch_interviews(round_id).await {
        Ok(list) => list,
        Err(e) => {
            tracing::error!("Failed to fetch interviews for {}: {}", round_id, e);
            return store_error_response(&e);
        }
    };

    let outcome = state
        .matchmaker
        .run(round_id, &availabilities, &existing);

    for skipped in &outcome.skipped {
        tracing::info!(
            "Round {}: interviewee {} left unmatched ({:?})",
            round_id,
            skipped.user_id,
            skipped.reason
        );
    }

    if let Err(e) = state.store.insert_interviews(&outcome.interviews).await {
        tracing::error!("Failed to insert interview batch for {}: {}", round_id, e);
        return store_error_response(&e);
    }

    tracing::info!(
        "Round {}: created {} interviews ({} of {} interviewees unmatched)",
        round_id,
        outcome.interviews.len(),
        outcome.skipped.len(),
        outcome.total_interviewees
    );

    HttpResponse::Ok().json(MatchmakeResponse {
        success: true,
        matches_created: outcome.interviews.len(),
    })
}
