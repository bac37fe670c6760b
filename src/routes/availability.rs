use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    ErrorResponse, Role, SubmitAvailabilityRequest, SubmitAvailabilityResponse,
};
use crate::routes::{store_error_response, AppState};

/// Configure availability routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/availability", web::put().to(submit_availability));
}

/// Submit (upsert) availability for one role in a round
///
/// PUT /api/v1/availability
///
/// Request body:
/// ```json
/// {
///   "userId": "uuid",
///   "roundId": "uuid",
///   "role": "interviewee",
///   "subjects": ["Metrics"],
///   "recordingConsent": true,
///   "timeSlotIds": ["uuid"]
/// }
/// ```
///
/// The record is upserted per (user, round, role) and its slot links are
/// fully reconciled against the submitted set. Callers are expected to
/// trigger `/matchmake` afterwards.
async fn submit_availability(
    state: web::Data<AppState>,
    req: web::Json<SubmitAvailabilityRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for availability submission: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let limit = match req.role {
        Role::Interviewee => state.max_interviewee_slots,
        Role::Interviewer => state.max_interviewer_slots,
    };
    if req.time_slot_ids.len() > limit {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "too_many_slots".to_string(),
            message: format!(
                "at most {} slots may be selected as an {}",
                limit,
                req.role.as_str()
            ),
            status_code: 400,
        });
    }

    match state.store.round_exists(req.round_id).await {
        Ok(true) => {}
        Ok(false) => {
            return HttpResponse::NotFound().json(ErrorResponse {
                error: "unknown_round".to_string(),
                message: format!("round {} does not exist", req.round_id),
                status_code: 404,
            });
        }
        Err(e) => return store_error_response(&e),
    }

    let availability_id = match state
        .store
        .upsert_availability(
            req.user_id,
            req.round_id,
            req.role,
            &req.subjects,
            req.recording_consent,
        )
        .await
    {
        Ok(id) => id,
        Err(e) => {
            tracing::error!("Failed to upsert availability for {}: {}", req.user_id, e);
            return store_error_response(&e);
        }
    };

    let reconciliation = match state
        .store
        .reconcile_slots(
            availability_id,
            req.user_id,
            req.round_id,
            req.role,
            &req.time_slot_ids,
        )
        .await
    {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("Failed to reconcile slots for {}: {}", availability_id, e);
            return store_error_response(&e);
        }
    };

    tracing::info!(
        "Availability {} updated for user {} as {} (+{} -{} slots)",
        availability_id,
        req.user_id,
        req.role.as_str(),
        reconciliation.added,
        reconciliation.removed
    );

    HttpResponse::Ok().json(SubmitAvailabilityResponse {
        success: true,
        availability_id,
        slots_added: reconciliation.added,
        slots_removed: reconciliation.removed,
    })
}
