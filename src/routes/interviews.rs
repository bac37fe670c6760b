use std::collections::HashMap;

use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;
use validator::Validate;

use crate::core::derive_status;
use crate::models::{
    CreateOpenInterviewRequest, ErrorResponse, Interview, InterviewView, JoinInterviewRequest,
    ListInterviewsQuery, ListInterviewsResponse, ListScope, TimeSlot, UpdateLinkRequest,
};
use crate::routes::{store_error_response, AppState};

/// Configure interview routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/interviews", web::get().to(list_interviews))
        .route("/interviews/open", web::post().to(create_open_interview))
        .route("/interviews/{id}/join", web::post().to(join_interview))
        .route(
            "/interviews/{id}/meeting-link",
            web::patch().to(update_meeting_link),
        )
        .route(
            "/interviews/{id}/recording-link",
            web::patch().to(update_recording_link),
        );
}

/// List a round's interviews
///
/// GET /api/v1/interviews?roundId={uuid}&scope=my|open|all&userId={uuid}
///
/// Each interview is returned with its slot joined in and its status
/// derived from the clock, sorted by slot start.
async fn list_interviews(
    state: web::Data<AppState>,
    query: web::Query<ListInterviewsQuery>,
) -> impl Responder {
    if query.scope == ListScope::My && query.user_id.is_none() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "missing_user_id".to_string(),
            message: "userId is required when scope=my".to_string(),
            status_code: 400,
        });
    }

    let interviews = match state.store.fetch_interviews(query.round_id).await {
        Ok(list) => list,
        Err(e) => {
            tracing::error!("Failed to fetch interviews for {}: {}", query.round_id, e);
            return store_error_response(&e);
        }
    };

    let slots = match state.store.fetch_time_slots(query.round_id).await {
        Ok(list) => list,
        Err(e) => {
            tracing::error!("Failed to fetch time slots for {}: {}", query.round_id, e);
            return store_error_response(&e);
        }
    };
    let slots_by_id: HashMap<Uuid, TimeSlot> =
        slots.into_iter().map(|slot| (slot.id, slot)).collect();

    let now = chrono::Utc::now();
    let mut views: Vec<InterviewView> = interviews
        .into_iter()
        .filter(|interview| match query.scope {
            ListScope::All => true,
            ListScope::Open => interview.is_open(),
            ListScope::My => query
                .user_id
                .map(|user_id| interview.is_participant(user_id))
                .unwrap_or(false),
        })
        .filter_map(|interview| {
            let slot = slots_by_id.get(&interview.time_slot_id)?.clone();
            Some(build_view(interview, slot, now))
        })
        .collect();

    views.sort_by_key(|view| view.time_slot.window().0);

    let count = views.len();
    HttpResponse::Ok().json(ListInterviewsResponse {
        interviews: views,
        count,
    })
}

fn build_view(
    interview: Interview,
    slot: TimeSlot,
    now: chrono::DateTime<chrono::Utc>,
) -> InterviewView {
    let status = derive_status(interview.status, &slot, now);
    InterviewView {
        id: interview.id,
        round_id: interview.round_id,
        subject: interview.subject,
        interviewer_id: interview.interviewer_id,
        interviewee_id: interview.interviewee_id,
        time_slot: slot,
        recording_allowed: interview.recording_allowed,
        meeting_link: interview.meeting_link,
        recording_link: interview.recording_link,
        status,
    }
}

/// Create an open, single-sided interview offer
///
/// POST /api/v1/interviews/open
async fn create_open_interview(
    state: web::Data<AppState>,
    req: web::Json<CreateOpenInterviewRequest>,
) -> impl Responder {
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

    match state
        .store
        .create_open_interview(
            req.round_id,
            req.user_id,
            req.role,
            req.subject,
            req.time_slot_id,
        )
        .await
    {
        Ok(id) => {
            tracing::info!(
                "Open interview {} created by {} as {}",
                id,
                req.user_id,
                req.role.as_str()
            );
            HttpResponse::Created().json(serde_json::json!({
                "success": true,
                "interviewId": id,
            }))
        }
        Err(e) => {
            tracing::error!("Failed to create open interview: {}", e);
            store_error_response(&e)
        }
    }
}

/// Join an open interview on its unfilled side
///
/// POST /api/v1/interviews/{id}/join
async fn join_interview(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<JoinInterviewRequest>,
) -> impl Responder {
    let interview_id = path.into_inner();

    match state.store.join_interview(interview_id, req.user_id).await {
        Ok(interview) => {
            tracing::info!("User {} joined interview {}", req.user_id, interview_id);
            HttpResponse::Ok().json(interview)
        }
        Err(e) => {
            tracing::warn!(
                "User {} could not join interview {}: {}",
                req.user_id,
                interview_id,
                e
            );
            store_error_response(&e)
        }
    }
}

/// Update an interview's meeting link, participants only
///
/// PATCH /api/v1/interviews/{id}/meeting-link
async fn update_meeting_link(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateLinkRequest>,
) -> impl Responder {
    update_link(&state, path.into_inner(), &req, LinkKind::Meeting).await
}

/// Update an interview's recording link, participants only
///
/// PATCH /api/v1/interviews/{id}/recording-link
async fn update_recording_link(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<UpdateLinkRequest>,
) -> impl Responder {
    update_link(&state, path.into_inner(), &req, LinkKind::Recording).await
}

enum LinkKind {
    Meeting,
    Recording,
}

async fn update_link(
    state: &web::Data<AppState>,
    interview_id: Uuid,
    req: &UpdateLinkRequest,
    kind: LinkKind,
) -> HttpResponse {
    if let Err(errors) = req.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "validation_failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let result = match kind {
        LinkKind::Meeting => {
            state
                .store
                .update_meeting_link(interview_id, req.user_id, &req.link)
                .await
        }
        LinkKind::Recording => {
            state
                .store
                .update_recording_link(interview_id, req.user_id, &req.link)
                .await
        }
    };

    match result {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "success": true })),
        Err(e) => {
            tracing::warn!(
                "User {} could not update link on interview {}: {}",
                req.user_id,
                interview_id,
                e
            );
            store_error_response(&e)
        }
    }
}
