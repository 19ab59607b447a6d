//! API router — intake, synthesis, and case lifecycle under `/api/`.
//!
//! Handlers are thin: validate the request shape, call `CaseRouter`, map
//! `RoutingError` to `ApiError`. A missed match is NOT an error — the
//! patient gets an explicit no-specialist message with support contact.

use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use crate::config;
use crate::intake::session::SubmitOutcome;
use crate::routing::RouteOutcome;
use crate::synthesis::report;

use super::error::ApiError;
use super::types::{
    AnswerRequest, AnswerResponse, ApiContext, DiagnoseResponse, DoctorSummary, HealthResponse,
    ResetResponse, RouteCaseRequest, RouteCaseResponse, StartIntakeRequest, StartIntakeResponse,
    TreatRequest, NO_SPECIALIST_MESSAGE,
};

/// Build the application router: all endpoints under `/api`, with a
/// permissive CORS layer for the browser UI.
pub fn app_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/intake/start", post(start_intake))
        .route("/intake/:id", get(session_status))
        .route("/intake/:id/answer", post(submit_answer))
        .route("/intake/:id/reset", post(reset_intake))
        .route("/intake/:id/diagnose", post(diagnose))
        .route("/cases", post(route_case))
        .route("/cases/:id/treat", post(treat_case))
        .route("/cases/:id", delete(delete_case))
        .with_state(ctx);

    Router::new().nest("/api", api).layer(CorsLayer::permissive())
}

// ── Handlers ─────────────────────────────────────────────────

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: config::APP_VERSION,
    })
}

async fn start_intake(
    State(ctx): State<ApiContext>,
    Json(request): Json<StartIntakeRequest>,
) -> Result<Json<StartIntakeResponse>, ApiError> {
    let (session_id, question) = ctx.router.start_session(request.patient_id).await;
    Ok(Json(StartIntakeResponse {
        session_id,
        question: question.to_string(),
    }))
}

async fn session_status(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<crate::routing::SessionSnapshot>, ApiError> {
    Ok(Json(ctx.router.session_snapshot(id).await?))
}

async fn submit_answer(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    let response = match ctx.router.submit_answer(id, &request.answer).await? {
        SubmitOutcome::NextQuestion(question) => AnswerResponse {
            done: false,
            question: Some(question.to_string()),
            record: None,
        },
        SubmitOutcome::Finalized(record) => AnswerResponse {
            done: true,
            question: None,
            record: Some(record),
        },
    };
    Ok(Json(response))
}

async fn reset_intake(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResetResponse>, ApiError> {
    let question = ctx.router.reset_session(id).await?;
    Ok(Json(ResetResponse {
        question: question.to_string(),
    }))
}

async fn diagnose(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<DiagnoseResponse>, ApiError> {
    let diagnostic = ctx.router.synthesize(id).await?;
    let sections = report::extract_sections(&diagnostic);
    Ok(Json(DiagnoseResponse {
        diagnostic,
        sections,
    }))
}

async fn route_case(
    State(ctx): State<ApiContext>,
    Json(request): Json<RouteCaseRequest>,
) -> Result<Json<RouteCaseResponse>, ApiError> {
    let outcome = match (request.session_id, request.patient_id, request.symptoms) {
        (Some(session_id), _, _) => ctx.router.route_session(session_id).await?,
        (None, Some(patient_id), Some(symptoms)) => {
            ctx.router.route_direct(patient_id, &symptoms).await?
        }
        _ => {
            return Err(ApiError::BadRequest(
                "Fournissez session_id, ou patient_id avec symptoms.".into(),
            ))
        }
    };

    let response = match outcome {
        RouteOutcome::Routed { case, doctor, .. } => RouteCaseResponse {
            routed: true,
            doctor: Some(DoctorSummary::from(&doctor)),
            case: Some(case),
            message: None,
        },
        RouteOutcome::NoSpecialist => RouteCaseResponse {
            routed: false,
            case: None,
            doctor: None,
            message: Some(NO_SPECIALIST_MESSAGE.to_string()),
        },
    };
    Ok(Json(response))
}

async fn treat_case(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    request: Option<Json<TreatRequest>>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let prescription = request.and_then(|Json(body)| body.prescription);
    ctx.router.mark_treated(id, prescription).await?;
    Ok(Json(serde_json::json!({})))
}

async fn delete_case(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    ctx.router.delete_case(id).await?;
    Ok(Json(serde_json::json!({})))
}
