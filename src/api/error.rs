//! API error types with structured JSON responses.
//!
//! Every failure maps to a distinct code and an actionable French message —
//! triage penalizes ambiguity, so there is no generic "something went
//! wrong" variant exposed to patients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::intake::IntakeError;
use crate::routing::RoutingError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Empty answer")]
    EmptyAnswer,
    #[error("Intake session not found")]
    SessionNotFound,
    #[error("Intake already complete")]
    SessionComplete,
    #[error("Intake not finished")]
    IntakeIncomplete,
    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),
    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),
    #[error("Case not found")]
    CaseNotFound,
    #[error("Case already treated")]
    AlreadyTreated,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::EmptyAnswer => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "EMPTY_ANSWER",
                "Votre réponse est vide. Décrivez votre symptôme puis renvoyez.".to_string(),
            ),
            ApiError::SessionNotFound => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Cette conversation n'existe plus. Démarrez un nouveau diagnostic.".to_string(),
            ),
            ApiError::SessionComplete => (
                StatusCode::CONFLICT,
                "SESSION_COMPLETE",
                "Le questionnaire est déjà terminé. Réinitialisez pour recommencer.".to_string(),
            ),
            ApiError::IntakeIncomplete => (
                StatusCode::CONFLICT,
                "INTAKE_INCOMPLETE",
                "Répondez d'abord aux 7 questions du questionnaire.".to_string(),
            ),
            ApiError::SynthesisFailed(detail) => {
                tracing::warn!(detail, "synthesis failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "SYNTHESIS_FAILED",
                    "L'analyse n'a pas abouti. Réessayez dans quelques instants.".to_string(),
                )
            }
            ApiError::PersistenceFailed(detail) => {
                tracing::error!(detail, "persistence failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "PERSISTENCE_FAILED",
                    "Votre dossier n'a pas pu être enregistré. Aucun médecin n'a été \
                     assigné — réessayez."
                        .to_string(),
                )
            }
            ApiError::CaseNotFound => (
                StatusCode::NOT_FOUND,
                "CASE_NOT_FOUND",
                "Ce diagnostic n'existe pas ou a été supprimé.".to_string(),
            ),
            ApiError::AlreadyTreated => (
                StatusCode::CONFLICT,
                "ALREADY_TREATED",
                "Ce diagnostic a déjà été traité.".to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "Une erreur interne est survenue.".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<RoutingError> for ApiError {
    fn from(err: RoutingError) -> Self {
        match err {
            RoutingError::SessionNotFound(_) => ApiError::SessionNotFound,
            RoutingError::Intake(IntakeError::EmptyAnswer) => ApiError::EmptyAnswer,
            RoutingError::Intake(IntakeError::SessionComplete) => ApiError::SessionComplete,
            RoutingError::Intake(IntakeError::NotReady) => ApiError::IntakeIncomplete,
            RoutingError::SynthesisFailed(e) => ApiError::SynthesisFailed(e.to_string()),
            RoutingError::PersistenceFailed(e) => ApiError::PersistenceFailed(e.to_string()),
            RoutingError::CaseNotFound(_) => ApiError::CaseNotFound,
            RoutingError::AlreadyTreated(_) => ApiError::AlreadyTreated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn empty_answer_returns_422() {
        let response = ApiError::EmptyAnswer.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "EMPTY_ANSWER");
        assert!(json["error"]["message"].as_str().unwrap().contains("vide"));
    }

    #[tokio::test]
    async fn session_not_found_returns_404() {
        let response = ApiError::SessionNotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "SESSION_NOT_FOUND");
    }

    #[tokio::test]
    async fn session_complete_returns_409() {
        let response = ApiError::SessionComplete.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn synthesis_failure_returns_502() {
        let response = ApiError::SynthesisFailed("timeout".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "SYNTHESIS_FAILED");
        // Backend detail stays server-side; patients get an actionable message.
        assert!(!json["error"]["message"].as_str().unwrap().contains("timeout"));
    }

    #[tokio::test]
    async fn persistence_failure_says_no_doctor_was_assigned() {
        let response = ApiError::PersistenceFailed("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Aucun médecin"));
    }

    #[tokio::test]
    async fn already_treated_returns_409() {
        let response = ApiError::AlreadyTreated.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "ALREADY_TREATED");
    }

    #[tokio::test]
    async fn internal_hides_details() {
        let response = ApiError::Internal("lock poisoned".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(!json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("poisoned"));
    }

    #[test]
    fn routing_errors_map_to_distinct_codes() {
        use uuid::Uuid;
        let id = Uuid::new_v4();

        assert!(matches!(
            ApiError::from(RoutingError::SessionNotFound(id)),
            ApiError::SessionNotFound
        ));
        assert!(matches!(
            ApiError::from(RoutingError::Intake(IntakeError::EmptyAnswer)),
            ApiError::EmptyAnswer
        ));
        assert!(matches!(
            ApiError::from(RoutingError::Intake(IntakeError::SessionComplete)),
            ApiError::SessionComplete
        ));
        assert!(matches!(
            ApiError::from(RoutingError::Intake(IntakeError::NotReady)),
            ApiError::IntakeIncomplete
        ));
        assert!(matches!(
            ApiError::from(RoutingError::CaseNotFound(id)),
            ApiError::CaseNotFound
        ));
        assert!(matches!(
            ApiError::from(RoutingError::AlreadyTreated(id)),
            ApiError::AlreadyTreated
        ));
    }
}
