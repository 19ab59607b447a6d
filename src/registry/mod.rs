//! Persistence collaborator — resource-oriented REST backend.
//!
//! The backend owns doctors, patients, and diagnostics as plain JSON
//! resources. The core only reads specialty strings, appends case
//! references, and drives the diagnostic lifecycle; everything else about
//! those resources belongs to the collaborator.
//!
//! `RestRegistry` is the production client; `InMemoryRegistry` mirrors its
//! observable behavior without IO for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config;
use crate::models::{CaseRef, DiagnosticCase, Doctor, Patient};
use crate::BoxFuture;

/// Errors from persistence round trips.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Backend unreachable.
    #[error("cannot reach the persistence backend at {0}")]
    Connection(String),
    /// The round trip exceeded the configured bound.
    #[error("persistence call timed out after {0}s")]
    Timeout(u64),
    /// Backend answered with a non-success status.
    #[error("persistence backend responded {status}: {body}")]
    Backend { status: u16, body: String },
    /// Transport-level failure other than connect/timeout.
    #[error("HTTP error during persistence call: {0}")]
    Http(String),
    /// Backend payload did not parse.
    #[error("unreadable persistence payload: {0}")]
    ResponseParsing(String),
    /// A named resource does not exist on the backend.
    #[error("{resource} {id} not found")]
    NotFound {
        resource: &'static str,
        id: String,
    },
}

/// The persistence operations the core depends on.
pub trait Registry: Send + Sync {
    /// `GET /doctors` — the full roster.
    fn list_doctors(&self) -> BoxFuture<'_, Result<Vec<Doctor>, RegistryError>>;

    /// Append a case reference to a doctor's roster entry and persist it.
    ///
    /// Read-modify-write against shared backend state; concurrent matches
    /// against the same doctor can race (accepted — the backend offers no
    /// atomic append).
    fn append_doctor_case<'a>(
        &'a self,
        doctor_id: u64,
        case: &'a CaseRef,
    ) -> BoxFuture<'a, Result<(), RegistryError>>;

    /// `POST /diagnostics` — create a case.
    fn create_case<'a>(
        &'a self,
        case: &'a DiagnosticCase,
    ) -> BoxFuture<'a, Result<(), RegistryError>>;

    /// `GET /diagnostics/{id}` — `Ok(None)` when absent.
    fn get_case(&self, id: Uuid) -> BoxFuture<'_, Result<Option<DiagnosticCase>, RegistryError>>;

    /// `PATCH /diagnostics/{id}` — update a case (status, prescription).
    fn update_case<'a>(
        &'a self,
        case: &'a DiagnosticCase,
    ) -> BoxFuture<'a, Result<(), RegistryError>>;

    /// `DELETE /diagnostics/{id}` — terminal administrative deletion.
    fn delete_case(&self, id: Uuid) -> BoxFuture<'_, Result<(), RegistryError>>;

    /// `GET /patients/{id}` — `Ok(None)` when absent.
    fn get_patient(&self, id: u64) -> BoxFuture<'_, Result<Option<Patient>, RegistryError>>;
}

// ═══════════════════════════════════════════════════════════
// RestRegistry — production client
// ═══════════════════════════════════════════════════════════

pub struct RestRegistry {
    base_url: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl RestRegistry {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs: timeout.as_secs(),
        }
    }

    /// Build from `MEDIGUIDE_BACKEND_URL` / `MEDIGUIDE_REGISTRY_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        Self::new(&config::backend_url(), config::registry_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> RegistryError {
        if e.is_connect() {
            RegistryError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            RegistryError::Timeout(self.timeout_secs)
        } else {
            RegistryError::Http(e.to_string())
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RegistryError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(RegistryError::Backend {
                status: status.as_u16(),
                body,
            })
        }
    }

    async fn get_doctor(&self, id: u64) -> Result<Doctor, RegistryError> {
        let url = format!("{}/doctors/{id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound {
                resource: "doctor",
                id: id.to_string(),
            });
        }
        Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RegistryError::ResponseParsing(e.to_string()))
    }
}

impl Registry for RestRegistry {
    fn list_doctors(&self) -> BoxFuture<'_, Result<Vec<Doctor>, RegistryError>> {
        Box::pin(async move {
            let url = format!("{}/doctors", self.base_url);
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| self.map_send_error(e))?;
            Self::check_status(response)
                .await?
                .json()
                .await
                .map_err(|e| RegistryError::ResponseParsing(e.to_string()))
        })
    }

    fn append_doctor_case<'a>(
        &'a self,
        doctor_id: u64,
        case: &'a CaseRef,
    ) -> BoxFuture<'a, Result<(), RegistryError>> {
        Box::pin(async move {
            let mut doctor = self.get_doctor(doctor_id).await?;
            doctor.assigned_cases.push(case.clone());

            // Patch only the case list so collaborator-owned fields
            // (credentials, contact details) are never clobbered.
            let url = format!("{}/doctors/{doctor_id}", self.base_url);
            let body = serde_json::json!({ "diagnosticPatient": doctor.assigned_cases });
            let response = self
                .client
                .patch(&url)
                .json(&body)
                .send()
                .await
                .map_err(|e| self.map_send_error(e))?;
            Self::check_status(response).await?;
            Ok(())
        })
    }

    fn create_case<'a>(
        &'a self,
        case: &'a DiagnosticCase,
    ) -> BoxFuture<'a, Result<(), RegistryError>> {
        Box::pin(async move {
            let url = format!("{}/diagnostics", self.base_url);
            let response = self
                .client
                .post(&url)
                .json(case)
                .send()
                .await
                .map_err(|e| self.map_send_error(e))?;
            Self::check_status(response).await?;
            Ok(())
        })
    }

    fn get_case(&self, id: Uuid) -> BoxFuture<'_, Result<Option<DiagnosticCase>, RegistryError>> {
        Box::pin(async move {
            let url = format!("{}/diagnostics/{id}", self.base_url);
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| self.map_send_error(e))?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            Self::check_status(response)
                .await?
                .json()
                .await
                .map(Some)
                .map_err(|e| RegistryError::ResponseParsing(e.to_string()))
        })
    }

    fn update_case<'a>(
        &'a self,
        case: &'a DiagnosticCase,
    ) -> BoxFuture<'a, Result<(), RegistryError>> {
        Box::pin(async move {
            let url = format!("{}/diagnostics/{}", self.base_url, case.id);
            let response = self
                .client
                .patch(&url)
                .json(case)
                .send()
                .await
                .map_err(|e| self.map_send_error(e))?;
            Self::check_status(response).await?;
            Ok(())
        })
    }

    fn delete_case(&self, id: Uuid) -> BoxFuture<'_, Result<(), RegistryError>> {
        Box::pin(async move {
            let url = format!("{}/diagnostics/{id}", self.base_url);
            let response = self
                .client
                .delete(&url)
                .send()
                .await
                .map_err(|e| self.map_send_error(e))?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(RegistryError::NotFound {
                    resource: "diagnostic",
                    id: id.to_string(),
                });
            }
            Self::check_status(response).await?;
            Ok(())
        })
    }

    fn get_patient(&self, id: u64) -> BoxFuture<'_, Result<Option<Patient>, RegistryError>> {
        Box::pin(async move {
            let url = format!("{}/patients/{id}", self.base_url);
            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| self.map_send_error(e))?;
            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            Self::check_status(response)
                .await?
                .json()
                .await
                .map(Some)
                .map_err(|e| RegistryError::ResponseParsing(e.to_string()))
        })
    }
}

// ═══════════════════════════════════════════════════════════
// InMemoryRegistry — IO-free double for tests
// ═══════════════════════════════════════════════════════════

/// In-memory registry mirroring the REST backend's observable behavior.
pub struct InMemoryRegistry {
    doctors: RwLock<Vec<Doctor>>,
    cases: RwLock<HashMap<Uuid, DiagnosticCase>>,
    patients: RwLock<Vec<Patient>>,
    fail_writes: AtomicBool,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            doctors: RwLock::new(Vec::new()),
            cases: RwLock::new(HashMap::new()),
            patients: RwLock::new(Vec::new()),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn with_doctors(mut self, doctors: Vec<Doctor>) -> Self {
        self.doctors = RwLock::new(doctors);
        self
    }

    pub fn with_patients(mut self, patients: Vec<Patient>) -> Self {
        self.patients = RwLock::new(patients);
        self
    }

    /// Make every subsequent write fail, for persistence-failure paths.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn case_count(&self) -> usize {
        self.cases.read().await.len()
    }

    pub async fn doctor(&self, id: u64) -> Option<Doctor> {
        self.doctors.read().await.iter().find(|d| d.id == id).cloned()
    }

    fn write_error() -> RegistryError {
        RegistryError::Backend {
            status: 500,
            body: "write rejected".into(),
        }
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for InMemoryRegistry {
    fn list_doctors(&self) -> BoxFuture<'_, Result<Vec<Doctor>, RegistryError>> {
        Box::pin(async move { Ok(self.doctors.read().await.clone()) })
    }

    fn append_doctor_case<'a>(
        &'a self,
        doctor_id: u64,
        case: &'a CaseRef,
    ) -> BoxFuture<'a, Result<(), RegistryError>> {
        Box::pin(async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::write_error());
            }
            let mut doctors = self.doctors.write().await;
            let doctor = doctors
                .iter_mut()
                .find(|d| d.id == doctor_id)
                .ok_or(RegistryError::NotFound {
                    resource: "doctor",
                    id: doctor_id.to_string(),
                })?;
            doctor.assigned_cases.push(case.clone());
            Ok(())
        })
    }

    fn create_case<'a>(
        &'a self,
        case: &'a DiagnosticCase,
    ) -> BoxFuture<'a, Result<(), RegistryError>> {
        Box::pin(async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::write_error());
            }
            self.cases.write().await.insert(case.id, case.clone());
            Ok(())
        })
    }

    fn get_case(&self, id: Uuid) -> BoxFuture<'_, Result<Option<DiagnosticCase>, RegistryError>> {
        Box::pin(async move { Ok(self.cases.read().await.get(&id).cloned()) })
    }

    fn update_case<'a>(
        &'a self,
        case: &'a DiagnosticCase,
    ) -> BoxFuture<'a, Result<(), RegistryError>> {
        Box::pin(async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::write_error());
            }
            let mut cases = self.cases.write().await;
            if !cases.contains_key(&case.id) {
                return Err(RegistryError::NotFound {
                    resource: "diagnostic",
                    id: case.id.to_string(),
                });
            }
            cases.insert(case.id, case.clone());
            Ok(())
        })
    }

    fn delete_case(&self, id: Uuid) -> BoxFuture<'_, Result<(), RegistryError>> {
        Box::pin(async move {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(Self::write_error());
            }
            self.cases
                .write()
                .await
                .remove(&id)
                .map(|_| ())
                .ok_or(RegistryError::NotFound {
                    resource: "diagnostic",
                    id: id.to_string(),
                })
        })
    }

    fn get_patient(&self, id: u64) -> BoxFuture<'_, Result<Option<Patient>, RegistryError>> {
        Box::pin(async move {
            Ok(self
                .patients
                .read()
                .await
                .iter()
                .find(|p| p.id == id)
                .cloned())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::extract::Path;
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::Utc;

    use crate::models::enums::CaseStatus;

    fn doctor(id: u64, specialty: &str) -> Doctor {
        Doctor {
            id,
            name: format!("Dr. {id}"),
            specialty: specialty.into(),
            assigned_cases: Vec::new(),
        }
    }

    fn case_ref() -> CaseRef {
        CaseRef {
            patient_id: 1,
            patient_name: "Awa".into(),
            date: Utc::now().to_rfc3339(),
            symptoms: "fièvre".into(),
            status: CaseStatus::Pending,
        }
    }

    fn sample_case() -> DiagnosticCase {
        DiagnosticCase {
            id: Uuid::new_v4(),
            patient_id: 1,
            patient_name: "Awa".into(),
            created_at: Utc::now(),
            symptom_text: "fièvre".into(),
            status: CaseStatus::Pending,
            assigned_doctor_id: Some(1),
            doctor_name: Some("Dr. 1".into()),
            prescription: None,
        }
    }

    // ── InMemoryRegistry ──

    #[tokio::test]
    async fn in_memory_append_reaches_the_doctor() {
        let registry = InMemoryRegistry::new().with_doctors(vec![doctor(1, "generaliste")]);
        registry.append_doctor_case(1, &case_ref()).await.unwrap();
        assert_eq!(registry.doctor(1).await.unwrap().assigned_cases.len(), 1);
    }

    #[tokio::test]
    async fn in_memory_append_to_unknown_doctor_is_not_found() {
        let registry = InMemoryRegistry::new();
        let err = registry.append_doctor_case(9, &case_ref()).await.unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { resource: "doctor", .. }));
    }

    #[tokio::test]
    async fn in_memory_case_lifecycle() {
        let registry = InMemoryRegistry::new();
        let mut case = sample_case();

        registry.create_case(&case).await.unwrap();
        assert_eq!(registry.case_count().await, 1);

        case.status = CaseStatus::Treated;
        registry.update_case(&case).await.unwrap();
        let stored = registry.get_case(case.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CaseStatus::Treated);

        registry.delete_case(case.id).await.unwrap();
        assert!(registry.get_case(case.id).await.unwrap().is_none());
        assert!(matches!(
            registry.delete_case(case.id).await.unwrap_err(),
            RegistryError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn in_memory_fail_writes_rejects_mutations() {
        let registry = InMemoryRegistry::new().with_doctors(vec![doctor(1, "generaliste")]);
        registry.set_fail_writes(true);

        assert!(registry.create_case(&sample_case()).await.is_err());
        assert!(registry.append_doctor_case(1, &case_ref()).await.is_err());

        registry.set_fail_writes(false);
        assert!(registry.create_case(&sample_case()).await.is_ok());
    }

    #[tokio::test]
    async fn in_memory_patient_lookup() {
        let registry = InMemoryRegistry::new().with_patients(vec![Patient {
            id: 5,
            name: "Jean Kasongo".into(),
        }]);
        assert_eq!(
            registry.get_patient(5).await.unwrap().unwrap().name,
            "Jean Kasongo"
        );
        assert!(registry.get_patient(6).await.unwrap().is_none());
    }

    // ── RestRegistry against a fake backend ──

    /// Minimal stand-in for the JSON backend: one doctor, PATCH capture.
    fn fake_backend_router() -> Router {
        Router::new()
            .route(
                "/doctors",
                get(|| async {
                    Json(serde_json::json!([
                        {"id": 1, "noms": "Dr. Ilunga", "specialite": "cardiologue",
                         "diagnosticPatient": []},
                        {"id": 2, "noms": "Dr. Mbuyi", "specialite": "generaliste"}
                    ]))
                }),
            )
            .route(
                "/doctors/:id",
                get(|Path(id): Path<u64>| async move {
                    Json(serde_json::json!(
                        {"id": id, "noms": "Dr. Ilunga", "specialite": "cardiologue",
                         "diagnosticPatient": []}
                    ))
                })
                .patch(|Json(body): Json<serde_json::Value>| async move {
                    assert!(body["diagnosticPatient"].is_array());
                    assert_eq!(body["diagnosticPatient"].as_array().unwrap().len(), 1);
                    Json(serde_json::json!({}))
                }),
            )
            .route(
                "/diagnostics",
                axum::routing::post(|Json(body): Json<serde_json::Value>| async move {
                    assert_eq!(body["status"], "en_attente");
                    (axum::http::StatusCode::CREATED, Json(body))
                }),
            )
            .route(
                "/diagnostics/:id",
                get(|| async { (axum::http::StatusCode::NOT_FOUND, "not found") }),
            )
            .route(
                "/patients/:id",
                get(|Path(id): Path<u64>| async move {
                    Json(serde_json::json!({"id": id, "noms": "Jean Kasongo"}))
                }),
            )
    }

    async fn start_fake_backend() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, fake_backend_router()).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn rest_list_doctors_parses_roster() {
        let url = start_fake_backend().await;
        let registry = RestRegistry::new(&url, Duration::from_secs(5));

        let roster = registry.list_doctors().await.unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].specialty, "cardiologue");
        // diagnosticPatient missing on the second entry defaults to empty
        assert!(roster[1].assigned_cases.is_empty());
    }

    #[tokio::test]
    async fn rest_append_patches_only_the_case_list() {
        let url = start_fake_backend().await;
        let registry = RestRegistry::new(&url, Duration::from_secs(5));
        // The PATCH handler asserts the body shape.
        registry.append_doctor_case(1, &case_ref()).await.unwrap();
    }

    #[tokio::test]
    async fn rest_create_case_posts_wire_format() {
        let url = start_fake_backend().await;
        let registry = RestRegistry::new(&url, Duration::from_secs(5));
        registry.create_case(&sample_case()).await.unwrap();
    }

    #[tokio::test]
    async fn rest_missing_case_is_none() {
        let url = start_fake_backend().await;
        let registry = RestRegistry::new(&url, Duration::from_secs(5));
        assert!(registry.get_case(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rest_patient_lookup_resolves_name() {
        let url = start_fake_backend().await;
        let registry = RestRegistry::new(&url, Duration::from_secs(5));
        let patient = registry.get_patient(5).await.unwrap().unwrap();
        assert_eq!(patient.name, "Jean Kasongo");
    }

    #[tokio::test]
    async fn rest_unreachable_backend_is_a_connection_error() {
        let registry = RestRegistry::new("http://127.0.0.1:1", Duration::from_secs(2));
        let err = registry.list_doctors().await.unwrap_err();
        assert!(matches!(err, RegistryError::Connection(_)));
    }

    #[test]
    fn rest_constructor_trims_trailing_slash() {
        let registry = RestRegistry::new("http://localhost:3000/", Duration::from_secs(5));
        assert_eq!(registry.base_url(), "http://localhost:3000");
    }
}
