//! Shared state and HTTP API for the LicenseVerify server.
//!
//! The router exposes the five JSON endpoints of the service and maps
//! the core error taxonomy onto HTTP status codes: validation failures
//! are 400, unknown keys 404, expired licenses 403, storage faults 500
//! with a generic message. Store calls run on the blocking pool since
//! SQLite access is synchronous.

use axum::{
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use licenseverify_core::{CoreError, LicenseVerifier, StatsReporter, SupportIntake};
use licenseverify_store::{AuditLog, LicenseStore, Pool, TicketStore};
use licenseverify_types::{CompanyListing, NewTicket, Stats, TicketPriority, VerifiedLicense};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::error;

/// Components shared by all request handlers.
pub struct AppState {
    verifier: LicenseVerifier,
    intake: SupportIntake,
    reporter: StatsReporter,
    licenses: LicenseStore,
}

impl AppState {
    /// Wires the core components over one connection pool.
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        let licenses = LicenseStore::new(pool.clone());
        let tickets = TicketStore::new(pool.clone());
        let audit = AuditLog::new(pool);
        Self {
            verifier: LicenseVerifier::new(licenses.clone(), audit.clone()),
            intake: SupportIntake::new(tickets.clone()),
            reporter: StatsReporter::new(licenses.clone(), tickets, audit),
            licenses,
        }
    }

    /// Returns the license store, for seeding and administrative tooling.
    #[must_use]
    pub fn licenses(&self) -> &LicenseStore {
        &self.licenses
    }
}

/// Build the HTTP API router with the given state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/verify-license", post(verify_license))
        .route("/api/verify-company", post(verify_company))
        .route("/api/companies", get(companies))
        .route("/api/support-request", post(support_request))
        .route("/api/stats", get(stats))
        .with_state(state)
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyLicenseRequest {
    #[serde(default)]
    pub license_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VerifyCompanyRequest {
    #[serde(default)]
    pub company_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SupportRequestBody {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub issue_description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyLicenseResponse {
    pub success: bool,
    pub message: String,
    pub license: VerifiedLicense,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyCompanyResponse {
    pub success: bool,
    pub message: String,
    pub company: VerifiedLicense,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompaniesResponse {
    pub success: bool,
    pub companies: Vec<CompanyListing>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SupportResponse {
    pub success: bool,
    pub message: String,
    pub request_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub success: bool,
    pub stats: Stats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// An error response: a status code and the caller-facing message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(message) => Self::new(StatusCode::BAD_REQUEST, message),
            CoreError::NotFound => {
                Self::new(StatusCode::NOT_FOUND, "Invalid or expired license key")
            }
            CoreError::Expired => Self::new(StatusCode::FORBIDDEN, "License has expired"),
            CoreError::Storage(err) => {
                error!(%err, "storage failure");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

fn caller_user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn verify_license(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<VerifyLicenseRequest>,
) -> Result<Json<VerifyLicenseResponse>, ApiError> {
    let verifier = state.verifier.clone();
    let ip = addr.ip().to_string();
    let user_agent = caller_user_agent(&headers);
    let license_key = req.license_key.unwrap_or_default();

    let license = tokio::task::spawn_blocking(move || {
        verifier.verify(&license_key, Some(&ip), user_agent.as_deref())
    })
    .await
    .map_err(|_| ApiError::internal())??;

    Ok(Json(VerifyLicenseResponse {
        success: true,
        message: "License verified successfully".to_string(),
        license,
    }))
}

async fn verify_company(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<VerifyCompanyRequest>,
) -> Result<Json<VerifyCompanyResponse>, ApiError> {
    let verifier = state.verifier.clone();
    let ip = addr.ip().to_string();
    let user_agent = caller_user_agent(&headers);
    let company_name = req.company_name.unwrap_or_default();

    let result = tokio::task::spawn_blocking(move || {
        verifier.verify_company(&company_name, Some(&ip), user_agent.as_deref())
    })
    .await
    .map_err(|_| ApiError::internal())?;

    // Company lookups surface their own caller-facing wording.
    let company = result.map_err(|err| match err {
        CoreError::NotFound => ApiError::new(
            StatusCode::NOT_FOUND,
            "Company is not licensed on our platform - proceed with caution!",
        ),
        CoreError::Expired => ApiError::new(
            StatusCode::FORBIDDEN,
            "Company license has expired - status uncertain",
        ),
        other => ApiError::from(other),
    })?;

    Ok(Json(VerifyCompanyResponse {
        success: true,
        message: "Company verified successfully - This company is legitimate and licensed"
            .to_string(),
        company,
    }))
}

async fn companies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CompaniesResponse>, ApiError> {
    let licenses = state.licenses.clone();
    let companies = tokio::task::spawn_blocking(move || licenses.list_active())
        .await
        .map_err(|_| ApiError::internal())?
        .map_err(|err| {
            error!(%err, "failed to list companies");
            ApiError::internal()
        })?;

    Ok(Json(CompaniesResponse {
        success: true,
        companies,
    }))
}

async fn support_request(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SupportRequestBody>,
) -> Result<Json<SupportResponse>, ApiError> {
    let priority = match req.priority.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<TicketPriority>().map_err(|_| {
            ApiError::new(
                StatusCode::BAD_REQUEST,
                format!("invalid priority: {raw}"),
            )
        })?),
    };

    let ticket = NewTicket {
        company_name: req.company_name.unwrap_or_default(),
        contact_name: req.contact_name.unwrap_or_default(),
        contact_email: req.contact_email.unwrap_or_default(),
        contact_phone: req.contact_phone,
        issue_description: req.issue_description.unwrap_or_default(),
        priority,
    };

    let intake = state.intake.clone();
    let id = tokio::task::spawn_blocking(move || intake.submit(ticket))
        .await
        .map_err(|_| ApiError::internal())??;

    Ok(Json(SupportResponse {
        success: true,
        message: "Support request submitted successfully".to_string(),
        request_id: id.to_string(),
    }))
}

async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>, ApiError> {
    let reporter = state.reporter.clone();
    let stats = tokio::task::spawn_blocking(move || reporter.stats())
        .await
        .map_err(|_| ApiError::internal())??;

    Ok(Json(StatsResponse {
        success: true,
        stats,
    }))
}
