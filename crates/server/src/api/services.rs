//! Service ticket API handlers.
//!
//! Validates path and body input, then calls the dispatcher. Dispatcher
//! errors are mapped to HTTP statuses here and nowhere else.

use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use servicedesk_core::{
    AttendantId, DispatchError, Ticket, TicketPatch, TicketStatus, TicketType,
};
use std::sync::Arc;

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a service.
///
/// Fields are optional so that missing values produce a 400 with a
/// readable message instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateServiceBody {
    #[serde(rename = "type")]
    pub service_type: Option<String>,
    pub description: Option<String>,
    pub customer_id: Option<String>,
}

/// Request body for updating a service
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServiceBody {
    pub status: Option<String>,
    pub description: Option<String>,
    pub attendant_id: Option<u32>,
}

/// Returned by the next-in-queue endpoint when nothing is waiting
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Either the next queued service or a message saying there is none
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum NextServiceResponse {
    Service(Ticket),
    Empty(MessageResponse),
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn dispatch_error(e: DispatchError) -> ApiError {
    let status = match e {
        DispatchError::NotFound(_) => StatusCode::NOT_FOUND,
        DispatchError::CapacityExceeded { .. } | DispatchError::InvalidArgument(_) => {
            StatusCode::BAD_REQUEST
        }
        DispatchError::InvalidTransition { .. } => StatusCode::CONFLICT,
    };
    error(status, e.to_string())
}

fn parse_status(raw: &str) -> Result<TicketStatus, ApiError> {
    raw.parse()
        .map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid status"))
}

fn parse_type(raw: &str) -> Result<TicketType, ApiError> {
    raw.parse()
        .map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid type"))
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(error(StatusCode::BAD_REQUEST, message)),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/services
pub async fn list_services(State(state): State<Arc<AppState>>) -> Json<Vec<Ticket>> {
    Json(state.dispatcher().list())
}

/// GET /api/services/{status}
pub async fn list_by_status(
    State(state): State<Arc<AppState>>,
    Path(status): Path<String>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let status = parse_status(&status)?;
    Ok(Json(state.dispatcher().list_by_status(status)))
}

/// GET /api/services/{status}/{type}
pub async fn list_by_status_and_type(
    State(state): State<Arc<AppState>>,
    Path((status, service_type)): Path<(String, String)>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let status = parse_status(&status)?;
    let service_type = parse_type(&service_type)?;
    Ok(Json(
        state
            .dispatcher()
            .list_by_status_and_type(status, service_type),
    ))
}

/// POST /api/services
///
/// The new service starts ACTIVE when its attendant has a free slot,
/// QUEUED otherwise.
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateServiceBody>, JsonRejection>,
) -> Result<(StatusCode, Json<Ticket>), ApiError> {
    let Json(body) = body.map_err(|e| error(StatusCode::BAD_REQUEST, e.body_text()))?;

    let service_type = match body.service_type.as_deref() {
        Some(raw) => parse_type(raw)?,
        None => return Err(error(StatusCode::BAD_REQUEST, "Invalid type")),
    };
    let description = required(body.description, "Description is required")?;
    let customer_id = required(body.customer_id, "Customer ID is required")?;

    state
        .dispatcher()
        .create(service_type, description, customer_id)
        .map(|ticket| (StatusCode::CREATED, Json(ticket)))
        .map_err(dispatch_error)
}

/// PATCH /api/services/next/{type}
///
/// Peeks at the oldest queued service of a type without changing it.
pub async fn next_service(
    State(state): State<Arc<AppState>>,
    Path(service_type): Path<String>,
) -> Result<Json<NextServiceResponse>, ApiError> {
    let service_type = parse_type(&service_type)?;

    let response = match state.dispatcher().peek_next(service_type) {
        Some(ticket) => NextServiceResponse::Service(ticket),
        None => NextServiceResponse::Empty(MessageResponse {
            message: "No queued service for this type".to_string(),
        }),
    };
    Ok(Json(response))
}

/// PATCH /api/services/{id}
///
/// Resolving a service frees its attendant's slot and promotes the next
/// queued service. Assigning or transferring to a full attendant fails.
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Ticket>, ApiError> {
    let id: u64 = id
        .parse()
        .map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid ID"))?;

    // An empty body is an empty patch.
    let body: UpdateServiceBody = if body.is_empty() {
        UpdateServiceBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| error(StatusCode::BAD_REQUEST, format!("Invalid body: {}", e)))?
    };

    let patch = TicketPatch {
        status: body.status.as_deref().map(parse_status).transpose()?,
        description: body.description,
        attendant_id: body.attendant_id.map(AttendantId),
    };

    state
        .dispatcher()
        .update(id, patch)
        .map(Json)
        .map_err(dispatch_error)
}
