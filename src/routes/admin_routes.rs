// src/routes/admin_routes.rs
//
// Passkey-gated staff surface: recent appointments with status counts, and
// schedule/cancel of a pending request through the appointment form.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    forms::{field::FieldValue, submit::AppointmentForm},
    middleware::admin_context::AdminContext,
    models::{ApiOk, Appointment, AppointmentCounts, AppState, AppointmentMode},
    routes::{SubmitOutcome, submit_outcome},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list_appointments))
        .route("/appointments/{appointment_id}", patch(patch_appointment))
}

#[derive(Debug, Serialize)]
pub struct AdminDashboardData {
    pub counts: AppointmentCounts,
    pub appointments: Vec<Appointment>,
}

pub async fn list_appointments(
    State(state): State<AppState>,
    _admin: AdminContext,
) -> Result<Json<ApiOk<AdminDashboardData>>, ApiError> {
    let (appointments, counts) = state.actions.list_recent_appointments().await?;
    Ok(Json(ApiOk {
        data: AdminDashboardData {
            counts,
            appointments,
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct AdminPatchRequest {
    pub mode: AppointmentMode,
    pub primary_physician: Option<String>,
    pub schedule: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
}

pub async fn patch_appointment(
    State(state): State<AppState>,
    _admin: AdminContext,
    Path(appointment_id): Path<Uuid>,
    Json(req): Json<AdminPatchRequest>,
) -> Result<Json<ApiOk<SubmitOutcome>>, ApiError> {
    if req.mode == AppointmentMode::Create {
        return Err(ApiError::BadRequest(
            "VALIDATION_ERROR",
            "mode must be schedule or cancel".into(),
        ));
    }

    let existing = state.actions.get_appointment(appointment_id).await?;

    let mut form = AppointmentForm::new(
        req.mode,
        existing.user_id,
        existing.patient_id,
        Some(existing),
    );
    if let Some(physician) = req.primary_physician {
        form.state
            .set("primary_physician", FieldValue::Text(physician));
    }
    if let Some(schedule) = req.schedule {
        form.state
            .set("schedule", FieldValue::Timestamp(Some(schedule)));
    }
    if let Some(reason) = req.cancellation_reason {
        form.state
            .set("cancellation_reason", FieldValue::Text(reason));
    }

    let intent = form.submit(state.actions.as_ref()).await;
    Ok(submit_outcome(intent, form.errors))
}
