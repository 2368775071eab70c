// src/routes/appointment_routes.rs
//
// New-appointment page shell and the success page it navigates to.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    forms::{
        field::{Control, FieldValue},
        submit::AppointmentForm,
    },
    models::{ApiOk, AppState, AppointmentMode, Status, format_date_time},
    routes::{SubmitOutcome, submit_outcome},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/patients/{user_id}/new-appointment",
            get(get_new_appointment).post(post_new_appointment),
        )
        .route(
            "/patients/{user_id}/new-appointment/success",
            get(get_appointment_success),
        )
}

#[derive(Debug, Serialize)]
pub struct NewAppointmentPageData {
    pub patient_id: Uuid,
    pub controls: Vec<Control>,
}

pub async fn get_new_appointment(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiOk<NewAppointmentPageData>>, ApiError> {
    let patient = state.actions.get_patient(user_id).await?;
    let form = AppointmentForm::new(AppointmentMode::Create, user_id, patient.patient_id, None);
    Ok(Json(ApiOk {
        data: NewAppointmentPageData {
            patient_id: patient.patient_id,
            controls: form.controls(),
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct NewAppointmentRequest {
    pub primary_physician: String,
    pub schedule: Option<DateTime<Utc>>,
    pub reason: String,
    pub note: Option<String>,
}

pub async fn post_new_appointment(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(req): Json<NewAppointmentRequest>,
) -> Result<Json<ApiOk<SubmitOutcome>>, ApiError> {
    let patient = state.actions.get_patient(user_id).await?;

    let mut form = AppointmentForm::new(AppointmentMode::Create, user_id, patient.patient_id, None);
    form.state
        .set("primary_physician", FieldValue::Text(req.primary_physician));
    form.state.set("schedule", FieldValue::Timestamp(req.schedule));
    form.state.set("reason", FieldValue::Text(req.reason));
    form.state
        .set("note", FieldValue::Text(req.note.unwrap_or_default()));

    let intent = form.submit(state.actions.as_ref()).await;
    Ok(submit_outcome(intent, form.errors))
}

#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    pub appointment_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct AppointmentSuccessData {
    pub appointment_id: Uuid,
    pub primary_physician: String,
    pub schedule: String,
    pub status: Status,
    pub new_appointment_url: String,
}

pub async fn get_appointment_success(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(q): Query<SuccessQuery>,
) -> Result<Json<ApiOk<AppointmentSuccessData>>, ApiError> {
    let appointment = state.actions.get_appointment(q.appointment_id).await?;

    Ok(Json(ApiOk {
        data: AppointmentSuccessData {
            appointment_id: appointment.appointment_id,
            primary_physician: appointment.primary_physician.clone(),
            schedule: format_date_time(appointment.schedule),
            status: appointment.status,
            new_appointment_url: format!("/patients/{user_id}/new-appointment"),
        },
    }))
}
