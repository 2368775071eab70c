// src/routes/intake_routes.rs
//
// The landing page shell: intake form plus the optional admin passkey gate
// behind the ?admin=true query flag.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    auth::verify_passkey,
    error::ApiError,
    forms::{field::Control, field::FieldValue, submit::IntakeForm},
    models::{ApiOk, AppState},
    routes::{SubmitOutcome, submit_outcome},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_intake).post(post_intake))
        .route("/passkey", post(verify_admin_passkey))
}

#[derive(Debug, Deserialize)]
pub struct IntakeQuery {
    pub admin: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IntakePageData {
    pub passkey_required: bool,
    pub controls: Vec<Control>,
}

pub async fn get_intake(
    State(_state): State<AppState>,
    Query(q): Query<IntakeQuery>,
) -> Result<Json<ApiOk<IntakePageData>>, ApiError> {
    let form = IntakeForm::new();
    Ok(Json(ApiOk {
        data: IntakePageData {
            passkey_required: q.admin.as_deref() == Some("true"),
            controls: form.controls(),
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct IntakeSubmitRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
}

pub async fn post_intake(
    State(state): State<AppState>,
    Json(req): Json<IntakeSubmitRequest>,
) -> Result<Json<ApiOk<SubmitOutcome>>, ApiError> {
    let mut form = IntakeForm::new();
    form.state.set("name", FieldValue::Text(req.name));
    form.state.set("email", FieldValue::Text(req.email));
    form.state.set("phone", FieldValue::Text(req.phone));

    let intent = form.submit(state.actions.as_ref()).await;
    Ok(submit_outcome(intent, form.errors))
}

#[derive(Debug, Deserialize)]
pub struct PasskeyRequest {
    pub passkey: String,
}

#[derive(Debug, Serialize)]
pub struct PasskeyData {
    pub ok: bool,
}

pub async fn verify_admin_passkey(
    State(state): State<AppState>,
    Json(req): Json<PasskeyRequest>,
) -> Result<Json<ApiOk<PasskeyData>>, ApiError> {
    if !verify_passkey(&req.passkey, &state.admin_passkey_hash) {
        return Err(ApiError::invalid_passkey());
    }
    Ok(Json(ApiOk {
        data: PasskeyData { ok: true },
    }))
}
