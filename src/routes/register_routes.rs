// src/routes/register_routes.rs
//
// Registration page shell: loads the intake user, renders the registration
// form, and accepts the multipart submission (text fields plus the optional
// identification document).

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::ApiError,
    forms::{
        field::{Control, FieldValue},
        submit::RegisterForm,
        upload::{FilePayload, is_image_like},
    },
    models::{ApiOk, AppState, User},
    routes::{SubmitOutcome, submit_outcome},
};

pub fn router() -> Router<AppState> {
    Router::new().route(
        "/patients/{user_id}/register",
        get(get_register).post(post_register),
    )
}

#[derive(Debug, Serialize)]
pub struct RegisterPageData {
    pub user: User,
    pub controls: Vec<Control>,
}

pub async fn get_register(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ApiOk<RegisterPageData>>, ApiError> {
    let user = state.actions.get_user(user_id).await?;
    let form = RegisterForm::new(user.clone());
    Ok(Json(ApiOk {
        data: RegisterPageData {
            user,
            controls: form.controls(),
        },
    }))
}

pub async fn post_register(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<ApiOk<SubmitOutcome>>, ApiError> {
    let user = state.actions.get_user(user_id).await?;
    let mut form = RegisterForm::new(user);

    while let Some(part) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest("VALIDATION_ERROR", format!("bad multipart body: {e}")))?
    {
        let Some(name) = field_name(part.name()) else {
            continue;
        };

        if name == "identification_document" {
            let file_name = part.file_name().unwrap_or("document").to_string();
            let content_type = part
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = part.bytes().await.map_err(|e| {
                ApiError::BadRequest("VALIDATION_ERROR", format!("failed to read upload: {e}"))
            })?;
            if bytes.is_empty() {
                continue;
            }
            if !is_image_like(&content_type) {
                return Err(ApiError::BadRequest(
                    "VALIDATION_ERROR",
                    "identification document must be an image (PNG, JPG or SVG)".into(),
                ));
            }
            form.attach_document(FilePayload {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let text = part.text().await.map_err(|e| {
            ApiError::BadRequest("VALIDATION_ERROR", format!("failed to read field: {e}"))
        })?;

        match name {
            "birth_date" => {
                let parsed = DateTime::parse_from_rfc3339(text.trim()).map_err(|_| {
                    ApiError::BadRequest(
                        "VALIDATION_ERROR",
                        "birth_date must be an RFC 3339 date-time".into(),
                    )
                })?;
                form.state.set(
                    name,
                    FieldValue::Timestamp(Some(parsed.with_timezone(&Utc))),
                );
            }
            n if n.ends_with("_consent") => {
                form.state
                    .set(name, FieldValue::Flag(text.trim() == "true"));
            }
            _ => form.state.set(name, FieldValue::Text(text)),
        }
    }

    let intent = form.submit(state.actions.as_ref()).await;
    Ok(submit_outcome(intent, form.errors))
}

/// Multipart part names arrive as arbitrary strings; form state keys are the
/// fixed field names, so map to the static set.
fn field_name(part_name: Option<&str>) -> Option<&'static str> {
    const FIELDS: &[&str] = &[
        "name",
        "email",
        "phone",
        "birth_date",
        "gender",
        "address",
        "occupation",
        "emergency_contact_name",
        "emergency_contact_number",
        "primary_physician",
        "insurance_provider",
        "insurance_policy_number",
        "allergies",
        "current_medication",
        "family_medical_history",
        "past_medical_history",
        "identification_type",
        "identification_number",
        "identification_document",
        "treatment_consent",
        "disclosure_consent",
        "privacy_consent",
    ];
    let name = part_name?;
    FIELDS.iter().find(|f| **f == name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_fields_and_drops_strays() {
        assert_eq!(field_name(Some("email")), Some("email"));
        assert_eq!(field_name(Some("privacy_consent")), Some("privacy_consent"));
        assert_eq!(field_name(Some("csrf_token")), None);
        assert_eq!(field_name(None), None);
    }
}
