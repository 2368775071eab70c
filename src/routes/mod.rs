use crate::models::AppState;
use axum::{Json, Router};
use serde::Serialize;

pub mod admin_routes;
pub mod appointment_routes;
pub mod intake_routes;
pub mod register_routes;

use crate::forms::rules::ValidationErrors;
use crate::forms::submit::NavigationIntent;
use crate::models::ApiOk;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(intake_routes::router())
        .merge(register_routes::router())
        .merge(appointment_routes::router())
        .nest("/admin", admin_routes::router())
        .with_state(state)
}

/// Common answer for form submissions: either where to go next, or the
/// per-field errors that blocked the submit.
#[derive(Debug, Serialize)]
pub struct SubmitOutcome {
    pub redirect: Option<String>,
    pub closed: bool,
    pub errors: ValidationErrors,
}

pub fn submit_outcome(
    intent: NavigationIntent,
    errors: ValidationErrors,
) -> Json<ApiOk<SubmitOutcome>> {
    let outcome = match intent {
        NavigationIntent::Push { to } => SubmitOutcome {
            redirect: Some(to),
            closed: false,
            errors,
        },
        NavigationIntent::CloseOverlay => SubmitOutcome {
            redirect: None,
            closed: true,
            errors,
        },
        NavigationIntent::Stay => SubmitOutcome {
            redirect: None,
            closed: false,
            errors,
        },
    };
    Json(ApiOk { data: outcome })
}
