use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use crate::auth::verify_passkey;
use crate::error::ApiError;
use crate::models::AppState;

/// Gate for the admin surface. The client that passed the passkey prompt
/// sends the passkey as a bearer token on every admin call; there is no
/// session beyond this static check.
#[derive(Debug, Clone, Copy)]
pub struct AdminContext;

impl FromRequestParts<AppState> for AdminContext {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let TypedHeader(authz): TypedHeader<Authorization<Bearer>> =
                TypedHeader::from_request_parts(parts, state)
                    .await
                    .map_err(|_| ApiError::invalid_passkey())?;

            if !verify_passkey(authz.token(), &state.admin_passkey_hash) {
                return Err(ApiError::invalid_passkey());
            }

            Ok(AdminContext)
        }
    }
}
