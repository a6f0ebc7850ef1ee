use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use subtle::ConstantTimeEq;

use crate::api::errors::ApiError;
use crate::core::state::AppState;

/// Caller that presented the configured maintenance token.
pub(crate) struct MaintenanceOperator;

#[async_trait]
impl FromRequestParts<AppState> for MaintenanceOperator {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let expected = state
            .settings()
            .maintenance()
            .token
            .as_deref()
            .ok_or(ApiError::Unauthorized("Maintenance access is disabled"))?;

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(ApiError::Unauthorized("Invalid maintenance credentials"))?;

        if !tokens_match(token.as_bytes(), expected.as_bytes()) {
            tracing::warn!("Rejected maintenance request with a wrong token");
            return Err(ApiError::Unauthorized("Invalid maintenance credentials"));
        }

        Ok(MaintenanceOperator)
    }
}

fn tokens_match(given: &[u8], expected: &[u8]) -> bool {
    bool::from(given.ct_eq(expected))
}
