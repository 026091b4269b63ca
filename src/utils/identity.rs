//! Caller identity, as asserted by the upstream authentication gateway.
//!
//! Authentication itself lives outside this service. The gateway terminates
//! the session token and forwards the resolved user id as a trusted header;
//! this extractor only decodes it. Role checks read the user row, not the
//! header, so a stale gateway cannot grant privileges.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::utils::error::AppError;

const USER_ID_HEADER: &str = "x-user-id";

#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity {
    pub user_id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<Uuid>().ok())
            .ok_or_else(|| {
                AppError::AuthError("Missing or invalid caller identity".to_string())
            })?;

        Ok(CallerIdentity { user_id })
    }
}
