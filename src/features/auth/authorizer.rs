//! Media authorization capability
//!
//! The media routes have no opinion on how identity is established; they
//! only ask an injected authorizer whether the request may proceed. The
//! embedding application supplies the implementation.

use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::http::{header, request::Parts};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;

/// Decides whether a request may reach the media operations.
///
/// Returning `Ok(false)` denies with the fixed unauthorized response;
/// returning an error propagates as a generic server failure.
#[async_trait]
pub trait MediaAuthorizer: Send + Sync {
    async fn authorize(&self, request: &Parts) -> Result<bool, AppError>;
}

/// Bearer-token authorizer driven by configuration.
///
/// With no token configured every request is allowed, which is only
/// appropriate for local development; `main` logs a warning in that case.
pub struct StaticTokenAuthorizer {
    token: Option<String>,
}

impl StaticTokenAuthorizer {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    pub fn allows_all(&self) -> bool {
        self.token.is_none()
    }
}

#[async_trait]
impl MediaAuthorizer for StaticTokenAuthorizer {
    async fn authorize(&self, request: &Parts) -> Result<bool, AppError> {
        let Some(expected) = &self.token else {
            return Ok(true);
        };

        let bearer = request
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        match bearer {
            Some(token) if token == expected => Ok(true),
            _ => {
                debug!("media request rejected: missing or mismatched bearer token");
                Ok(false)
            }
        }
    }
}

/// Middleware gating the media routes on the injected authorizer.
///
/// Runs before method dispatch, so a denied request performs no storage
/// operation regardless of verb.
pub async fn require_media_auth(
    State(authorizer): State<Arc<dyn MediaAuthorizer>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();

    if !authorizer.authorize(&parts).await? {
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
