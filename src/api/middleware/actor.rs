//! Calling-actor resolution middleware.
//!
//! Authentication lives upstream: the identity provider in front of
//! this service sets `X-Actor-Id` on every request it has
//! authenticated. This middleware resolves that id against the store
//! and injects the [`Actor`] as a request extension. Requests without a
//! resolvable, active actor are denied with the same message as any
//! other authorization failure.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::api::SharedState;
use crate::error::{AppError, Result};
use crate::models::Actor;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Actor attached to the request by [`resolve_actor_middleware`].
#[derive(Clone)]
pub struct ActorExtension(pub Actor);

pub async fn resolve_actor_middleware(
    State(state): State<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let actor_id = request
        .headers()
        .get(ACTOR_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or_else(|| AppError::Forbidden("Missing or malformed actor identity".to_string()))?;

    let actor: Actor = state
        .store
        .actor(actor_id)
        .await?
        .filter(|actor| actor.is_active)
        .ok_or_else(|| {
            AppError::Forbidden("You do not have permission to perform this action.".to_string())
        })?;

    request.extensions_mut().insert(ActorExtension(actor));
    Ok(next.run(request).await)
}
