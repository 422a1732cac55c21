//! Reservation API handlers.

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use utoipa::OpenApi;
use uuid::Uuid;

use crate::api::middleware::actor::ActorExtension;
use crate::api::SharedState;
use crate::error::Result;
use crate::models::Reservation;
use crate::services::lifecycle::ReservationPatch;

#[derive(OpenApi)]
#[openapi(
    paths(list_reservations, update_reservation),
    components(schemas(Reservation, ReservationPatch))
)]
pub struct ReservationsApiDoc;

/// GET /api/v1/manager/reservations
///
/// Reservations in the calling actor's hotel scope, newest check-in
/// first. An actor without scope gets an empty list, not an error.
#[utoipa::path(
    get,
    path = "/manager/reservations",
    context_path = "/api/v1",
    tag = "reservations",
    operation_id = "list_reservations",
    responses(
        (status = 200, description = "Reservations visible to the calling actor", body = Vec<Reservation>),
        (status = 403, description = "Actor identity missing or unknown"),
    ),
)]
pub async fn list_reservations(
    State(state): State<SharedState>,
    Extension(ActorExtension(actor)): Extension<ActorExtension>,
) -> Result<Json<Vec<Reservation>>> {
    let reservations = state.access.list_for_actor(&actor).await?;
    Ok(Json(reservations))
}

/// PATCH /api/v1/reservations/:id
#[utoipa::path(
    patch,
    path = "/reservations/{id}",
    context_path = "/api/v1",
    tag = "reservations",
    operation_id = "update_reservation",
    params(
        ("id" = Uuid, Path, description = "Reservation ID"),
    ),
    request_body = ReservationPatch,
    responses(
        (status = 200, description = "Updated reservation", body = Reservation),
        (status = 403, description = "Not authorized for this reservation"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Date conflict or illegal status transition"),
        (status = 422, description = "Field validation failed"),
    ),
)]
pub async fn update_reservation(
    State(state): State<SharedState>,
    Extension(ActorExtension(actor)): Extension<ActorExtension>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ReservationPatch>,
) -> Result<Json<Reservation>> {
    let reservation = state.access.update_as_actor(&actor, id, patch).await?;
    Ok(Json(reservation))
}
