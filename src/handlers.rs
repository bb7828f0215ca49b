//! Resource route handlers. Each performs one store call and serializes the
//! raw result.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::auth::jwt::Claims;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::models::{wire_document, DeleteAck, InsertAck, OrdersQuery, StatusUpdate, UpdateAck};
use crate::AppState;

/// Liveness probe.
pub async fn root() -> &'static str {
    "garage-api is running"
}

/// List all services.
pub async fn list_services(State(state): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    let services = db::services::list_all(&state.store).await?;
    Ok(Json(services.into_iter().map(wire_document).collect()))
}

/// Fetch one service projected to its public fields. A missing entry
/// serializes as `null`.
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Option<Document>>> {
    let id = ObjectId::parse_str(&id)?;
    let service = db::services::get_summary(&state.store, id).await?;
    Ok(Json(service.map(wire_document)))
}

/// List orders, optionally scoped to one owner.
///
/// Protected route; the claims extension is set by `require_token`.
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<OrdersQuery>,
) -> ApiResult<Json<Vec<Document>>> {
    let filter = owner_scope(&claims, query.email.as_deref())?;
    let orders = db::orders::list(&state.store, filter).await?;
    Ok(Json(orders.into_iter().map(wire_document).collect()))
}

/// Build the listing filter from the requested owner and the verified
/// claims. A mismatch is forbidden; omitting the parameter lists every
/// order.
fn owner_scope(claims: &Claims, requested: Option<&str>) -> Result<Document, ApiError> {
    match requested {
        None => Ok(Document::new()),
        Some(email) if claims.email() == Some(email) => Ok(doc! { "email": email }),
        Some(email) => {
            tracing::warn!(
                "owner mismatch: token for {:?} asked for orders of {}",
                claims.email(),
                email
            );
            Err(ApiError::Forbidden)
        }
    }
}

/// Insert the request body as a new order. Not behind the auth chain.
pub async fn create_order(
    State(state): State<AppState>,
    Json(order): Json<Document>,
) -> ApiResult<Json<InsertAck>> {
    tracing::debug!("inserting order for {:?}", order.get("email"));

    let result = db::orders::insert(&state.store, order).await?;
    Ok(Json(result.into()))
}

/// Set an order's status field, nothing else.
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> ApiResult<Json<UpdateAck>> {
    let id = ObjectId::parse_str(&id)?;
    let result = db::orders::set_status(&state.store, id, &update.status).await?;
    Ok(Json(result.into()))
}

/// Delete an order by identifier.
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteAck>> {
    let id = ObjectId::parse_str(&id)?;
    let result = db::orders::delete(&state.store, id).await?;
    Ok(Json(result.into()))
}
