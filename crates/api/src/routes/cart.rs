//! Cart route handlers.
//!
//! Every handler takes [`RequireAuth`] first and only ever touches the
//! authenticated owner's cart.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use sweet_bliss_core::Price;

use super::{ApiJson, StatusResponse};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::cart::LineItem;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
}

/// Update-quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub name: String,
    pub quantity: i64,
}

/// Remove-item request body.
#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    pub name: String,
}

/// The owner's line items.
///
/// GET /cart/get
#[instrument(skip(state))]
pub async fn show(
    RequireAuth(owner): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<LineItem>>> {
    let items = state.cart_service().get(owner).await?;
    Ok(Json(items))
}

/// Add one unit of an item.
///
/// POST /cart/add
#[instrument(skip(state))]
pub async fn add(
    RequireAuth(owner): RequireAuth,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AddRequest>,
) -> Result<Json<StatusResponse>> {
    state.cart_service()
        .add(owner, &req.name, req.price, &req.image)
        .await?;

    Ok(Json(StatusResponse::ok()))
}

/// Set an item's quantity.
///
/// POST /cart/update
#[instrument(skip(state))]
pub async fn update(
    RequireAuth(owner): RequireAuth,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateRequest>,
) -> Result<Json<StatusResponse>> {
    state.cart_service()
        .update_quantity(owner, &req.name, req.quantity)
        .await?;

    Ok(Json(StatusResponse::ok()))
}

/// Remove an item.
///
/// POST /cart/remove
#[instrument(skip(state))]
pub async fn remove(
    RequireAuth(owner): RequireAuth,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RemoveRequest>,
) -> Result<Json<StatusResponse>> {
    state.cart_service()
        .remove(owner, &req.name)
        .await?;

    Ok(Json(StatusResponse::ok()))
}

/// Remove every item.
///
/// POST /cart/clear
#[instrument(skip(state))]
pub async fn clear(
    RequireAuth(owner): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>> {
    state.cart_service().clear(owner).await?;

    Ok(Json(StatusResponse::ok()))
}
