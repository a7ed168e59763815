//! Cart checkout handler.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use ecom_core::CartItem;

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::services::checkout::{CheckoutReceipt, CheckoutService};
use crate::state::AppState;

/// Body of `POST /cart/checkout`.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    /// A missing `items` key is treated as an empty cart.
    #[serde(default)]
    pub items: Vec<CartItem>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub status: &'static str,
    #[serde(flatten)]
    pub receipt: CheckoutReceipt,
}

/// Place an order for the authenticated user.
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    RequireUser(user_id): RequireUser,
    payload: std::result::Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>> {
    let Json(request) = payload?;

    let receipt = CheckoutService::new(
        state.products(),
        state.orders(),
        &state.config().order_address,
    )
    .checkout(user_id, &request.items)
    .await?;

    Ok(Json(CheckoutResponse {
        status: "success",
        receipt,
    }))
}
