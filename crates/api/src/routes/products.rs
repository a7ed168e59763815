//! Product listing handler.

use axum::{Json, extract::State};
use tracing::instrument;

use ecom_core::Product;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// List every product.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = state
        .products()
        .list()
        .await
        .map_err(|e| AppError::database("Failed to get products", e))?;

    Ok(Json(products))
}
