use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{parse_id, AppState};
use crate::errors::AppError;
use store_types::domain::product::{Product, ProductInput};
use store_types::ports::StoreRepository;

pub async fn list_products<R: StoreRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.products.list_products().await?))
}

pub async fn get_product<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(state.products.get_product(id).await?))
}

pub async fn create_product<R: StoreRepository>(
    State(state): State<AppState<R>>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let Json(input) = payload?;
    let product = state.products.create_product(input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    Ok(Json(state.products.update_product(id, input).await?))
}

pub async fn delete_product<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.products.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
