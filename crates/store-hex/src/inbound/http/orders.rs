use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{parse_id, AppState};
use crate::errors::AppError;
use store_types::domain::order::{Order, OrderInput};
use store_types::ports::StoreRepository;

pub async fn list_orders<R: StoreRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders.list_orders().await?))
}

pub async fn get_order<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Order>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(state.orders.get_order(id).await?))
}

pub async fn create_order<R: StoreRepository>(
    State(state): State<AppState<R>>,
    payload: Result<Json<OrderInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let Json(input) = payload?;
    let order = state.orders.create_order(input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn update_order<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<OrderInput>, JsonRejection>,
) -> Result<Json<Order>, AppError> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    Ok(Json(state.orders.update_order(id, input).await?))
}

pub async fn delete_order<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.orders.delete_order(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
