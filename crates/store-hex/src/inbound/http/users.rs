use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::{parse_id, AppState};
use crate::errors::AppError;
use store_types::domain::user::{User, UserInput};
use store_types::ports::StoreRepository;

pub async fn list_users<R: StoreRepository>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users.list_users().await?))
}

pub async fn get_user<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(state.users.get_user(id).await?))
}

pub async fn create_user<R: StoreRepository>(
    State(state): State<AppState<R>>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let Json(input) = payload?;
    let user = state.users.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id)?;
    let Json(input) = payload?;
    Ok(Json(state.users.update_user(id, input).await?))
}

pub async fn delete_user<R: StoreRepository>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    state.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
