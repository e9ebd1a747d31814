mod orders;
mod products;
mod server;
mod users;

pub use server::{AppState, HttpServer, HttpServerConfig};

use crate::errors::AppError;

/// Path ids are positive integers; anything else is a bad request.
fn parse_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(format!(
            "id must be a positive integer, got {raw:?}"
        ))),
    }
}
