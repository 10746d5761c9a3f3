//! Unmatched route handler

use crate::AppError;

pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
