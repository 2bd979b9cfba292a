//! JSON API module.
//!
//! Read-only endpoints consumed by the dashboard and roster views.

mod leagues;
mod settings;
mod teams;

pub use leagues::*;
pub use settings::*;
pub use teams::*;

use crate::errors::AppError;

/// Response type for the JSON endpoints.
pub type ApiResult<T> = Result<axum::Json<T>, AppError>;
