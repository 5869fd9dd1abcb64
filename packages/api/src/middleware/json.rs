use axum::extract::FromRequest;

use crate::error::ApiError;

/// `Json` whose rejections are reported as 400 with the usual error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);
