//! Request extractors whose rejections render through [`ApiError`]
//!
//! axum's own `Json` and `Query` reject with plain-text bodies; these
//! wrappers keep every failure in the `{"error": ...}` shape.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
