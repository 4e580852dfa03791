/**
 * Error Conversion
 *
 * `BackendError` renders as a JSON body so handlers can return it directly:
 *
 * ```json
 * {
 *   "error": "Board not found",
 *   "status": 404
 * }
 * ```
 *
 * Server-side failures are logged here with their full cause; the body only
 * carries a generic message.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }

        let body = serde_json::json!({
            "error": self.message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}
