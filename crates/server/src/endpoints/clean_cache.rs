//! `GET /clean-cache`: delete every cache entry, regardless of age.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

pub async fn handle(state: &AppState) -> Response {
    match state.cache.clear().await {
        Ok(count) => format!("Cache cleaned ({count} files deleted)").into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Cache clear refused");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

pub(crate) fn doc() -> &'static str {
    r#"  /clean-cache:
    get:
      summary: Clean the cache of the scrapi API
      description: Clean the cache of the scrapi API. Note that all files will be deleted (not based on timestamp, no check if source is still available)
      tags:
      - "tools"
      produces:
      - "text/plain"
      responses:
        200:
          description: "Successful operation"
          schema:
            type: string
            example: "OK"
"#
}
