//! `GET /ping`: liveness probe.

use axum::response::{IntoResponse, Response};

pub async fn handle() -> Response {
    "OK".into_response()
}

pub(crate) fn doc() -> &'static str {
    r#"  /ping:
    get:
      summary: Ping the scrapi API
      description: Ping the API
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
