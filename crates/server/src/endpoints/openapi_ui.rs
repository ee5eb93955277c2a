//! `GET /openapi-ui`: static Swagger UI page against `/openapi`.

use axum::response::{Html, IntoResponse, Response};

pub async fn handle() -> Response {
    Html(PAGE).into_response()
}

const PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Swagger UI</title>
  <link rel="stylesheet" type="text/css" href="https://petstore.swagger.io/swagger-ui.css" >
  <link rel="icon" type="image/png" href="https://petstore.swagger.io/favicon-32x32.png" sizes="32x32" />
  <link rel="icon" type="image/png" href="https://petstore.swagger.io/favicon-16x16.png" sizes="16x16" />
  <style>
    html { box-sizing: border-box; overflow-y: scroll; }
    *, *:before, *:after { box-sizing: inherit; }
    body { margin: 0; background: #fafafa; }
  </style>
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://petstore.swagger.io/swagger-ui-bundle.js"> </script>
<script src="https://petstore.swagger.io/swagger-ui-standalone-preset.js"> </script>
<script>
window.onload = function() {
  const ui = SwaggerUIBundle({
    "dom_id": "#swagger-ui",
    deepLinking: true,
    presets: [SwaggerUIBundle.presets.apis, SwaggerUIStandalonePreset],
    plugins: [SwaggerUIBundle.plugins.DownloadUrl],
    layout: "StandaloneLayout",
    url: "/openapi",
  })
  window.ui = ui
}
</script>
</body>
</html>
"##;

pub(crate) fn doc() -> &'static str {
    r#"  /openapi-ui:
    get:
      summary: View OpenAPI specification with Swagger UI
      description: View OpenAPI specification with Swagger UI
      tags:
      - "tools"
      produces:
      - "text/plain"
      responses:
        200:
          description: "Successful operation"
          schema:
            type: string
            description: "HTML Swagger UI"
"#
}
