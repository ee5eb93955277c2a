//! `GET /openapi`: Swagger 2.0 description of the running instance.
//!
//! The document is assembled from each endpoint's doc section in
//! registration order, so it always reflects the actual table. The
//! scrap endpoint contributes one path per loaded definition.

use axum::response::{IntoResponse, Response};

use crate::endpoints::{clean_cache, openapi_ui, ping, scrap};
use crate::router::RouteHandler;
use crate::state::AppState;

pub async fn handle(state: &AppState, host: Option<&str>) -> Response {
    render(state, host).into_response()
}

fn render(state: &AppState, host: Option<&str>) -> String {
    let host = host.unwrap_or(&state.config.bind_addr);

    let mut spec = format!(
        r#"swagger: "2.0"
info:
  title: "scrapi API"
  description: "A generic API for easy web scraping."
  version: "1.0.0"
host: "{host}"
basePath: "/"
schemes:
- "https"
- "http"
tags:
- name: "scrap"
  description: "Scraping Resources"
- name: "tools"
  description: "Tools"
paths:
"#
    );

    for endpoint in state.endpoints.iter() {
        match endpoint.handler {
            RouteHandler::Ping => spec.push_str(ping::doc()),
            RouteHandler::CleanCache => spec.push_str(clean_cache::doc()),
            RouteHandler::OpenApi => spec.push_str(doc()),
            RouteHandler::OpenApiUi => spec.push_str(openapi_ui::doc()),
            RouteHandler::Scrap => spec.push_str(&scrap::doc(&state.definitions)),
        }
    }

    spec
}

pub(crate) fn doc() -> &'static str {
    r#"  /openapi:
    get:
      summary: Get OpenAPI specification
      description: Get OpenAPI specification of this scrapi API
      tags:
      - "tools"
      produces:
      - "text/plain"
      responses:
        200:
          description: "Successful operation"
          schema:
            type: string
            description: "Swagger file (Yaml)"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrapi_core::config::AppConfig;
    use scrapi_core::definitions::Definitions;

    fn state() -> AppState {
        AppState::new(AppConfig::default(), Definitions::builtin()).unwrap()
    }

    #[test]
    fn test_document_structure() {
        let spec = render(&state(), Some("api.example.org"));
        assert!(spec.starts_with("swagger: \"2.0\""));
        assert!(spec.contains("host: \"api.example.org\""));
        assert!(spec.contains("  /ping:"));
        assert!(spec.contains("  /clean-cache:"));
        assert!(spec.contains("  /openapi:"));
        assert!(spec.contains("  /openapi-ui:"));
    }

    #[test]
    fn test_definitions_contribute_paths() {
        let spec = render(&state(), None);
        assert!(spec.contains("  /google-numresults/{id}:"));
        assert!(spec.contains("  /google-numresults-xpath/{id}:"));
        assert!(spec.contains("  /google-numresults-css/{id}:"));
    }

    #[test]
    fn test_sections_follow_registration_order() {
        let spec = render(&state(), None);
        let ping = spec.find("  /ping:").unwrap();
        let clean = spec.find("  /clean-cache:").unwrap();
        let openapi = spec.find("  /openapi:").unwrap();
        let scrap = spec.find("  /google-numresults/{id}:").unwrap();
        assert!(ping < clean && clean < openapi && openapi < scrap);
    }
}
