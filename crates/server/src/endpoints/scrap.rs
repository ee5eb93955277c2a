//! The scrap endpoint: `GET /{service}/{resource}?token=...`.

use axum::response::{IntoResponse, Response};

use scrapi_core::definitions::Definitions;

use crate::pipeline;
use crate::router::RouteCaptures;
use crate::state::AppState;

pub async fn handle(state: &AppState, captures: &RouteCaptures) -> Response {
    let service = captures.get("service").map(String::as_str).unwrap_or("");
    let resource = captures.get("resource").map(String::as_str).unwrap_or("");
    let token = captures.get("token").map(String::as_str);

    match pipeline::execute(state, service, resource, token).await {
        Ok(value) => value.into_response(),
        Err(err) => err.into_response(),
    }
}

/// One Swagger path per loaded definition; the token query parameter is
/// documented only for definitions that require one.
pub(crate) fn doc(definitions: &Definitions) -> String {
    let mut doc = String::new();
    for (service, def) in definitions.iter() {
        doc.push_str(&format!(
            r#"  /{service}/{{id}}:
    get:
      summary: "{summary}"
      description: "{summary}"
      produces:
      - "text/plain"
      tags:
      - "scrap"
      parameters:
      - name: "id"
        in: "path"
        description: "The identifier to be used with the resource"
        required: true
        type: "string"
"#,
            summary = def.doc,
        ));
        if !def.tokens.is_empty() {
            doc.push_str(
                r#"      - name: "token"
        in: "query"
        description: "The authorization token"
        required: true
        type: "string"
"#,
            );
        }
        doc.push_str(
            r#"      responses:
        200:
          description: "Successful operation : resulting scraped value"
          schema:
            type: string
            description: "Result"
            example: ""
        404:
          description: "Not found"
        401:
          description: "Not authorized"
        400:
          description: "Bad request"
"#,
        );
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrapi_core::definitions::ScrapDefinition;

    #[test]
    fn test_token_parameter_only_when_required() {
        let mut defs = Definitions::default();
        defs.insert(
            "open",
            ScrapDefinition { url: "http://x/%s".into(), ..Default::default() },
        );
        defs.insert(
            "locked",
            ScrapDefinition {
                url: "http://x/%s".into(),
                tokens: vec!["k".into()],
                ..Default::default()
            },
        );

        let doc = doc(&defs);
        let open = doc.find("  /open/{id}:").unwrap();
        let locked = doc.find("  /locked/{id}:").unwrap();
        // BTreeMap order puts "locked" first; its section must carry the
        // token parameter while "open"'s must not.
        let locked_section = &doc[locked..open];
        let open_section = &doc[open..];
        assert!(locked_section.contains(r#"name: "token""#));
        assert!(!open_section.contains(r#"name: "token""#));
    }
}
