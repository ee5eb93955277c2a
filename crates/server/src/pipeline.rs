//! The scrap pipeline.
//!
//! One request, one pass: resolve the service, authorize, validate the
//! resource, fetch (through the cache), extract, post-process, store.
//! Every step is a potential terminal exit with its own status code and
//! a short plain-text message. There are no retries and no fallbacks;
//! the first failure ends the request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use scrapi_client::extract::strategy_for;
use scrapi_client::post::post_processor_for;

use crate::state::AppState;

/// Terminal pipeline exits. The `Display` text is the response body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScrapError {
    /// The service name is not in the definitions table.
    #[error("Service undeclared")]
    UnknownService,
    /// The definition requires a token and the supplied one is absent or
    /// not in the authorized set.
    #[error("Invalid token")]
    InvalidToken,
    /// The resource path segment is empty.
    #[error("Resource identifier missing")]
    MissingResource,
    /// The fetch failed or produced an empty body.
    #[error("Resource page not found")]
    PageNotFound,
    /// The definition has no search expression.
    #[error("No valid search")]
    MissingSearch,
    /// The definition names an unregistered extraction method.
    #[error("No valid method")]
    UnknownMethod,
    /// The extraction strategy produced no value.
    #[error("Resource not found in contents")]
    NoMatch,
    /// The definition names an unregistered post-processing method.
    #[error("No valid postprocessing method")]
    UnknownPostMethod,
}

impl ScrapError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::UnknownService
            | Self::MissingResource
            | Self::MissingSearch
            | Self::UnknownMethod
            | Self::UnknownPostMethod => StatusCode::BAD_REQUEST,
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::PageNotFound | Self::NoMatch => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ScrapError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Run the pipeline for one request. Returns the extracted (and
/// possibly post-processed) value on success.
pub async fn execute(
    state: &AppState,
    service: &str,
    resource: &str,
    token: Option<&str>,
) -> Result<String, ScrapError> {
    let def = state.definitions.get(service).ok_or(ScrapError::UnknownService)?;

    if !def.tokens.is_empty() {
        let supplied = token.unwrap_or("");
        if !def.tokens.iter().any(|t| t == supplied) {
            return Err(ScrapError::InvalidToken);
        }
    }

    if resource.is_empty() {
        return Err(ScrapError::MissingResource);
    }

    let url = def.fetch_url(resource);

    let mut cached = false;
    let mut content: Option<Vec<u8>> = None;
    if def.cacheable > 0 {
        if let Some(bytes) = state.cache.get(&url, def.ttl()).await {
            cached = true;
            content = Some(bytes);
        }
    }

    let content = match content {
        Some(bytes) => bytes,
        None => match state.fetcher.fetch(&url, def.context.as_ref()).await {
            Ok(bytes) => bytes.to_vec(),
            Err(err) => {
                tracing::debug!(%url, error = %err, "Fetch failed");
                return Err(ScrapError::PageNotFound);
            }
        },
    };
    if content.is_empty() {
        return Err(ScrapError::PageNotFound);
    }

    let text = String::from_utf8_lossy(&content);

    let search = def
        .search
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(ScrapError::MissingSearch)?;
    let strategy = strategy_for(&def.method).ok_or(ScrapError::UnknownMethod)?;
    let value = strategy
        .extract(search, &text, def.flags.as_deref())
        .ok_or(ScrapError::NoMatch)?;

    let post_search = def.post_search.as_deref().unwrap_or("");
    let value = if post_search.is_empty() {
        value
    } else {
        let post_method = def.post_method.clone().unwrap_or_default();
        let processor = post_processor_for(&post_method).ok_or(ScrapError::UnknownPostMethod)?;
        processor.apply(&value, post_search, def.post_replace.as_deref().unwrap_or(""))
    };

    // Raw fetched content, not the extracted value, is what gets cached.
    if !cached && def.cacheable > 0 {
        state.cache.put(&url, &content).await;
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ScrapError::UnknownService.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ScrapError::MissingResource.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ScrapError::MissingSearch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ScrapError::UnknownMethod.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ScrapError::UnknownPostMethod.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ScrapError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ScrapError::PageNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ScrapError::NoMatch.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_messages_are_plain_text() {
        assert_eq!(ScrapError::UnknownService.to_string(), "Service undeclared");
        assert_eq!(ScrapError::InvalidToken.to_string(), "Invalid token");
        assert_eq!(ScrapError::MissingResource.to_string(), "Resource identifier missing");
        assert_eq!(ScrapError::PageNotFound.to_string(), "Resource page not found");
        assert_eq!(ScrapError::MissingSearch.to_string(), "No valid search");
        assert_eq!(ScrapError::UnknownMethod.to_string(), "No valid method");
        assert_eq!(ScrapError::NoMatch.to_string(), "Resource not found in contents");
        assert_eq!(
            ScrapError::UnknownPostMethod.to_string(),
            "No valid postprocessing method"
        );
    }
}
