//! Ordered endpoint table.
//!
//! Routing is regex-over-path rather than axum's own router: endpoints
//! are tried strictly in registration order and the first one whose
//! method and pattern both match wins. Named capture groups become the
//! handler's parameters. `HEAD` matches as `GET`.

use std::collections::HashMap;

use axum::http::Method;
use regex::Regex;

/// Which handler an endpoint dispatches to. The actual handler bodies
/// live in [`crate::endpoints`]; keeping a plain variant here keeps the
/// table free of state and closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteHandler {
    Ping,
    CleanCache,
    OpenApi,
    OpenApiUi,
    Scrap,
}

/// Named capture groups of the matched pattern, name to substring.
pub type RouteCaptures = HashMap<String, String>;

pub struct Endpoint {
    method: Method,
    pattern: Regex,
    pub handler: RouteHandler,
}

impl Endpoint {
    fn new(method: Method, pattern: &str, handler: RouteHandler) -> Self {
        // Patterns are fixed at compile time; a bad one is a programming
        // error caught by the registration test below.
        let pattern = Regex::new(pattern).expect("route pattern must compile");
        Self { method, pattern, handler }
    }
}

pub struct EndpointTable {
    endpoints: Vec<Endpoint>,
}

impl EndpointTable {
    /// The standard table. Registration order is significant: the scrap
    /// endpoint's pattern is broad enough to shadow the fixed routes, so
    /// it goes last.
    pub fn standard() -> Self {
        Self {
            endpoints: vec![
                Endpoint::new(Method::GET, r"^/ping$", RouteHandler::Ping),
                Endpoint::new(Method::GET, r"^/clean-cache$", RouteHandler::CleanCache),
                Endpoint::new(Method::GET, r"^/openapi$", RouteHandler::OpenApi),
                Endpoint::new(Method::GET, r"^/openapi-ui$", RouteHandler::OpenApiUi),
                // Deliberately not end-anchored: stray query parameters
                // are ignored and the token may sit anywhere in the query.
                Endpoint::new(
                    Method::GET,
                    r"^/(?P<service>[^/]*)/(?P<resource>[^/?&]*)/?(?:\?(?:.*&)?token=(?P<token>[\w\d]*))?",
                    RouteHandler::Scrap,
                ),
            ],
        }
    }

    /// First endpoint matching `method` + `target`, in registration
    /// order, along with its named captures. `target` is the request
    /// path plus the query string when one is present.
    pub fn matching(&self, method: &Method, target: &str) -> Option<(&Endpoint, RouteCaptures)> {
        let method = if *method == Method::HEAD { &Method::GET } else { method };

        for endpoint in &self.endpoints {
            if endpoint.method != *method {
                continue;
            }
            if let Some(caps) = endpoint.pattern.captures(target) {
                let mut captures = RouteCaptures::new();
                for name in endpoint.pattern.capture_names().flatten() {
                    if let Some(m) = caps.name(name) {
                        captures.insert(name.to_string(), m.as_str().to_string());
                    }
                }
                return Some((endpoint, captures));
            }
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }
}
