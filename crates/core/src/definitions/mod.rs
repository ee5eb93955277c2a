//! Scrap definitions: the static table describing how to turn a web page
//! into a narrow data API.
//!
//! Each definition names a URL template, an extraction rule, and an
//! optional post-processing rule. The table is assembled once at startup
//! from the built-in entries plus an optional TOML override file, and is
//! immutable for the process lifetime.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Extraction strategy selector.
///
/// Deserialized from the definition's `method` key. Unknown strings are
/// preserved as [`ExtractionMethod::Unknown`] so that a bad method is
/// reported at request time ("No valid method") rather than rejected at
/// startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExtractionMethod {
    /// Regular expression with one capture group (config name `pattern`,
    /// legacy alias `preg`).
    Pattern,
    /// XPath expression over parsed markup.
    Xpath,
    /// CSS-like selector, compiled to XPath.
    Css,
    /// Anything else; fails dispatch at request time.
    Unknown(String),
}

impl Default for ExtractionMethod {
    fn default() -> Self {
        ExtractionMethod::Pattern
    }
}

impl From<String> for ExtractionMethod {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pattern" | "preg" => ExtractionMethod::Pattern,
            "xpath" => ExtractionMethod::Xpath,
            "css" => ExtractionMethod::Css,
            _ => ExtractionMethod::Unknown(s),
        }
    }
}

impl From<ExtractionMethod> for String {
    fn from(m: ExtractionMethod) -> Self {
        match m {
            ExtractionMethod::Pattern => "pattern".into(),
            ExtractionMethod::Xpath => "xpath".into(),
            ExtractionMethod::Css => "css".into(),
            ExtractionMethod::Unknown(s) => s,
        }
    }
}

/// Post-processing method selector, same unknown-preserving policy as
/// [`ExtractionMethod`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostMethod {
    /// Regex search-and-replace over the extracted value (config name
    /// `search-replace`, legacy alias `preg_replace`).
    SearchReplace,
    /// Anything else; fails dispatch at request time.
    Unknown(String),
}

impl Default for PostMethod {
    fn default() -> Self {
        PostMethod::SearchReplace
    }
}

impl From<String> for PostMethod {
    fn from(s: String) -> Self {
        match s.as_str() {
            "search-replace" | "preg_replace" => PostMethod::SearchReplace,
            _ => PostMethod::Unknown(s),
        }
    }
}

impl From<PostMethod> for String {
    fn from(m: PostMethod) -> Self {
        match m {
            PostMethod::SearchReplace => "search-replace".into(),
            PostMethod::Unknown(s) => s,
        }
    }
}

/// Opaque fetch configuration attached to a definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchContext {
    /// Extra request headers sent with the fetch.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,

    /// Per-definition fetch timeout override in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Skip TLS certificate verification for this definition's upstream.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

/// A single scrap definition: how to fetch and extract a value for a
/// class of resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapDefinition {
    /// URL template with exactly one `%s` placeholder for the resource
    /// identifier (sprintf syntax, as documented for the config file).
    pub url: String,

    /// Optional fetch configuration (headers, timeout, TLS options).
    #[serde(default)]
    pub context: Option<FetchContext>,

    /// Authorized tokens; empty means no authorization required.
    #[serde(default)]
    pub tokens: Vec<String>,

    /// Seconds of cache validity; 0 disables caching for this definition.
    #[serde(default)]
    pub cacheable: u64,

    /// Extraction strategy; defaults to pattern.
    #[serde(default)]
    pub method: ExtractionMethod,

    /// Strategy-specific search expression. Required; its absence is a
    /// configuration error surfaced at request time.
    #[serde(default)]
    pub search: Option<String>,

    /// Optional strategy-specific modifier (`nohtml` forces strict XML
    /// parsing for the xpath strategy).
    #[serde(default)]
    pub flags: Option<String>,

    /// Post-processing method; defaults to search-replace whenever
    /// `post_search` is set.
    #[serde(default)]
    pub post_method: Option<PostMethod>,

    /// Search operand for post-processing.
    #[serde(default)]
    pub post_search: Option<String>,

    /// Replace operand for post-processing.
    #[serde(default)]
    pub post_replace: Option<String>,

    /// Human-readable description, used by the OpenAPI generator.
    #[serde(default)]
    pub doc: String,
}

impl ScrapDefinition {
    /// Resolve the fetch URL by substituting the resource identifier into
    /// the template. The identifier is inserted raw; encoding is the
    /// definition author's concern.
    pub fn fetch_url(&self, resource: &str) -> String {
        self.url.replacen("%s", resource, 1)
    }

    /// Cache validity window as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cacheable)
    }
}

/// Errors from definition table loading.
#[derive(Debug, Error)]
pub enum DefinitionsError {
    #[error("failed to load definitions: {0}")]
    LoadFailed(String),
}

/// The process-wide definition table, keyed by case-sensitive service name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Definitions(BTreeMap<String, ScrapDefinition>);

impl Definitions {
    /// The bundled definitions: the Google result-count scrap in its three
    /// method variants.
    pub fn builtin() -> Self {
        let mut map = BTreeMap::new();

        map.insert(
            "google-numresults".to_string(),
            ScrapDefinition {
                url: "https://www.google.com/search?q=%s".into(),
                context: None,
                tokens: vec!["test".into()],
                cacheable: 3600,
                method: ExtractionMethod::Pattern,
                search: Some(r#"/id="resultStats">\s*(?P<num>[^<]*)/ms"#.into()),
                flags: None,
                post_method: None,
                post_search: None,
                post_replace: None,
                doc: "Get the number of results of a Google search".into(),
            },
        );

        map.insert(
            "google-numresults-xpath".to_string(),
            ScrapDefinition {
                url: "https://www.google.com/search?q=%s".into(),
                context: None,
                tokens: vec!["test".into()],
                cacheable: 3600,
                method: ExtractionMethod::Xpath,
                search: Some(r#"//*[@id="resultStats"]/text()"#.into()),
                flags: None,
                post_method: None,
                post_search: None,
                post_replace: None,
                doc: "Get the number of results of a Google search (with XPath method)".into(),
            },
        );

        map.insert(
            "google-numresults-css".to_string(),
            ScrapDefinition {
                url: "https://www.google.com/search?q=%s".into(),
                context: None,
                tokens: vec!["test".into()],
                cacheable: 3600,
                method: ExtractionMethod::Css,
                search: Some("#resultStats".into()),
                flags: None,
                post_method: None,
                post_search: Some(r"/[^\d]/".into()),
                post_replace: Some(String::new()),
                doc: "Get the number of results of a Google search (with CSS method)".into(),
            },
        );

        Definitions(map)
    }

    /// Load the definition table: built-in entries merged with an optional
    /// TOML override file (override file wins on key collision).
    ///
    /// # Errors
    ///
    /// Returns `DefinitionsError::LoadFailed` if the override file cannot
    /// be read or does not describe valid definitions.
    pub fn load(override_file: Option<&Path>) -> Result<Self, DefinitionsError> {
        let mut figment = Figment::from(Serialized::defaults(Self::builtin()));

        if let Some(path) = override_file {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .extract()
            .map_err(|e| DefinitionsError::LoadFailed(e.to_string()))
    }

    /// Look up a definition by service name (case-sensitive).
    pub fn get(&self, service: &str) -> Option<&ScrapDefinition> {
        self.0.get(service)
    }

    /// Iterate definitions in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ScrapDefinition)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert or replace a definition. Intended for tests and embedding;
    /// the server never mutates the table after startup.
    pub fn insert(&mut self, name: impl Into<String>, def: ScrapDefinition) {
        self.0.insert(name.into(), def);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_definitions() {
        let defs = Definitions::builtin();
        assert_eq!(defs.len(), 3);

        let preg = defs.get("google-numresults").unwrap();
        assert_eq!(preg.method, ExtractionMethod::Pattern);
        assert_eq!(preg.cacheable, 3600);
        assert_eq!(preg.tokens, vec!["test".to_string()]);

        let css = defs.get("google-numresults-css").unwrap();
        assert_eq!(css.method, ExtractionMethod::Css);
        assert_eq!(css.post_search.as_deref(), Some(r"/[^\d]/"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let defs = Definitions::builtin();
        assert!(defs.get("Google-Numresults").is_none());
    }

    #[test]
    fn test_fetch_url_substitution() {
        let def = defs_fixture("http://x/%s");
        assert_eq!(def.fetch_url("r"), "http://x/r");
    }

    #[test]
    fn test_fetch_url_single_placeholder() {
        let def = defs_fixture("http://x/%s/%s");
        // Only the first placeholder is substituted.
        assert_eq!(def.fetch_url("a"), "http://x/a/%s");
    }

    #[test]
    fn test_method_aliases() {
        assert_eq!(ExtractionMethod::from("preg".to_string()), ExtractionMethod::Pattern);
        assert_eq!(ExtractionMethod::from("pattern".to_string()), ExtractionMethod::Pattern);
        assert_eq!(
            PostMethod::from("preg_replace".to_string()),
            PostMethod::SearchReplace
        );
    }

    #[test]
    fn test_unknown_method_is_preserved() {
        let toml = r#"
            [svc]
            url = "http://x/%s"
            method = "bogus"
            search = "/a/"
        "#;
        let defs: Definitions = toml::from_str(toml).unwrap();
        let def = defs.get("svc").unwrap();
        assert_eq!(def.method, ExtractionMethod::Unknown("bogus".into()));
    }

    #[test]
    fn test_toml_roundtrip_defaults() {
        let toml = r#"
            [svc]
            url = "http://x/%s"
            search = "/value: (\\d+)/"
        "#;
        let defs: Definitions = toml::from_str(toml).unwrap();
        let def = defs.get("svc").unwrap();
        assert_eq!(def.method, ExtractionMethod::Pattern);
        assert_eq!(def.cacheable, 0);
        assert!(def.tokens.is_empty());
        assert!(def.context.is_none());
    }

    fn defs_fixture(url: &str) -> ScrapDefinition {
        ScrapDefinition {
            url: url.into(),
            context: None,
            tokens: Vec::new(),
            cacheable: 0,
            method: ExtractionMethod::Pattern,
            search: None,
            flags: None,
            post_method: None,
            post_search: None,
            post_replace: None,
            doc: String::new(),
        }
    }
}
