//! Extraction strategies: locate a value within fetched content.
//!
//! Three interchangeable strategies, selected per definition:
//!
//! - `pattern`: regular expression, first capture group of the first match
//! - `xpath`: XPath 1.0 over parsed markup (lenient HTML or strict XML)
//! - `css`: CSS-like selector compiled to XPath, then evaluated as above
//!
//! All strategies share one failure mode: engine errors (malformed
//! expression, unparseable content) are indistinguishable from "no match".
//! Callers get `Some(value)` or `None`, never a diagnostic.

pub mod css;
pub mod pattern;
pub mod xpath;

pub use css::{CssStrategy, selector_to_xpath};
pub use pattern::PatternStrategy;
pub use xpath::XpathStrategy;

use scrapi_core::definitions::ExtractionMethod;

/// A pluggable extraction algorithm.
///
/// `extract` returns the located value, or `None` when the expression does
/// not match, the content cannot be parsed, or the expression itself is
/// malformed. An empty extracted value also counts as no match.
pub trait Strategy: Send + Sync {
    fn extract(&self, search: &str, content: &str, flags: Option<&str>) -> Option<String>;
}

/// Resolve the strategy registered for an extraction method.
///
/// Returns `None` for [`ExtractionMethod::Unknown`]; the pipeline turns
/// that into its "no valid method" response.
pub fn strategy_for(method: &ExtractionMethod) -> Option<&'static dyn Strategy> {
    match method {
        ExtractionMethod::Pattern => Some(&PatternStrategy),
        ExtractionMethod::Xpath => Some(&XpathStrategy),
        ExtractionMethod::Css => Some(&CssStrategy),
        ExtractionMethod::Unknown(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_dispatch() {
        assert!(strategy_for(&ExtractionMethod::Pattern).is_some());
        assert!(strategy_for(&ExtractionMethod::Xpath).is_some());
        assert!(strategy_for(&ExtractionMethod::Css).is_some());
        assert!(strategy_for(&ExtractionMethod::Unknown("bogus".into())).is_none());
    }
}
