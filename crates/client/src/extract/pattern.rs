//! Pattern extraction: regular expression with one capture group.

use regex::Regex;

use super::Strategy;

/// Regex-based extraction. Returns the first capture group of the first
/// match.
pub struct PatternStrategy;

impl Strategy for PatternStrategy {
    fn extract(&self, search: &str, content: &str, _flags: Option<&str>) -> Option<String> {
        let re = compile_pattern(search)?;
        let captured = re.captures(content)?.get(1)?.as_str();
        (!captured.is_empty()).then(|| captured.to_string())
    }
}

/// Compile a search expression, accepting the delimited form definitions
/// have historically used: `/body/flags`, where trailing flags map to
/// inline regex flags (`i`, `m`, `s`, `x`; others are dropped). Input not
/// wrapped in slashes is compiled verbatim.
///
/// A malformed expression yields `None`; extraction failure is a single
/// outcome, not differentiated by cause.
pub(crate) fn compile_pattern(search: &str) -> Option<Regex> {
    let expr = match split_delimited(search) {
        Some((body, flags)) if !flags.is_empty() => format!("(?{flags}){body}"),
        Some((body, _)) => body.to_string(),
        None => search.to_string(),
    };
    Regex::new(&expr).ok()
}

fn split_delimited(search: &str) -> Option<(&str, String)> {
    let body = search.strip_prefix('/')?;
    let end = body.rfind('/')?;
    let flags = body[end + 1..]
        .chars()
        .filter(|c| matches!(c, 'i' | 'm' | 's' | 'x'))
        .collect();
    Some((&body[..end], flags))
}
