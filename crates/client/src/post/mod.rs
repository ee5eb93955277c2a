//! Post-processors: transforms applied to an extracted value before it is
//! returned to the caller.

use scrapi_core::definitions::PostMethod;

use crate::extract::pattern::compile_pattern;

/// A pluggable value transform.
pub trait PostProcessor: Send + Sync {
    fn apply(&self, value: &str, search: &str, replace: &str) -> String;
}

/// Resolve the post-processor registered for a method.
///
/// Returns `None` for [`PostMethod::Unknown`]; the pipeline turns that
/// into its "no valid postprocessing method" response.
pub fn post_processor_for(method: &PostMethod) -> Option<&'static dyn PostProcessor> {
    match method {
        PostMethod::SearchReplace => Some(&SearchReplace),
        PostMethod::Unknown(_) => None,
    }
}

/// Regex search-and-replace over the extracted value. The search
/// expression accepts the same delimited form as the pattern strategy; a
/// malformed expression leaves the value unchanged.
pub struct SearchReplace;

impl PostProcessor for SearchReplace {
    fn apply(&self, value: &str, search: &str, replace: &str) -> String {
        match compile_pattern(search) {
            Some(re) => re.replace_all(value, replace).into_owned(),
            None => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_non_digits() {
        let result = SearchReplace.apply("About 1,234 results", r"/[^\d]/", "");
        assert_eq!(result, "1234");
    }

    #[test]
    fn test_replacement_with_group_reference() {
        let result = SearchReplace.apply("2024-05-17", r"/(\d+)-(\d+)-(\d+)/", "$3/$2/$1");
        assert_eq!(result, "17/05/2024");
    }

    #[test]
    fn test_malformed_search_leaves_value_unchanged() {
        let result = SearchReplace.apply("abc", r"/[unclosed/", "x");
        assert_eq!(result, "abc");
    }

    #[test]
    fn test_dispatch() {
        assert!(post_processor_for(&PostMethod::SearchReplace).is_some());
        assert!(post_processor_for(&PostMethod::Unknown("bogus".into())).is_none());
    }
}
