//! CSS extraction: a CSS-like selector compiled to XPath.
//!
//! The compiler is a pure, deterministic text-to-text translation of a CSS
//! Level-3-like selector into an XPath 1.0 location path: tag, id and
//! class shorthands, simple attribute tests, a fixed set of structural
//! pseudo-classes, and combinators. It is an ordered sequence of rewrite
//! rules; order matters because later rules consume syntax produced by
//! earlier ones. Unsupported selector syntax passes through unchanged:
//! the compiler never reports invalidity, it only surfaces downstream as
//! an empty XPath result.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Strategy;
use super::xpath::{evaluate_concat, parse_markup};

/// CSS-selector extraction. The selector is compiled to XPath and
/// evaluated against leniently parsed HTML; the text content of every
/// matched element (non-element matches are ignored) is concatenated into
/// one string.
pub struct CssStrategy;

impl Strategy for CssStrategy {
    fn extract(&self, search: &str, content: &str, _flags: Option<&str>) -> Option<String> {
        let xpath = selector_to_xpath(search);
        let package = parse_markup(content, None)?;
        evaluate_concat(&package, &xpath, true)
    }
}

/// One rewrite pass over a compound selector.
enum Rewrite {
    /// Regex substitution, all occurrences.
    Pattern(Regex, &'static str),
    /// Plain substring substitution, all occurrences.
    Literal(&'static str, &'static str),
}

impl Rewrite {
    fn apply(&self, input: &str) -> String {
        match self {
            Rewrite::Pattern(re, replacement) => re.replace_all(input, *replacement).into_owned(),
            Rewrite::Literal(from, to) => input.replace(from, to),
        }
    }
}

fn pattern(re: &str, replacement: &'static str) -> Rewrite {
    Rewrite::Pattern(Regex::new(re).unwrap(), replacement)
}

/// Per-compound rewrite rules, applied strictly in order. Each rule's
/// output feeds the next; the trailing `]*` / `]/*` cleanups collapse the
/// wildcard-bracket artifacts earlier rules leave behind (this is how
/// stacked classes like `div.a.b` end up as adjacent predicates).
static COMPOUND_RULES: Lazy<Vec<Rewrite>> = Lazy::new(|| {
    vec![
        // selector union, e.g. "a,b"
        Rewrite::Literal(",", "|descendant-or-self::"),
        // input:checked, :disabled, etc.
        pattern(
            r#"(.+)?:(checked|disabled|required|autofocus)"#,
            r#"${1}[@${2}="${2}"]"#,
        ),
        // input:autocomplete, :autocomplete
        pattern(r"(.+)?:(autocomplete)", r#"${1}[@${2}="on"]"#),
        // input:button, input:submit, etc.
        pattern(
            r":(text|password|checkbox|radio|button|submit|reset|file|hidden|image|datetime|datetime-local|date|month|time|week|number|range|email|url|search|tel|color)",
            r#"input[@type="${1}"]"#,
        ),
        // foo[id]
        pattern(r"(\w+)\[([_\w-]+[_\w\d-]*)\]", r"${1}[@${2}]"),
        // [id]
        pattern(r"\[([_\w-]+[_\w\d-]*)\]", r"*[@${1}]"),
        // foo[id=foo]
        pattern(r#"\[([_\w-]+[_\w\d-]*)=['"]?(.*?)['"]?\]"#, r#"[@${1}="${2}"]"#),
        // [id=foo]
        pattern(r"^\[", r"*["),
        // div#foo
        pattern(r"([_\w-]+[_\w\d-]*)#([_\w-]+[_\w\d-]*)", r#"${1}[@id="${2}"]"#),
        // #foo
        pattern(r"#([_\w-]+[_\w\d-]*)", r#"*[@id="${1}"]"#),
        // div.foo
        pattern(
            r"([_\w-]+[_\w\d-]*)\.([_\w-]+[_\w\d-]*)",
            r#"${1}[contains(concat(" ",@class," ")," ${2} ")]"#,
        ),
        // .foo
        pattern(
            r"\.([_\w-]+[_\w\d-]*)",
            r#"*[contains(concat(" ",@class," ")," ${1} ")]"#,
        ),
        // div:first-child
        pattern(r"([_\w-]+[_\w\d-]*):first-child", r"*/${1}[position()=1]"),
        // div:last-child
        pattern(r"([_\w-]+[_\w\d-]*):last-child", r"*/${1}[position()=last()]"),
        // :first-child
        Rewrite::Literal(":first-child", "*/*[position()=1]"),
        // :last-child
        Rewrite::Literal(":last-child", "*/*[position()=last()]"),
        // :nth-last-child
        pattern(r":nth-last-child\((\d+)\)", r"[position()=(last() - (${1} - 1))]"),
        // div:nth-child
        pattern(
            r"([_\w-]+[_\w\d-]*):nth-child\((\d+)\)",
            r"*/*[position()=${2} and self::${1}]",
        ),
        // :nth-child
        pattern(r":nth-child\((\d+)\)", r"*/*[position()=${1}]"),
        // :contains(Foo)
        pattern(
            r"([_\w-]+[_\w\d-]*):contains\((.*?)\)",
            r#"${1}[contains(string(.),"${2}")]"#,
        ),
        // child combinator
        Rewrite::Literal(">", "/"),
        // general sibling combinator
        Rewrite::Literal("~", "/following-sibling::"),
        // adjacent sibling combinator
        pattern(r"\+([_\w-]+[_\w\d-]*)", r"/following-sibling::${1}[position()=1]"),
        // wildcard-bracket cleanup
        Rewrite::Literal("]*", "]"),
        Rewrite::Literal("]/*", "]"),
    ]
});

static WS_AROUND_GT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*>\s*").unwrap());
static WS_AROUND_TILDE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*~\s*").unwrap());
static WS_AROUND_PLUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\+\s*").unwrap());
static WS_AROUND_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*,\s*").unwrap());

/// Convert a CSS-like selector into an XPath expression.
///
/// Deterministic and total: the same selector always yields the same
/// expression, and unsupported syntax survives untranslated instead of
/// raising an error.
pub fn selector_to_xpath(selector: &str) -> String {
    // Whitespace around >, ~, +, "," is combinator punctuation; remaining
    // whitespace is the descendant combinator.
    let mut normalized = WS_AROUND_GT.replace_all(selector, ">").into_owned();
    normalized = WS_AROUND_TILDE.replace_all(&normalized, "~").into_owned();
    normalized = WS_AROUND_PLUS.replace_all(&normalized, "+").into_owned();
    normalized = WS_AROUND_COMMA.replace_all(&normalized, ",").into_owned();

    let compounds: Vec<String> = split_compounds(&normalized)
        .into_iter()
        .map(rewrite_compound)
        .collect();

    let mut xpath = format!("descendant-or-self::{}", compounds.join("/descendant::"));

    // :scope refers to the evaluation root itself.
    xpath = xpath.replace("descendant-or-self:::scope", ".");

    // `$` marks an ancestor of the matched node as the selection target.
    let branches: Vec<String> = xpath.split(',').map(ascend_anchor).collect();
    branches.join(",")
}

fn rewrite_compound(compound: String) -> String {
    COMPOUND_RULES
        .iter()
        .fold(compound, |acc, rule| rule.apply(&acc))
}

/// Split a selector on descendant-combinator whitespace. Whitespace inside
/// an attribute bracket never splits.
fn split_compounds(selector: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;

    for c in selector.chars() {
        match c {
            '[' => {
                depth += 1;
                current.push(c);
            }
            ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            c if c.is_whitespace() && depth == 0 => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Rewrite a `$` ancestor anchor: drop the marker and append one `/..`
/// ascension per path step of the remainder beyond the first, so the
/// expression selects the anchored ancestor instead of the final node.
fn ascend_anchor(branch: &str) -> String {
    let mut parts = branch.split('$');
    let head = parts.next().unwrap_or("");

    let Some(rest) = parts.next() else {
        return branch.to_string();
    };

    let steps = rest.split('/').filter(|s| !s.is_empty()).count();
    let mut out = String::with_capacity(branch.len() + steps * 3);
    out.push_str(head);
    out.push_str(rest);
    for _ in 0..steps.saturating_sub(1) {
        out.push_str("/..");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_is_deterministic() {
        let selector = "div.menu > ul li:first-child, #main a[href]";
        assert_eq!(selector_to_xpath(selector), selector_to_xpath(selector));
    }

    #[test]
    fn test_id_shorthand() {
        assert_eq!(selector_to_xpath("#foo"), r#"descendant-or-self::*[@id="foo"]"#);
        assert_eq!(selector_to_xpath("div#foo"), r#"descendant-or-self::div[@id="foo"]"#);
    }

    #[test]
    fn test_class_shorthand() {
        assert_eq!(
            selector_to_xpath("div.bar"),
            r#"descendant-or-self::div[contains(concat(" ",@class," ")," bar ")]"#
        );
        assert_eq!(
            selector_to_xpath(".bar"),
            r#"descendant-or-self::*[contains(concat(" ",@class," ")," bar ")]"#
        );
    }

    #[test]
    fn test_stacked_classes() {
        assert_eq!(
            selector_to_xpath("div.a.b"),
            r#"descendant-or-self::div[contains(concat(" ",@class," ")," a ")][contains(concat(" ",@class," ")," b ")]"#
        );
    }

    #[test]
    fn test_descendant_combinator() {
        assert_eq!(selector_to_xpath("ul li"), "descendant-or-self::ul/descendant::li");
    }

    #[test]
    fn test_child_combinator_uses_slash() {
        assert_eq!(selector_to_xpath("ul > li"), "descendant-or-self::ul/li");
        assert_eq!(selector_to_xpath("ul>li"), "descendant-or-self::ul/li");
    }

    #[test]
    fn test_sibling_combinators() {
        assert_eq!(
            selector_to_xpath("h1 ~ p"),
            "descendant-or-self::h1/following-sibling::p"
        );
        assert_eq!(
            selector_to_xpath("h1 + p"),
            "descendant-or-self::h1/following-sibling::p[position()=1]"
        );
    }

    #[test]
    fn test_attribute_presence() {
        assert_eq!(selector_to_xpath("a[href]"), "descendant-or-self::a[@href]");
        assert_eq!(selector_to_xpath("[href]"), "descendant-or-self::*[@href]");
    }

    #[test]
    fn test_attribute_equals() {
        assert_eq!(
            selector_to_xpath("input[type=submit]"),
            r#"descendant-or-self::input[@type="submit"]"#
        );
        assert_eq!(
            selector_to_xpath(r#"input[type="submit"]"#),
            r#"descendant-or-self::input[@type="submit"]"#
        );
        assert_eq!(
            selector_to_xpath("[type=submit]"),
            r#"descendant-or-self::*[@type="submit"]"#
        );
    }

    #[test]
    fn test_attribute_value_with_space_is_not_split() {
        assert_eq!(
            selector_to_xpath(r#"div[title="a b"] span"#),
            r#"descendant-or-self::div[@title="a b"]/descendant::span"#
        );
    }

    #[test]
    fn test_state_pseudo_classes() {
        assert_eq!(
            selector_to_xpath("input:checked"),
            r#"descendant-or-self::input[@checked="checked"]"#
        );
        // The bare pseudo-class leaves a leading bracket that the `[` ->
        // `*[` rewrite then wildcards.
        assert_eq!(
            selector_to_xpath(":autocomplete"),
            r#"descendant-or-self::*[@autocomplete="on"]"#
        );
    }

    #[test]
    fn test_input_type_pseudo_classes() {
        assert_eq!(
            selector_to_xpath(":text"),
            r#"descendant-or-self::input[@type="text"]"#
        );
        assert_eq!(
            selector_to_xpath(":password"),
            r#"descendant-or-self::input[@type="password"]"#
        );
    }

    #[test]
    fn test_positional_pseudo_classes() {
        assert_eq!(
            selector_to_xpath("div:first-child"),
            "descendant-or-self::*/div[position()=1]"
        );
        assert_eq!(
            selector_to_xpath("div:last-child"),
            "descendant-or-self::*/div[position()=last()]"
        );
        assert_eq!(
            selector_to_xpath(":first-child"),
            "descendant-or-self::*/*[position()=1]"
        );
        assert_eq!(
            selector_to_xpath("li:nth-child(2)"),
            "descendant-or-self::*/*[position()=2 and self::li]"
        );
        assert_eq!(
            selector_to_xpath(":nth-child(3)"),
            "descendant-or-self::*/*[position()=3]"
        );
        assert_eq!(
            selector_to_xpath("li:nth-last-child(2)"),
            "descendant-or-self::li[position()=(last() - (2 - 1))]"
        );
    }

    #[test]
    fn test_contains() {
        assert_eq!(
            selector_to_xpath("a:contains(Next)"),
            r#"descendant-or-self::a[contains(string(.),"Next")]"#
        );
    }

    #[test]
    fn test_union() {
        assert_eq!(
            selector_to_xpath("a, b"),
            "descendant-or-self::a|descendant-or-self::b"
        );
    }

    #[test]
    fn test_scope() {
        assert_eq!(selector_to_xpath(":scope div"), "./descendant::div");
    }

    #[test]
    fn test_ancestor_anchor() {
        assert_eq!(
            selector_to_xpath("div $a span"),
            "descendant-or-self::div/descendant::a/descendant::span/.."
        );
    }

    #[test]
    fn test_unsupported_syntax_passes_through() {
        // Never an error; invalidity surfaces downstream at evaluation.
        let out = selector_to_xpath("a::before");
        assert!(out.starts_with("descendant-or-self::"));
    }

    #[test]
    fn test_compound_mix() {
        assert_eq!(
            selector_to_xpath("ul.menu > li a"),
            r#"descendant-or-self::ul[contains(concat(" ",@class," ")," menu ")]/li/descendant::a"#
        );
    }

    const HTML: &str = r#"<html><body>
        <div id="resultStats">About 42 results</div>
        <ul class="menu"><li><a href="/1">one</a></li><li><a href="/2">two</a></li></ul>
    </body></html>"#;

    #[test]
    fn test_extract_by_id() {
        let result = CssStrategy.extract("#resultStats", HTML, None);
        assert_eq!(result.as_deref(), Some("About 42 results"));
    }

    #[test]
    fn test_extract_concatenates_elements() {
        let result = CssStrategy.extract("ul.menu a", HTML, None);
        assert_eq!(result.as_deref(), Some("onetwo"));
    }

    #[test]
    fn test_extract_no_match() {
        assert!(CssStrategy.extract("#missing", HTML, None).is_none());
    }
}
