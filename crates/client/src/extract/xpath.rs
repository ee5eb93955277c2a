//! XPath extraction over parsed markup.

use sxd_document::Package;
use sxd_xpath::nodeset::Node;
use sxd_xpath::{Context, Factory, Value};

use super::Strategy;

/// XPath 1.0 extraction. Matched node string-values are concatenated in
/// document order.
pub struct XpathStrategy;

impl Strategy for XpathStrategy {
    fn extract(&self, search: &str, content: &str, flags: Option<&str>) -> Option<String> {
        let package = parse_markup(content, flags)?;
        evaluate_concat(&package, search, false)
    }
}

/// Parse content into a DOM package.
///
/// A `nohtml` marker in the flags forces strict XML parsing; otherwise the
/// lenient HTML parser is used, tolerant of malformed markup. A strict
/// parse failure is a `None` like any other extraction failure.
pub(crate) fn parse_markup(content: &str, flags: Option<&str>) -> Option<Package> {
    if flags.is_some_and(|f| f.contains("nohtml")) {
        sxd_document::parser::parse(content).ok()
    } else {
        Some(sxd_html::parse_html(content))
    }
}

/// Evaluate an XPath expression against a parsed document and concatenate
/// the matched nodes' string-values in document order.
///
/// With `elements_only`, non-element matches are skipped (the CSS strategy
/// selects elements). A malformed expression, a non-node-set result, or an
/// empty concatenation all yield `None`.
pub(crate) fn evaluate_concat(package: &Package, expr: &str, elements_only: bool) -> Option<String> {
    let document = package.as_document();
    let xpath = Factory::new().build(expr).ok()??;

    let context = Context::new();
    let value = xpath.evaluate(&context, document.root()).ok()?;

    let nodes = match value {
        Value::Nodeset(nodes) => nodes,
        _ => return None,
    };

    let mut out = String::new();
    for node in nodes.document_order() {
        if elements_only && !matches!(node, Node::Element(_)) {
            continue;
        }
        out.push_str(&node.string_value());
    }

    (!out.is_empty()).then_some(out)
}
