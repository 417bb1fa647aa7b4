//! Locators for finding one element of the application under test.
//!
//! A locator is a `(strategy, expression)` pair. Every strategy resolves to
//! either a CSS selector or an XPath expression, which is what the driver
//! hands to the browser. Locators carry no element handle: the driver
//! resolves them again on every lookup because the DOM is re-rendered between
//! steps.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Query language a locator resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// CSS selector (e.g., "svg[data-testid='PlayArrowIcon']")
    Css(String),
    /// XPath expression
    XPath(String),
}

impl Query {
    /// Get the raw expression
    #[must_use]
    pub fn expression(&self) -> &str {
        match self {
            Self::Css(s) | Self::XPath(s) => s,
        }
    }

    /// JavaScript expression that evaluates to the first matching element or `null`
    #[must_use]
    pub fn to_js(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({})", js_string(s)),
            Self::XPath(s) => format!(
                "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
                js_string(s)
            ),
        }
    }
}

/// A rule for finding one DOM element
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Locator {
    /// Raw XPath expression
    XPath(String),
    /// Raw CSS selector
    Css(String),
    /// Element id attribute
    Id(String),
    /// Element whose attribute contains a substring
    AttributeContains {
        /// Tag name (`*` for any)
        tag: String,
        /// Attribute name without the `@`
        attribute: String,
        /// Substring the attribute must contain
        value: String,
    },
    /// Element whose own text node equals the given text
    Text(String),
}

impl Locator {
    /// Create an XPath locator
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Create a CSS locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an id locator
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create an exact-text locator
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create an attribute-contains locator
    ///
    /// `Locator::attribute_contains("button", "aria-label", "Save")` matches
    /// `//button[contains(@aria-label, 'Save')]`.
    #[must_use]
    pub fn attribute_contains(
        tag: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::AttributeContains {
            tag: tag.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Strategy name, used in diagnostics
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::XPath(_) => "xpath",
            Self::Css(_) => "css",
            Self::Id(_) => "id",
            Self::AttributeContains { .. } => "attribute",
            Self::Text(_) => "text",
        }
    }

    /// Resolve to the query the browser evaluates
    #[must_use]
    pub fn to_query(&self) -> Query {
        match self {
            Self::XPath(expr) => Query::XPath(expr.clone()),
            Self::Css(sel) => Query::Css(sel.clone()),
            Self::Id(id) => Query::XPath(format!("//*[@id={}]", xpath_literal(id))),
            Self::AttributeContains {
                tag,
                attribute,
                value,
            } => Query::XPath(format!(
                "//{tag}[contains(@{attribute}, {})]",
                xpath_literal(value)
            )),
            Self::Text(text) => Query::XPath(format!("//*[text() = {}]", xpath_literal(text))),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy(), self.to_query().expression())
    }
}

/// Quote a string as an XPath 1.0 literal.
///
/// XPath 1.0 has no escape sequences, so a value holding both quote kinds
/// is assembled with `concat()`.
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// Quote a string as a JavaScript string literal
fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned()).to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod resolution_tests {
        use super::*;

        #[test]
        fn test_id_resolves_to_xpath() {
            let loc = Locator::id("login-input");
            assert_eq!(loc.to_query(), Query::XPath("//*[@id='login-input']".into()));
        }

        #[test]
        fn test_generated_id_keeps_colons() {
            let loc = Locator::id(":r2:");
            assert_eq!(loc.to_query().expression(), "//*[@id=':r2:']");
        }

        #[test]
        fn test_attribute_contains() {
            let loc = Locator::attribute_contains("button", "aria-label", "pracę");
            assert_eq!(
                loc.to_query().expression(),
                "//button[contains(@aria-label, 'pracę')]"
            );
        }

        #[test]
        fn test_text_locator() {
            let loc = Locator::text("Pomyślnie odłączono elektrownię od systemu");
            assert_eq!(
                loc.to_query().expression(),
                "//*[text() = 'Pomyślnie odłączono elektrownię od systemu']"
            );
        }

        #[test]
        fn test_css_passthrough() {
            let loc = Locator::css("svg[data-testid='PlayArrowIcon']");
            assert_eq!(
                loc.to_query(),
                Query::Css("svg[data-testid='PlayArrowIcon']".into())
            );
        }

        #[test]
        fn test_display_includes_strategy() {
            assert_eq!(Locator::text("Tak").to_string(), "text://*[text() = 'Tak']");
            assert_eq!(Locator::css("a.selected").to_string(), "css:a.selected");
        }
    }

    mod literal_tests {
        use super::*;

        #[test]
        fn test_plain_literal() {
            assert_eq!(xpath_literal("Zatrzymana"), "'Zatrzymana'");
        }

        #[test]
        fn test_single_quote_switches_delimiter() {
            assert_eq!(xpath_literal("it's"), "\"it's\"");
        }

        #[test]
        fn test_both_quotes_use_concat() {
            assert_eq!(
                xpath_literal(r#"a'b"c"#),
                r#"concat('a', "'", 'b"c')"#
            );
        }
    }

    mod js_tests {
        use super::*;

        #[test]
        fn test_xpath_js_is_quoted() {
            let js = Locator::id(":r5:").to_query().to_js();
            assert!(js.starts_with("document.evaluate(\"//*[@id=':r5:']\""));
            assert!(js.ends_with(".singleNodeValue"));
        }

        #[test]
        fn test_css_js_escapes_double_quotes() {
            let js = Query::Css("input[name=\"x\"]".into()).to_js();
            assert_eq!(js, r#"document.querySelector("input[name=\"x\"]")"#);
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn test_yaml_shape() {
            let loc: Locator = serde_yaml_ng::from_str("by: text\nvalue: Tak\n").unwrap();
            assert_eq!(loc, Locator::text("Tak"));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_literal_without_quotes_is_wrapped(s in "[a-zA-Z0-9 :ąęłńóśźż]{0,40}") {
                prop_assert_eq!(xpath_literal(&s), format!("'{s}'"));
            }

            #[test]
            fn prop_concat_parts_rejoin_to_input(s in "[a-z'\"]{1,30}") {
                prop_assume!(s.contains('\'') && s.contains('"'));
                let lit = xpath_literal(&s);
                prop_assert!(lit.starts_with("concat("));
                // every single-quote in the input becomes its own "'" argument
                prop_assert_eq!(lit.matches("\"'\"").count(), s.matches('\'').count());
            }
        }
    }
}
