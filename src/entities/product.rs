//! Product fact bundles as scraped from a product page

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Fact key holding the fabric composition text
pub const FABRIC_TYPE: &str = "Fabric type";
/// Primary fact key for country of origin
pub const ORIGIN: &str = "Origin";
/// Fallback fact key for country of origin
pub const COUNTRY_OF_ORIGIN: &str = "Country of origin";

/// A single fact value from the product page
///
/// The scraper emits either plain text or a list of bullet fragments; anything
/// else is kept verbatim so downstream parsing can reject it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FactValue {
    Text(String),
    List(Vec<String>),
    Other(serde_json::Value),
}

impl FactValue {
    /// True for JSON `null`, which the scraper uses for "not found"
    pub fn is_null(&self) -> bool {
        matches!(self, FactValue::Other(serde_json::Value::Null))
    }

    /// First textual value (the string itself, or the first list element)
    pub fn first_text(&self) -> Option<&str> {
        match self {
            FactValue::Text(s) => Some(s.as_str()),
            FactValue::List(items) => items.first().map(String::as_str),
            FactValue::Other(_) => None,
        }
    }
}

impl From<&str> for FactValue {
    fn from(s: &str) -> Self {
        FactValue::Text(s.to_string())
    }
}

impl From<Vec<&str>> for FactValue {
    fn from(items: Vec<&str>) -> Self {
        FactValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Fact name to value mapping ("Fabric type", "Origin", ...)
pub type Facts = BTreeMap<String, FactValue>;

/// Product facts as handed over by the browser extension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub brand: Option<String>,

    #[serde(default)]
    pub facts: Option<Facts>,
}

impl Product {
    /// Create a product with the given facts
    pub fn new(name: impl Into<String>, facts: Facts) -> Self {
        Self {
            name: Some(name.into()),
            brand: None,
            facts: Some(facts),
        }
    }

    /// Set the brand
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Look up a fact, treating `null` as absent
    pub fn fact(&self, key: &str) -> Option<&FactValue> {
        self.facts
            .as_ref()
            .and_then(|facts| facts.get(key))
            .filter(|value| !value.is_null())
    }

    /// Display name for logs and tables
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed)")
    }
}

/// Errors reading product files
#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(ecotag::input::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid product JSON on line {line}: {source}")]
    #[diagnostic(
        code(ecotag::input::json),
        help("expected a JSON object, an array of objects, or one object per line")
    )]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse products from text: a JSON object, a JSON array, or JSON Lines
///
/// Objects are read as a stream of whitespace-separated values, so a single
/// pretty-printed object and one-object-per-line input share one path and
/// errors point at the line where the offending value sits.
pub fn parse_products(text: &str) -> Result<Vec<Product>, InputError> {
    let to_input_error = |e: serde_json::Error| InputError::Json {
        line: e.line(),
        source: e,
    };

    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).map_err(to_input_error);
    }

    serde_json::Deserializer::from_str(text)
        .into_iter::<Product>()
        .map(|product| product.map_err(to_input_error))
        .collect()
}

/// Read products from a file, or stdin when the path is "-"
pub fn read_products(path: &Path) -> Result<Vec<Product>, InputError> {
    let text = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin())
    } else {
        std::fs::read_to_string(path)
    }
    .map_err(|e| InputError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_products(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_value_shapes() {
        let product: Product = serde_json::from_str(
            r#"{"name":"Tee","facts":{"Fabric type":"100% Cotton","Origin":["Vietnam"],"Weight":3,"Care instructions":null}}"#,
        )
        .unwrap();

        assert_eq!(product.fact(FABRIC_TYPE), Some(&FactValue::from("100% Cotton")));
        assert_eq!(product.fact(ORIGIN), Some(&FactValue::from(vec!["Vietnam"])));
        assert!(matches!(product.fact("Weight"), Some(FactValue::Other(_))));
        assert_eq!(product.fact("Care instructions"), None);
        assert_eq!(product.brand, None);
    }

    #[test]
    fn test_missing_facts() {
        let product: Product = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
        assert!(product.facts.is_none());
        assert_eq!(product.fact(FABRIC_TYPE), None);
        assert_eq!(product.display_name(), "X");
    }

    #[test]
    fn test_first_text() {
        assert_eq!(FactValue::from("China").first_text(), Some("China"));
        assert_eq!(FactValue::from(vec!["India", "China"]).first_text(), Some("India"));
        assert_eq!(FactValue::List(vec![]).first_text(), None);
        assert_eq!(FactValue::Other(serde_json::json!(7)).first_text(), None);
    }

    #[test]
    fn test_parse_products_formats() {
        let single = parse_products(r#"{"name":"A","facts":{}}"#).unwrap();
        assert_eq!(single.len(), 1);

        let array = parse_products(r#"[{"name":"A"},{"name":"B"}]"#).unwrap();
        assert_eq!(array.len(), 2);

        let lines = parse_products("{\"name\":\"A\"}\n\n{\"name\":\"B\"}\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].name.as_deref(), Some("B"));
    }

    #[test]
    fn test_parse_products_reports_line() {
        let err = parse_products("{\"name\":\"A\"}\nnot json\n").unwrap_err();
        match err {
            InputError::Json { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_products_pretty_object() {
        let pretty = "{\n  \"name\": \"Coat\",\n  \"facts\": {\"Fabric type\": \"Wool\"}\n}\n";
        let products = parse_products(pretty).unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name.as_deref(), Some("Coat"));
    }

    #[test]
    fn test_parse_products_reports_type_error_in_pretty_object() {
        let pretty = "{\n  \"name\": \"Coat\",\n  \"facts\": 5\n}\n";
        let err = parse_products(pretty).unwrap_err();
        match err {
            InputError::Json { line, source } => {
                assert_eq!(line, 3);
                assert!(source.is_data(), "expected a type error, got {source}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
