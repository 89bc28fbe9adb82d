//! Raw request parameters and the lenient parsing applied to them.
//!
//! Every field arrives as an optional string. Empty strings count as
//! absent, and numbers that don’t parse are dropped rather than reported.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The parameters accepted when listing properties.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_rating: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// The parameters accepted by the dedicated search entry point.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// The filter values that were actually applied to a listing query:
/// the raw strings as sent, or `null` for filters that were absent or
/// unusable.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEcho {
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_rating: Option<String>,
    pub search: Option<String>,
}

/// Decodes a raw query string into `T`, keeping the first value given
/// for each name. Repeated or unknown names never fail the whole query.
///
/// ```
/// use listings::query::{from_query_string, SearchQuery};
/// let query: SearchQuery = from_query_string("q=beach&q=goa");
/// assert_eq!(query.q.as_deref(), Some("beach"));
/// ```
pub fn from_query_string<T: DeserializeOwned + Default>(raw: &str) -> T {
    let mut fields = Map::new();

    for (name, value) in url::form_urlencoded::parse(raw.as_bytes()) {
        fields
            .entry(name.into_owned())
            .or_insert_with(|| Value::String(value.into_owned()));
    }

    serde_json::from_value(Value::Object(fields)).unwrap_or_default()
}

/// Returns the value if it was provided and isn’t empty.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Parses a numeric bound, treating anything that isn’t a finite
/// decimal number as absent.
///
/// ```
/// use listings::query::number;
/// assert_eq!(number(&Some(" 2500 ".to_owned())), Some(2500.0));
/// assert_eq!(number(&Some("notanumber".to_owned())), None);
/// assert_eq!(number(&None), None);
/// ```
pub fn number(value: &Option<String>) -> Option<f64> {
    present(value)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

/// Parses a strictly positive integer such as a page number.
pub fn positive(value: &Option<String>) -> Option<usize> {
    present(value)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}
